//! Mode-specific candidate selection

use skillbar_types::{InputMode, ParsedInput, Skill};

use crate::parser::search_query;

/// Select the skills matching the current intent, keeping supplied order
///
/// Search mode matches `name` or `display_name` case-insensitively by
/// substring; `description` never participates. Direct and task modes match
/// `name` exactly or by prefix, case-sensitively.
pub fn filter<'a>(skills: &'a [Skill], parsed: &ParsedInput, raw_input: &str) -> Vec<&'a Skill> {
    match parsed.mode {
        InputMode::Search => {
            let query = search_query(raw_input);
            if query.is_empty() {
                return skills.iter().collect();
            }
            skills
                .iter()
                .filter(|skill| matches_query(skill, &query))
                .collect()
        }
        InputMode::Direct | InputMode::Task => skills
            .iter()
            .filter(|skill| matches_name(skill, &parsed.skill_name))
            .collect(),
    }
}

fn matches_query(skill: &Skill, query: &str) -> bool {
    skill.name.to_lowercase().contains(query)
        || skill
            .display_name
            .as_deref()
            .is_some_and(|display| display.to_lowercase().contains(query))
}

fn matches_name(skill: &Skill, skill_name: &str) -> bool {
    skill.name == skill_name || skill.name.starts_with(skill_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;
    use pretty_assertions::assert_eq;

    fn catalog() -> Vec<Skill> {
        vec![
            Skill::new("commit").with_display_name("Git Commit"),
            Skill::new("review-pr").with_description("Review a commit range"),
            Skill::new("test"),
            Skill::new("commit-push"),
        ]
    }

    fn names(skills: &[&Skill]) -> Vec<String> {
        skills.iter().map(|s| s.name.clone()).collect()
    }

    fn run(skills: &[Skill], raw: &str) -> Vec<String> {
        names(&filter(skills, &parse(raw), raw))
    }

    #[test]
    fn test_empty_search_returns_everything_in_order() {
        let skills = catalog();
        assert_eq!(run(&skills, ""), vec!["commit", "review-pr", "test", "commit-push"]);
    }

    #[test]
    fn test_search_matches_name_and_display_name() {
        let skills = catalog();
        assert_eq!(run(&skills, "COMMIT"), vec!["commit", "commit-push"]);
        assert_eq!(run(&skills, "git"), vec!["commit"]);
    }

    #[test]
    fn test_search_ignores_description() {
        let skills = catalog();
        assert_eq!(run(&skills, "range"), Vec::<String>::new());
    }

    #[test]
    fn test_direct_mode_prefix_match_is_case_sensitive() {
        let skills = catalog();
        assert_eq!(run(&skills, "/comm"), vec!["commit", "commit-push"]);
        assert_eq!(run(&skills, "/Commit"), Vec::<String>::new());
    }

    #[test]
    fn test_task_mode_filters_by_name_only() {
        let skills = catalog();
        assert_eq!(run(&skills, "/test the parser"), vec!["test"]);
    }

    #[test]
    fn test_lone_slash_matches_everything() {
        let skills = catalog();
        assert_eq!(run(&skills, "/"), vec!["commit", "review-pr", "test", "commit-push"]);
    }

    #[test]
    fn test_filter_is_repeatable() {
        let skills = catalog();
        let parsed = parse("/co");
        assert_eq!(filter(&skills, &parsed, "/co"), filter(&skills, &parsed, "/co"));
    }
}
