//! Plain-text rendering of the launcher window

use skillbar_core::glyph::{category_glyph, glyph_for, DEFAULT_GLYPH};
use skillbar_core::{Launcher, Skill};
use std::fmt::Write;

const CURSOR: &str = "▶";
const RECENT: &str = "★";

/// Explicit icon, else the name glyph, else the category glyph
fn glyph(skill: &Skill) -> &str {
    if let Some(icon) = skill.icon.as_deref() {
        return icon;
    }
    match glyph_for(&skill.name) {
        DEFAULT_GLYPH => category_glyph(skill.category.as_deref()),
        glyph => glyph,
    }
}

/// Render the input line, mode hint and ranked candidates
pub fn render(launcher: &Launcher) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "> {}", launcher.raw_input());
    let _ = writeln!(out, "  {}", launcher.placeholder());

    if launcher.candidates().is_empty() {
        let _ = writeln!(out, "  No skills found");
        return out;
    }

    let selected = launcher.selected_index();
    for (index, skill) in launcher.candidates().iter().enumerate() {
        let marker = if index == selected { CURSOR } else { " " };
        let _ = write!(out, "{} {} {}", marker, glyph(skill), skill.label());
        if launcher.is_recent(&skill.name) {
            let _ = write!(out, " {}", RECENT);
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use skillbar_core::UsageStore;

    #[test]
    fn test_render_marks_selection() {
        let launcher = Launcher::new(
            vec![Skill::new("commit"), Skill::new("test")],
            UsageStore::in_memory(),
        );

        let lines: Vec<String> = render(&launcher).lines().map(str::to_string).collect();
        assert_eq!(lines[0], "> ");
        assert_eq!(lines[1], "  Search skills...");
        assert!(lines[2].starts_with(CURSOR));
        assert!(lines[2].ends_with("commit"));
        assert!(lines[3].starts_with(' '));
    }

    #[test]
    fn test_glyph_fallbacks() {
        let mut skill = Skill::new("zzz").with_category("testing");
        assert_eq!(glyph(&skill), "🧪");

        skill.icon = Some("🚀".to_string());
        assert_eq!(glyph(&skill), "🚀");

        assert_eq!(glyph(&Skill::new("commit").with_category("testing")), "🌿");
        assert_eq!(glyph(&Skill::new("zzz")), DEFAULT_GLYPH);
    }

    #[test]
    fn test_render_empty_list() {
        let mut launcher = Launcher::new(vec![Skill::new("commit")], UsageStore::in_memory());
        launcher.set_input("zzz");

        assert!(render(&launcher).contains("No skills found"));
    }

    #[test]
    fn test_render_recent_marker() {
        let usage = UsageStore::in_memory();
        usage.record_usage("test");
        let launcher = Launcher::new(vec![Skill::new("commit"), Skill::new("test")], usage);

        let output = render(&launcher);
        let recent_line = output.lines().find(|l| l.contains("test")).unwrap_or_default();
        assert!(recent_line.ends_with(RECENT));
        let other_line = output.lines().find(|l| l.contains("commit")).unwrap_or_default();
        assert!(!other_line.ends_with(RECENT));
    }
}
