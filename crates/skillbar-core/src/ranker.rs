//! Final display order: mode filter, then usage ordering

use skillbar_types::{ParsedInput, Skill};

use crate::filter::filter;
use crate::usage::UsageStore;

/// Filter `skills` for the current intent and order them by usage
pub fn rank<'a>(
    skills: &'a [Skill],
    parsed: &ParsedInput,
    raw_input: &str,
    usage: &UsageStore,
) -> Vec<&'a Skill> {
    usage.sorted_skills(filter(skills, parsed, raw_input))
}
