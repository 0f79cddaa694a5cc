//! Raw input classification
//!
//! Supported formats:
//! - `commit` -> search mode
//! - `/commit` -> direct mode
//! - `/commit fix bug` -> task mode

use skillbar_types::{InputMode, ParsedInput};

/// Prefix that switches the input into command style
pub const COMMAND_PREFIX: char = '/';

/// Parse raw input text into a structured intent
///
/// Total over all strings; the result depends only on `raw`.
pub fn parse(raw: &str) -> ParsedInput {
    let trimmed = raw.trim();

    let Some(command) = trimmed.strip_prefix(COMMAND_PREFIX) else {
        return ParsedInput::search();
    };

    // Whitespace right after the prefix leaves the name empty.
    let (skill_name, rest) = match command.find(char::is_whitespace) {
        Some(at) => command.split_at(at),
        None => (command, ""),
    };
    let skill_name = skill_name.to_string();
    let task = rest.split_whitespace().collect::<Vec<_>>().join(" ");

    if task.is_empty() {
        ParsedInput {
            mode: InputMode::Direct,
            skill_name,
            task: None,
        }
    } else {
        ParsedInput {
            mode: InputMode::Task,
            skill_name,
            task: Some(task),
        }
    }
}

/// Lowercased, trimmed query used by search mode
pub fn search_query(raw: &str) -> String {
    raw.trim().to_lowercase()
}
