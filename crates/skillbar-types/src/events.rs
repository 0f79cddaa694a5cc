use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Keyboard transitions understood by the navigation controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyAction {
    /// Move the cursor up, wrapping to the bottom
    Previous,
    /// Move the cursor down, wrapping to the top
    Next,
    /// Run the highlighted skill
    Execute,
    /// Replace the input with `/` + first candidate name
    AutoComplete,
    /// Dismiss the launcher window
    Cancel,
}

impl FromStr for KeyAction {
    type Err = String;

    fn from_str(key: &str) -> Result<Self, Self::Err> {
        match key.trim().to_ascii_lowercase().as_str() {
            "arrowup" | "up" => Ok(Self::Previous),
            "arrowdown" | "down" => Ok(Self::Next),
            "enter" | "return" => Ok(Self::Execute),
            "tab" => Ok(Self::AutoComplete),
            "escape" | "esc" => Ok(Self::Cancel),
            other => Err(format!("Unknown key: {}", other)),
        }
    }
}

/// Canonical invocation handed to the execution gateway
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invocation {
    /// Catalog key of the executed skill
    pub skill_name: String,
    /// `name` or `name task`
    pub payload: String,
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.payload)
    }
}

/// Result of feeding one key to the launcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LauncherOutcome {
    /// Nothing to report (cursor moved, or empty list)
    Idle,
    /// Invocation was handed off and usage recorded
    Executed(Invocation),
    /// Input was replaced with the completed command text
    Completed(String),
    /// Caller should hide the launcher window
    Dismissed,
}
