//! Keyboard-driven selection cursor

use skillbar_types::KeyAction;

/// What the caller must do after a key was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavCommand {
    /// Cursor moved or nothing happened
    None,
    /// Execute the candidate at this index
    Execute(usize),
    /// Replace the input with the first candidate's command text
    AutoComplete,
    /// Hide the launcher window
    Dismiss,
}

/// Selection cursor over the ranked candidate list
///
/// Movement wraps in both directions. The cursor stays in `[0, len)`
/// whenever the list is non-empty and is `0` otherwise.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Navigator {
    selected_index: usize,
    len: usize,
}

impl Navigator {
    /// Cursor at the top of a list of `len` candidates
    pub fn new(len: usize) -> Self {
        Self {
            selected_index: 0,
            len,
        }
    }

    /// Highlighted index
    pub fn selected_index(&self) -> usize {
        self.selected_index
    }

    /// Number of candidates the cursor ranges over
    pub fn len(&self) -> usize {
        self.len
    }

    /// No candidates
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Move up, wrapping from the top to the bottom
    pub fn select_previous(&mut self) {
        if self.len > 0 {
            self.selected_index = (self.selected_index + self.len - 1) % self.len;
        }
    }

    /// Move down, wrapping from the bottom to the top
    pub fn select_next(&mut self) {
        if self.len > 0 {
            self.selected_index = (self.selected_index + 1) % self.len;
        }
    }

    /// Point the cursor at `index` (mouse selection); out of range is ignored
    pub fn select(&mut self, index: usize) -> bool {
        if index < self.len {
            self.selected_index = index;
            true
        } else {
            false
        }
    }

    /// New query: cursor back to the top, whatever the new length
    pub fn reset(&mut self, len: usize) {
        self.len = len;
        self.selected_index = 0;
    }

    /// Same query, list length changed: clamp into range
    pub fn set_len(&mut self, len: usize) {
        self.len = len;
        if len == 0 {
            self.selected_index = 0;
        } else if self.selected_index >= len {
            self.selected_index = len - 1;
        }
    }

    /// Apply one key transition
    pub fn handle_key(&mut self, action: KeyAction) -> NavCommand {
        match action {
            KeyAction::Previous => {
                self.select_previous();
                NavCommand::None
            }
            KeyAction::Next => {
                self.select_next();
                NavCommand::None
            }
            KeyAction::Execute if self.len > 0 => NavCommand::Execute(self.selected_index),
            KeyAction::AutoComplete if self.len > 0 => NavCommand::AutoComplete,
            KeyAction::Execute | KeyAction::AutoComplete => NavCommand::None,
            KeyAction::Cancel => NavCommand::Dismiss,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_previous_wraps_to_bottom() {
        let mut nav = Navigator::new(3);
        nav.select_previous();
        assert_eq!(nav.selected_index(), 2);
    }

    #[test]
    fn test_next_wraps_to_top() {
        let mut nav = Navigator::new(3);
        nav.select_next();
        nav.select_next();
        assert_eq!(nav.selected_index(), 2);
        nav.select_next();
        assert_eq!(nav.selected_index(), 0);
    }

    #[test]
    fn test_movement_on_empty_list_is_noop() {
        let mut nav = Navigator::new(0);
        nav.select_next();
        nav.select_previous();
        assert_eq!(nav.selected_index(), 0);
        assert_eq!(nav.handle_key(KeyAction::Execute), NavCommand::None);
        assert_eq!(nav.handle_key(KeyAction::AutoComplete), NavCommand::None);
    }

    #[test]
    fn test_shrinking_list_clamps_cursor() {
        let mut nav = Navigator::new(5);
        nav.select(4);
        nav.set_len(2);
        assert_eq!(nav.selected_index(), 1);
        nav.set_len(0);
        assert_eq!(nav.selected_index(), 0);
    }

    #[test]
    fn test_growing_list_keeps_cursor() {
        let mut nav = Navigator::new(3);
        nav.select(2);
        nav.set_len(6);
        assert_eq!(nav.selected_index(), 2);
    }

    #[test]
    fn test_reset_returns_to_top_even_with_same_length() {
        let mut nav = Navigator::new(3);
        nav.select_next();
        nav.reset(3);
        assert_eq!(nav.selected_index(), 0);
    }

    #[test]
    fn test_key_commands() {
        let mut nav = Navigator::new(3);
        assert_eq!(nav.handle_key(KeyAction::Next), NavCommand::None);
        assert_eq!(nav.handle_key(KeyAction::Execute), NavCommand::Execute(1));
        assert_eq!(nav.handle_key(KeyAction::AutoComplete), NavCommand::AutoComplete);
        assert_eq!(nav.handle_key(KeyAction::Cancel), NavCommand::Dismiss);
        assert_eq!(nav.selected_index(), 1);
    }

    #[test]
    fn test_select_out_of_range_is_ignored() {
        let mut nav = Navigator::new(2);
        assert!(!nav.select(2));
        assert_eq!(nav.selected_index(), 0);
    }
}
