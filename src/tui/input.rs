use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Translate key presses into chat actions
pub struct InputHandler;

impl InputHandler {
    pub fn new() -> Self {
        Self
    }

    /// Process a key event
    pub fn handle_key(&self, key: KeyEvent) -> InputAction {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('c') | KeyCode::Char('q') => InputAction::Quit,
                KeyCode::Char('u') => InputAction::ClearInput,
                _ => InputAction::None,
            };
        }

        match key.code {
            KeyCode::Enter => InputAction::Submit,
            KeyCode::Esc => InputAction::ClearInput,
            KeyCode::Tab => InputAction::NextSuggestion,
            KeyCode::BackTab => InputAction::PrevSuggestion,
            KeyCode::Char(c) => InputAction::Insert(c),
            KeyCode::Backspace => InputAction::Delete,
            KeyCode::Up => InputAction::ScrollUp,
            KeyCode::Down => InputAction::ScrollDown,
            KeyCode::PageUp => InputAction::PageUp,
            KeyCode::PageDown => InputAction::PageDown,
            _ => InputAction::None,
        }
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputAction {
    Submit,
    Quit,
    Insert(char),
    Delete,
    ClearInput,
    NextSuggestion,
    PrevSuggestion,
    ScrollUp,
    ScrollDown,
    PageUp,
    PageDown,
    None,
}
