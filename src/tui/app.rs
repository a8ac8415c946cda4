use crate::models::MessageRole;
use crate::session::{Session, Suggestion};

/// Application state
pub struct App {
    /// The conversation being shown
    pub session: Session,
    /// Is the app running?
    pub running: bool,
    /// Lines scrolled up from the bottom of the chat view
    pub scroll_offset: u16,
    /// Furthest the chat view could scroll up at the last draw
    pub max_scroll: u16,
    /// Assistant Service base URL for display
    pub service_url: String,
    /// Status message
    pub status_message: Option<String>,
    /// Offer quick prompts while the conversation is fresh
    pub show_suggestions: bool,
    /// Suggestion most recently placed in the input box
    pub selected_suggestion: Option<usize>,
}

impl App {
    /// Create a new app instance
    pub fn new(session: Session, service_url: impl Into<String>, show_suggestions: bool) -> Self {
        Self {
            session,
            running: true,
            scroll_offset: 0,
            max_scroll: 0,
            service_url: service_url.into(),
            status_message: None,
            show_suggestions,
            selected_suggestion: None,
        }
    }

    /// Suggestions to draw; empty once the conversation has started
    pub fn visible_suggestions(&self) -> &'static [Suggestion] {
        if self.show_suggestions {
            self.session.suggestions()
        } else {
            &[]
        }
    }

    /// Put the next (or previous) suggestion into the input box
    pub fn cycle_suggestion(&mut self, forward: bool) {
        let suggestions = self.visible_suggestions();
        if suggestions.is_empty() {
            return;
        }

        let len = suggestions.len();
        let next = match (self.selected_suggestion, forward) {
            (None, true) => 0,
            (None, false) => len - 1,
            (Some(i), true) => (i + 1) % len,
            (Some(i), false) => (i + len - 1) % len,
        };

        if self.session.select_suggestion(suggestions[next].prompt) {
            self.selected_suggestion = Some(next);
            self.set_status(format!("Suggestion: {} (Enter to send)", suggestions[next].label));
        }
    }

    /// Scroll chat view up
    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(amount).min(self.max_scroll);
    }

    /// Scroll chat view down
    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(amount);
    }

    /// Jump back to the newest message
    pub fn scroll_to_bottom(&mut self) {
        self.scroll_offset = 0;
    }

    /// Set status message
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
    }

    /// Clear status message
    pub fn clear_status(&mut self) {
        self.status_message = None;
    }

    /// Quit the application
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Display name for a role
    pub fn speaker(role: MessageRole) -> &'static str {
        match role {
            MessageRole::User => "You",
            MessageRole::Assistant => "FinanceGuru",
        }
    }
}
