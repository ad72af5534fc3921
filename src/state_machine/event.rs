//! Events that can occur in a conversation

/// Events that trigger state transitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A text message arrived from the user
    UserMessage { text: String },
}

impl Event {
    /// Build a user message event, normalizing the raw body.
    pub fn user_message(body: &str) -> Self {
        Event::UserMessage {
            text: normalize_input(body),
        }
    }
}

/// Trim surrounding whitespace and lowercase, so menu tokens match exactly.
pub fn normalize_input(body: &str) -> String {
    body.trim().to_lowercase()
}
