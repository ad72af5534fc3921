//! Effects produced by state transitions

/// Effects to be executed after state transition, in order
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Reply with a plain text message
    ReplyText { text: String },

    /// Follow-up prompt after a reply. Delivery is best-effort: a failure is
    /// logged and the step still commits.
    Prompt { text: String },

    /// Send the welcome image with a caption
    SendWelcome { caption: String },

    /// A menu option pointed at a step code that does not exist
    ReportInvalidStep { code: u8 },
}

impl Effect {
    pub fn reply(text: impl Into<String>) -> Self {
        Effect::ReplyText { text: text.into() }
    }

    pub fn prompt(text: impl Into<String>) -> Self {
        Effect::Prompt { text: text.into() }
    }

    pub fn welcome(caption: impl Into<String>) -> Self {
        Effect::SendWelcome {
            caption: caption.into(),
        }
    }

    /// Whether this effect results in a message to the user
    #[cfg(test)]
    pub fn is_outbound(&self) -> bool {
        matches!(
            self,
            Effect::ReplyText { .. } | Effect::Prompt { .. } | Effect::SendWelcome { .. }
        )
    }
}
