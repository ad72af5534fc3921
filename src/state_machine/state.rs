//! Conversation state types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a user in the menu conversation.
///
/// Each variant carries a stable numeric code. Menu tables refer to their
/// successor step by code so that an operator-edited catalog can be loaded
/// without recompiling; codes outside the known range are handled by the
/// transition function as a reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvState {
    /// Waiting for the start keyword
    #[default]
    Idle,
    /// Welcome menu was shown, waiting for an option number
    MainMenu,
    /// Info was shown, waiting for "ya" or "tidak"
    ContinueOrExit,
    /// Service sub-menu was shown, waiting for an option number
    ServiceMenu,
}

impl ConvState {
    #[cfg(test)]
    pub const ALL: [ConvState; 4] = [
        ConvState::Idle,
        ConvState::MainMenu,
        ConvState::ContinueOrExit,
        ConvState::ServiceMenu,
    ];

    pub fn code(self) -> u8 {
        match self {
            ConvState::Idle => 0,
            ConvState::MainMenu => 1,
            ConvState::ContinueOrExit => 2,
            ConvState::ServiceMenu => 3,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(ConvState::Idle),
            1 => Some(ConvState::MainMenu),
            2 => Some(ConvState::ContinueOrExit),
            3 => Some(ConvState::ServiceMenu),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ConvState::Idle => "idle",
            ConvState::MainMenu => "main_menu",
            ConvState::ContinueOrExit => "continue_or_exit",
            ConvState::ServiceMenu => "service_menu",
        }
    }
}

impl fmt::Display for ConvState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
