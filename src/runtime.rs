//! Runtime for executing conversations
//!
//! The executor applies state-machine effects through the chat transport and
//! commits the resulting step; the supervisor consumes transport events and
//! keeps the connection alive.

mod executor;
mod supervisor;
pub mod traits;


pub use executor::{BotRuntime, SendPolicy};
pub use supervisor::Supervisor;
pub use traits::*;

/// A text message delivered by the chat transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    /// Transport address of the sender, also used as the session key
    pub from: String,
    pub body: String,
}

impl InboundMessage {
    pub fn new(from: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            from: from.into(),
            body: body.into(),
        }
    }
}

/// Everything the chat transport can report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportEvent {
    Message(InboundMessage),
    /// A pairing code to be scanned by the operator
    Qr { code: String },
    Authenticated,
    AuthFailure { reason: String },
    Ready,
    Disconnected { reason: String },
}
