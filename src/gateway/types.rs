//! Gateway wire types

use crate::runtime::{InboundMessage, TransportEvent};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ============================================================
// Outbound requests
// ============================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SendTextRequest<'a> {
    pub session: &'a str,
    pub chat_id: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(super) struct SendImageRequest<'a> {
    pub session: &'a str,
    pub chat_id: &'a str,
    pub caption: &'a str,
    pub file: FilePayload<'a>,
}

#[derive(Debug, Serialize)]
pub(super) struct FilePayload<'a> {
    pub mimetype: &'a str,
    pub filename: &'a str,
    /// Base64-encoded file contents
    pub data: String,
}

// ============================================================
// Inbound webhook
// ============================================================

/// Body of every webhook call: an event name plus an event-specific payload
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    pub event: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

#[derive(Debug, Error)]
pub enum WebhookError {
    #[error("Unknown event: {0}")]
    UnknownEvent(String),

    #[error("Invalid payload for {event}: {source}")]
    InvalidPayload {
        event: String,
        source: serde_json::Error,
    },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MessagePayload {
    from: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    from_me: bool,
}

#[derive(Debug, Deserialize)]
struct QrPayload {
    code: String,
}

#[derive(Debug, Default, Deserialize)]
struct ReasonPayload {
    #[serde(default)]
    reason: String,
}

impl WebhookEnvelope {
    /// Convert to a transport event. `Ok(None)` means the event is
    /// recognized but not forwarded, e.g. the bot's own outgoing messages.
    pub fn into_event(self) -> Result<Option<TransportEvent>, WebhookError> {
        let event = match self.event.as_str() {
            "message" => {
                let message: MessagePayload = self.parse_payload()?;
                if message.from_me {
                    return Ok(None);
                }
                TransportEvent::Message(InboundMessage::new(message.from, message.body))
            }
            "qr" => {
                let qr: QrPayload = self.parse_payload()?;
                TransportEvent::Qr { code: qr.code }
            }
            "authenticated" => TransportEvent::Authenticated,
            "ready" => TransportEvent::Ready,
            "auth_failure" => TransportEvent::AuthFailure {
                reason: self.parse_reason()?,
            },
            "disconnected" => TransportEvent::Disconnected {
                reason: self.parse_reason()?,
            },
            other => return Err(WebhookError::UnknownEvent(other.to_string())),
        };
        Ok(Some(event))
    }

    fn parse_payload<T: serde::de::DeserializeOwned>(&self) -> Result<T, WebhookError> {
        T::deserialize(&self.payload).map_err(|source| WebhookError::InvalidPayload {
            event: self.event.clone(),
            source,
        })
    }

    fn parse_reason(&self) -> Result<String, WebhookError> {
        if self.payload.is_null() {
            return Ok(String::new());
        }
        self.parse_payload::<ReasonPayload>().map(|p| p.reason)
    }
}
