//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the executor with mock implementations.

use crate::media::MediaAsset;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Failure to deliver something through the chat transport
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Send timed out after {0:?}")]
    Timeout(Duration),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Gateway rejected request (HTTP {status}): {body}")]
    Rejected { status: u16, body: String },

    #[error("No media asset loaded")]
    MediaUnavailable,
}

/// Outbound side of the chat transport
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send a text message to a chat
    async fn reply_text(&self, to: &str, text: &str) -> Result<(), TransportError>;

    /// Send an image with a caption to a chat
    async fn send_media(
        &self,
        to: &str,
        media: &MediaAsset,
        caption: &str,
    ) -> Result<(), TransportError>;
}

/// Connection lifecycle of the chat transport
#[async_trait]
pub trait ChatConnection: Send + Sync {
    /// Start (or restart) the connection; a pairing code may follow
    async fn initialize(&self) -> Result<(), TransportError>;

    /// Close the connection before shutdown
    async fn destroy(&self) -> Result<(), TransportError>;
}

/// Out-of-band notifications to an operator
#[async_trait]
pub trait AdminNotifier: Send + Sync {
    async fn notify(&self, text: &str);
}

// ============================================================================
// Arc implementations for trait objects
// ============================================================================

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    async fn reply_text(&self, to: &str, text: &str) -> Result<(), TransportError> {
        (**self).reply_text(to, text).await
    }

    async fn send_media(
        &self,
        to: &str,
        media: &MediaAsset,
        caption: &str,
    ) -> Result<(), TransportError> {
        (**self).send_media(to, media, caption).await
    }
}

#[async_trait]
impl<T: ChatConnection + ?Sized> ChatConnection for Arc<T> {
    async fn initialize(&self) -> Result<(), TransportError> {
        (**self).initialize().await
    }

    async fn destroy(&self) -> Result<(), TransportError> {
        (**self).destroy().await
    }
}

#[async_trait]
impl<T: AdminNotifier + ?Sized> AdminNotifier for Arc<T> {
    async fn notify(&self, text: &str) {
        (**self).notify(text).await;
    }
}

// ============================================================================
// Notifier implementations
// ============================================================================

/// Notifier used when no admin address is configured
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

#[async_trait]
impl AdminNotifier for NoopNotifier {
    async fn notify(&self, text: &str) {
        tracing::debug!(text, "Admin notification skipped (no admin configured)");
    }
}

/// Sends admin notifications as chat messages to a fixed address
pub struct TransportNotifier<T: ChatTransport> {
    transport: T,
    admin: String,
}

impl<T: ChatTransport> TransportNotifier<T> {
    pub fn new(transport: T, admin: impl Into<String>) -> Self {
        Self {
            transport,
            admin: admin.into(),
        }
    }
}

#[async_trait]
impl<T: ChatTransport> AdminNotifier for TransportNotifier<T> {
    async fn notify(&self, text: &str) {
        if let Err(e) = self.transport.reply_text(&self.admin, text).await {
            tracing::error!(admin = %self.admin, error = %e, "Failed to notify admin");
        }
    }
}
