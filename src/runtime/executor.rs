//! Conversation runtime executor

use super::traits::{ChatTransport, TransportError};
use super::InboundMessage;

use crate::content::Catalog;
use crate::media::MediaAsset;
use crate::sessions::SessionStore;
use crate::state_machine::{transition, ConvState, Effect, Event};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Bounds applied to every outbound send
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SendPolicy {
    pub timeout: Duration,
    /// Total tries per send, including the first
    pub attempts: u32,
}

impl Default for SendPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            attempts: 2,
        }
    }
}

/// Applies transitions for inbound messages and delivers their replies.
///
/// The session store is shared; the transport is whatever implements
/// `ChatTransport`.
pub struct BotRuntime<T>
where
    T: ChatTransport + 'static,
{
    store: Arc<SessionStore>,
    catalog: Arc<Catalog>,
    media: Option<Arc<MediaAsset>>,
    transport: T,
    policy: SendPolicy,
}

impl<T> BotRuntime<T>
where
    T: ChatTransport + 'static,
{
    pub fn new(store: Arc<SessionStore>, catalog: Arc<Catalog>, transport: T) -> Self {
        Self {
            store,
            catalog,
            media: None,
            transport,
            policy: SendPolicy::default(),
        }
    }

    /// Set the welcome image. `None` keeps media sends failing.
    pub fn with_media(mut self, media: Option<MediaAsset>) -> Self {
        self.media = media.map(Arc::new);
        self
    }

    pub fn with_send_policy(mut self, policy: SendPolicy) -> Self {
        self.policy = policy;
        self
    }

    #[cfg(test)]
    pub fn store(&self) -> &Arc<SessionStore> {
        &self.store
    }

    /// Handle one inbound message end to end.
    ///
    /// On failure the user gets the generic apology, their step is left as it
    /// was, and the error is returned for the caller's information only.
    pub async fn handle_message(&self, message: &InboundMessage) -> Result<ConvState, TransportError> {
        match self.process_message(message).await {
            Ok(step) => Ok(step),
            Err(e) => {
                tracing::error!(user_id = %message.from, error = %e, "Error handling message");
                self.send_apology(&message.from).await;
                Err(e)
            }
        }
    }

    /// Best-effort generic apology; failures are only logged
    pub async fn send_apology(&self, to: &str) {
        let text = &self.catalog.generic_apology;
        if let Err(e) = self.deliver(|| self.transport.reply_text(to, text)).await {
            tracing::error!(user_id = %to, error = %e, "Failed to send apology");
        }
    }

    async fn process_message(&self, message: &InboundMessage) -> Result<ConvState, TransportError> {
        let session = self.store.get_or_create(&message.from, Instant::now()).await;

        // Pure state transition
        let result = transition(session.step, &self.catalog, Event::user_message(&message.body));

        tracing::debug!(
            user_id = %message.from,
            from = %session.step,
            to = %result.new_state,
            effects = result.effects.len(),
            "Transition"
        );

        // Replies go out in order; the step is committed once the required ones arrived
        for effect in result.effects {
            self.execute_effect(&message.from, effect).await?;
        }

        if !self
            .store
            .set_step(&message.from, result.new_state, Instant::now())
            .await
        {
            tracing::warn!(user_id = %message.from, step = %result.new_state, "Session was swept mid-message, re-created");
        }
        Ok(result.new_state)
    }

    async fn execute_effect(&self, to: &str, effect: Effect) -> Result<(), TransportError> {
        match effect {
            Effect::ReplyText { text } => self.deliver(|| self.transport.reply_text(to, &text)).await,
            Effect::Prompt { text } => {
                if let Err(e) = self.deliver(|| self.transport.reply_text(to, &text)).await {
                    tracing::warn!(user_id = %to, error = %e, "Failed to send prompt");
                }
                Ok(())
            }
            Effect::SendWelcome { caption } => {
                let media = self
                    .media
                    .as_deref()
                    .ok_or(TransportError::MediaUnavailable)?;
                self.deliver(|| self.transport.send_media(to, media, &caption))
                    .await
            }
            Effect::ReportInvalidStep { code } => {
                tracing::error!(user_id = %to, code, "Invalid step code, resetting to idle");
                Ok(())
            }
        }
    }

    /// Run a send with the policy's timeout, retrying on failure
    async fn deliver<F, Fut>(&self, mut send: F) -> Result<(), TransportError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<(), TransportError>>,
    {
        let mut attempt = 1;
        loop {
            let result = match tokio::time::timeout(self.policy.timeout, send()).await {
                Ok(result) => result,
                Err(_) => Err(TransportError::Timeout(self.policy.timeout)),
            };

            match result {
                Ok(()) => return Ok(()),
                Err(e) if attempt < self.policy.attempts => {
                    tracing::warn!(attempt, error = %e, "Send failed, retrying");
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
