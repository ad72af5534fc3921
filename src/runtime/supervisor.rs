//! Transport event loop
//!
//! Messages are handled one at a time in arrival order. Lifecycle events keep
//! the connection alive: a disconnect is followed by a delayed
//! re-initialization, an authentication failure discards the local pairing
//! credentials first so a fresh pairing code is issued.

use super::executor::BotRuntime;
use super::traits::{AdminNotifier, ChatConnection, ChatTransport};
use super::{InboundMessage, TransportEvent};
use futures::FutureExt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct Supervisor<T, C>
where
    T: ChatTransport + 'static,
    C: ChatConnection + 'static,
{
    runtime: Arc<BotRuntime<T>>,
    connection: Arc<C>,
    notifier: Arc<dyn AdminNotifier>,
    /// Local directory holding paired-session credentials
    auth_dir: PathBuf,
    reconnect_delay: Duration,
    pending_init: Option<JoinHandle<()>>,
}

impl<T, C> Supervisor<T, C>
where
    T: ChatTransport + 'static,
    C: ChatConnection + 'static,
{
    pub fn new(
        runtime: Arc<BotRuntime<T>>,
        connection: Arc<C>,
        notifier: Arc<dyn AdminNotifier>,
        auth_dir: PathBuf,
        reconnect_delay: Duration,
    ) -> Self {
        Self {
            runtime,
            connection,
            notifier,
            auth_dir,
            reconnect_delay,
            pending_init: None,
        }
    }

    /// Initialize the connection and process events until `shutdown`
    /// resolves or the event channel closes. The connection is destroyed
    /// before returning.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<TransportEvent>,
        shutdown: impl Future<Output = ()>,
    ) {
        self.schedule_initialize(Duration::ZERO);
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => {
                        tracing::info!("Transport event channel closed");
                        break;
                    }
                },
                () = &mut shutdown => {
                    tracing::info!("Shutting down bot");
                    break;
                }
            }
        }

        if let Some(task) = self.pending_init.take() {
            task.abort();
        }
        if let Err(e) = self.connection.destroy().await {
            tracing::error!(error = %e, "Failed to close transport connection");
        }
    }

    async fn handle_event(&mut self, event: TransportEvent) {
        match event {
            TransportEvent::Message(message) => self.handle_message(message).await,
            TransportEvent::Qr { code } => {
                tracing::info!(code = %code, "Pairing code received, scan it to link the device");
            }
            TransportEvent::Authenticated => tracing::info!("Authenticated"),
            TransportEvent::Ready => tracing::info!("Bot ready"),
            TransportEvent::AuthFailure { reason } => {
                tracing::error!(reason = %reason, "Authentication failed");
                self.discard_credentials().await;
                tracing::info!("Re-initializing to obtain a new pairing code");
                self.schedule_initialize(Duration::ZERO);
            }
            TransportEvent::Disconnected { reason } => {
                tracing::warn!(reason = %reason, "Transport disconnected");
                self.schedule_initialize(self.reconnect_delay);
            }
        }
    }

    /// Handle a message, turning a panic into an apology for that user only
    async fn handle_message(&self, message: InboundMessage) {
        let outcome = AssertUnwindSafe(self.runtime.handle_message(&message))
            .catch_unwind()
            .await;

        if let Err(panic) = outcome {
            let detail = panic_message(&*panic);
            tracing::error!(user_id = %message.from, panic = %detail, "Panic while handling message");
            self.runtime.send_apology(&message.from).await;
            self.notifier
                .notify(&format!("Terjadi kesalahan tidak tertangani: {detail}"))
                .await;
        }
    }

    async fn discard_credentials(&self) {
        match tokio::fs::remove_dir_all(&self.auth_dir).await {
            Ok(()) => {
                tracing::info!(path = %self.auth_dir.display(), "Removed local session credentials");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::error!(
                    path = %self.auth_dir.display(),
                    error = %e,
                    "Failed to remove local session credentials"
                );
            }
        }
    }

    /// Initialize the connection after `delay`, retrying at the reconnect
    /// delay until it succeeds. Replaces any pending attempt.
    fn schedule_initialize(&mut self, delay: Duration) {
        if let Some(task) = self.pending_init.take() {
            task.abort();
        }

        let connection = Arc::clone(&self.connection);
        let retry_delay = self.reconnect_delay;
        self.pending_init = Some(tokio::spawn(async move {
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            loop {
                tracing::info!("Connecting to chat transport");
                match connection.initialize().await {
                    Ok(()) => break,
                    Err(e) => {
                        tracing::warn!(error = %e, retry_in = ?retry_delay, "Transport initialization failed");
                        tokio::time::sleep(retry_delay).await;
                    }
                }
            }
        }));
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
