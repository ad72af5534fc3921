//! Tinobu village information bot
//!
//! A menu-driven WhatsApp chatbot. Each user walks a small state machine
//! (idle, main menu, continue-or-exit, service menu); sessions are kept in
//! memory and expire after a day of inactivity.

mod config;
mod content;
mod gateway;
mod logging;
mod media;
mod runtime;
mod sessions;
mod shutdown;
mod state_machine;

use config::BotConfig;
use content::Catalog;
use gateway::{create_router, GatewayClient, GatewayConfig, WebhookState};
use media::MediaAsset;
use runtime::{AdminNotifier, BotRuntime, NoopNotifier, SendPolicy, Supervisor, TransportNotifier};
use sessions::{SessionStore, SESSION_TTL, SWEEP_INTERVAL};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

const EVENT_QUEUE_CAPACITY: usize = 256;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = BotConfig::from_env();

    logging::init_logging(&config)?;
    logging::install_panic_hook();
    for warning in &config.warnings {
        tracing::warn!("{warning}");
    }

    let catalog = Arc::new(Catalog::load_or_default(config.content_path.as_deref()));
    let media = MediaAsset::load_optional(&config.image_path).await;

    let store = Arc::new(SessionStore::new());
    let sweeper = store.spawn_sweeper(SWEEP_INTERVAL, SESSION_TTL);

    let gateway = Arc::new(GatewayClient::new(GatewayConfig {
        base_url: config.gateway_url.clone(),
        session: config.gateway_session.clone(),
        api_key: config.gateway_api_key.clone(),
        request_timeout: config.send_timeout,
    })?);

    let runtime = Arc::new(
        BotRuntime::new(Arc::clone(&store), catalog, Arc::clone(&gateway))
            .with_media(media)
            .with_send_policy(SendPolicy {
                timeout: config.send_timeout,
                ..SendPolicy::default()
            }),
    );

    let notifier: Arc<dyn AdminNotifier> = match &config.admin_number {
        Some(admin) => {
            tracing::info!(admin = %admin, "Admin notifications enabled");
            Arc::new(TransportNotifier::new(Arc::clone(&gateway), admin.clone()))
        }
        None => Arc::new(NoopNotifier),
    };

    // Shutdown fans out to the webhook server and the supervisor
    let shutdown = CancellationToken::new();
    tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            shutdown::shutdown_signal().await;
            shutdown.cancel();
        }
    });

    let (events_tx, events_rx) = mpsc::channel(EVENT_QUEUE_CAPACITY);
    let app = create_router(WebhookState::new(events_tx));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.webhook_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, gateway = %config.gateway_url, "Webhook listening");

    let server = tokio::spawn({
        let shutdown = shutdown.clone();
        async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(shutdown.cancelled_owned())
                .await
        }
    });

    let supervisor = Supervisor::new(
        runtime,
        gateway,
        notifier,
        config.auth_dir.clone(),
        config.reconnect_delay,
    );
    supervisor.run(events_rx, shutdown.clone().cancelled_owned()).await;

    // The supervisor also stops when the event channel closes
    shutdown.cancel();
    sweeper.abort();
    server.await??;

    tracing::info!("Bot stopped");
    Ok(())
}
