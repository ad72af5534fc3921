//! Bridge to an HTTP WhatsApp gateway
//!
//! Outbound sends and session lifecycle calls go to the gateway's REST API;
//! inbound messages and connection events arrive on a webhook and are
//! forwarded to the supervisor as `TransportEvent`s.

mod client;
mod types;
mod webhook;

pub use client::{GatewayClient, GatewayConfig};
pub use webhook::{create_router, WebhookState};
