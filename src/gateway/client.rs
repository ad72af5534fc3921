//! REST client for the gateway

use super::types::{FilePayload, SendImageRequest, SendTextRequest};
use crate::media::MediaAsset;
use crate::runtime::{ChatConnection, ChatTransport, TransportError};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub base_url: String,
    pub session: String,
    pub api_key: Option<String>,
    /// Upper bound for a single HTTP request
    pub request_timeout: Duration,
}

/// Gateway-backed chat transport and connection
pub struct GatewayClient {
    client: Client,
    base_url: String,
    session: String,
    api_key: Option<String>,
    request_timeout: Duration,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session: config.session,
            api_key: config.api_key,
            request_timeout: config.request_timeout,
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: Option<&B>,
    ) -> Result<(), TransportError> {
        let mut request = self.client.post(self.url(path));
        if let Some(key) = &self.api_key {
            request = request.header("X-Api-Key", key);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(self.request_timeout)
            } else if e.is_connect() {
                TransportError::Network(format!("Connection failed: {e}"))
            } else {
                TransportError::Network(format!("Request failed: {e}"))
            }
        })?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        tracing::warn!(path, status = status.as_u16(), "Gateway rejected request");
        Err(TransportError::Rejected {
            status: status.as_u16(),
            body,
        })
    }

    fn session_path(&self, action: &str) -> String {
        format!("/api/sessions/{}/{action}", self.session)
    }
}

#[async_trait]
impl ChatTransport for GatewayClient {
    async fn reply_text(&self, to: &str, text: &str) -> Result<(), TransportError> {
        let request = SendTextRequest {
            session: &self.session,
            chat_id: to,
            text,
        };
        self.post("/api/sendText", Some(&request)).await
    }

    async fn send_media(
        &self,
        to: &str,
        media: &MediaAsset,
        caption: &str,
    ) -> Result<(), TransportError> {
        let request = SendImageRequest {
            session: &self.session,
            chat_id: to,
            caption,
            file: FilePayload {
                mimetype: &media.mime_type,
                filename: &media.filename,
                data: media.to_base64(),
            },
        };
        self.post("/api/sendImage", Some(&request)).await
    }
}

#[async_trait]
impl ChatConnection for GatewayClient {
    async fn initialize(&self) -> Result<(), TransportError> {
        tracing::info!(session = %self.session, "Starting gateway session");
        self.post::<()>(&self.session_path("start"), None).await
    }

    async fn destroy(&self) -> Result<(), TransportError> {
        tracing::info!(session = %self.session, "Stopping gateway session");
        self.post::<()>(&self.session_path("stop"), None).await
    }
}
