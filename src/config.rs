//! Configuration from environment variables

use std::path::PathBuf;
use std::time::Duration;

/// Runtime configuration, read once at startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BotConfig {
    /// `production` disables console log output
    pub environment: String,
    pub log_dir: PathBuf,
    pub image_path: PathBuf,
    /// Optional JSON override for the built-in content catalog
    pub content_path: Option<PathBuf>,
    /// Local directory holding paired-session credentials
    pub auth_dir: PathBuf,
    pub gateway_url: String,
    pub gateway_session: String,
    pub gateway_api_key: Option<String>,
    pub webhook_port: u16,
    pub send_timeout: Duration,
    pub reconnect_delay: Duration,
    /// Chat address that receives operator notifications
    pub admin_number: Option<String>,
    /// Problems found while parsing, reported once logging is up
    pub warnings: Vec<String>,
}

impl BotConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut warnings = Vec::new();
        let mut number = |key: &str, default: u64| -> u64 {
            match get(key) {
                None => default,
                Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
                    warnings.push(format!("{key}={raw:?} is not a number, using {default}"));
                    default
                }),
            }
        };

        let webhook_port = number("TINOBU_WEBHOOK_PORT", 8080);
        let send_timeout = Duration::from_secs(number("TINOBU_SEND_TIMEOUT_SECS", 30));
        let reconnect_delay = Duration::from_secs(number("TINOBU_RECONNECT_DELAY_SECS", 5));
        let webhook_port = u16::try_from(webhook_port).unwrap_or_else(|_| {
            warnings.push(format!("TINOBU_WEBHOOK_PORT={webhook_port} is out of range, using 8080"));
            8080
        });

        Self {
            environment: get("TINOBU_ENV").unwrap_or_else(|| "development".to_string()),
            log_dir: get("TINOBU_LOG_DIR").map_or_else(|| PathBuf::from("."), PathBuf::from),
            image_path: get("TINOBU_IMAGE_PATH")
                .map_or_else(|| PathBuf::from("images/desa.jpg"), PathBuf::from),
            content_path: get("TINOBU_CONTENT_PATH").map(PathBuf::from),
            auth_dir: get("TINOBU_AUTH_DIR")
                .map_or_else(|| PathBuf::from(".wwebjs_auth/client-one"), PathBuf::from),
            gateway_url: get("TINOBU_GATEWAY_URL")
                .unwrap_or_else(|| "http://127.0.0.1:3000".to_string()),
            gateway_session: get("TINOBU_GATEWAY_SESSION")
                .unwrap_or_else(|| "client-one".to_string()),
            gateway_api_key: get("TINOBU_GATEWAY_API_KEY"),
            webhook_port,
            send_timeout,
            reconnect_delay,
            admin_number: get("ADMIN_NUMBER"),
            warnings,
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}
