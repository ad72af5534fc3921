//! Structured logging setup
//!
//! JSON lines go to `combined.log` (everything that passes the filter) and
//! `error.log` (errors only) under the configured log directory. Outside
//! production the same events are also printed to the console.

use crate::config::BotConfig;
use std::fs::{File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

pub const COMBINED_LOG: &str = "combined.log";
pub const ERROR_LOG: &str = "error.log";

pub fn init_logging(config: &BotConfig) -> std::io::Result<()> {
    let combined = open_log_file(&config.log_dir, COMBINED_LOG)?;
    let errors = open_log_file(&config.log_dir, ERROR_LOG)?;

    let console = (!config.is_production()).then(|| fmt::layer().with_target(false));

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tinobu_bot=info,tower_http=info".into()),
        )
        .with(
            fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_ansi(false)
                .with_writer(Mutex::new(combined)),
        )
        .with(
            fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_ansi(false)
                .with_writer(Mutex::new(errors))
                .with_filter(LevelFilter::ERROR),
        )
        .with(console)
        .init();

    Ok(())
}

/// Route panics through tracing so they land in the log files
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        tracing::error!(panic = %info, "Panic");
        default_hook(info);
    }));
}

fn open_log_file(dir: &Path, name: &str) -> std::io::Result<File> {
    std::fs::create_dir_all(dir)?;
    OpenOptions::new().create(true).append(true).open(dir.join(name))
}
