//! # Structured Logging Module
//!
//! Environment-aware structured logging for debugging concurrent worker
//! loops and the acking protocol's tolerated races.

use std::sync::OnceLock;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

static LOGGER_INITIALIZED: OnceLock<()> = OnceLock::new();

/// Initialize structured logging once per process.
///
/// The filter comes from `RUST_LOG` (default `info`). Safe to call from
/// every test and every entry point: a second call, or an already-installed
/// global subscriber, is a no-op.
pub fn init_logging() {
    LOGGER_INITIALIZED.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = tracing_subscriber::registry().with(filter).with(
            fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_level(true),
        );

        // Use try_init to avoid a panic if a global subscriber already exists
        // (e.g. a test harness installed one first).
        if subscriber.try_init().is_err() {
            tracing::debug!("Global tracing subscriber already initialized");
        }
    });
}
