//! Structured logging.
//!
//! # Responsibilities
//! - Initialize logging subsystem
//! - Configure log level from config, overridable by `RUST_LOG`
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Logs go to stderr; stdout is reserved for the wire dumps

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Filter directive used when `RUST_LOG` is not set.
pub fn default_directive(config: &ObservabilityConfig) -> String {
    format!("header_prober={}", config.log_level)
}

/// Install the global tracing subscriber.
pub fn init(config: &ObservabilityConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(config)));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .try_init();
}
