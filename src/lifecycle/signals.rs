//! OS signal handling.
//!
//! # Responsibilities
//! - Wait for SIGINT (Ctrl-C) so a running probe can be abandoned
//!
//! # Design Decisions
//! - Uses Tokio's signal handling (async-safe)
//! - Cancellation is all-or-nothing; there is no partial result

/// Resolve when an interrupt signal is received.
pub async fn interrupt() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Interrupt received, aborting probe run");
}
