//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events on stderr)
//!     → metrics.rs (probe counters, detected size gauge)
//! ```
//!
//! # Design Decisions
//! - Structured fields on every log event (size, status, interval)
//! - Metrics are cheap and optional (facade only)

pub mod logging;
pub mod metrics;
