//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Probe classified as TransientError:
//!     → probe::bisection (count against the run-wide budget)
//!     → backoff.rs (wait, then re-probe the same interval)
//! ```
//!
//! # Design Decisions
//! - Only 5xx responses are retried; transport failures are fatal
//! - Jittered backoff avoids hammering an overloaded intermediary
//! - Timeouts live in the transport; every network step has a deadline

pub mod backoff;
