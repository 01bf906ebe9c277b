//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (main.rs):
//!     Parse CLI → Load config → Validate → Init logging → Build transport
//!
//! Run:
//!     ProbeSession::run raced against signals::interrupt
//!
//! Exit:
//!     Ok → 0, any fatal error or interrupt → non-zero
//! ```

pub mod signals;
