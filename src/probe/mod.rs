//! Header size probing subsystem.
//!
//! # Data Flow
//! ```text
//! session.rs (base request, size bounds, mode)
//!     → bisection.rs (pick next size)
//!         → padding.rs (inflate request to exact size)
//!         → net::transport (send)
//!         → classifier.rs (Accepted / Rejected / TransientError / Unexpected)
//!     → RunReport
//! ```
//!
//! # Design Decisions
//! - Padding is exact: requested size and delivered size are the same
//!   whenever no shortfall is reported
//! - Classification is a pure function of the status code
//! - Fatal conditions surface as `ProbeError`, never as process exits

pub mod bisection;
pub mod classifier;
pub mod padding;
pub mod session;
pub mod types;

pub use bisection::BisectionController;
pub use classifier::classify;
pub use padding::{pad_request, PaddedRequest};
pub use session::{ProbeSession, RunReport};
pub use types::{Detection, Outcome, ProbeError, ProbeState, ProbeStats};
