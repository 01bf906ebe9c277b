//! HTTP message handling subsystem.
//!
//! # Data Flow
//! ```text
//! ProberConfig
//!     → request.rs (base ProbeRequest, wire encoding, measure)
//!     → probe::padding (inflate to target size)
//!     → net::transport (write encoded bytes)
//!     → response.rs (parse status, keep raw bytes)
//!     → probe::classifier
//! ```

pub mod request;
pub mod response;

pub use request::{measure, HeaderList, ProbeRequest};
pub use response::ProbeResponse;
