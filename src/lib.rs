//! HTTP header size prober library.
//!
//! Finds the largest total request header size an HTTP intermediary
//! accepts by sending requests padded to exact byte sizes and bisecting
//! on the response status.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod observability;
pub mod probe;
pub mod resilience;

pub use config::schema::ProberConfig;
pub use net::TcpTransport;
pub use probe::{ProbeSession, RunReport};
