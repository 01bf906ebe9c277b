//! Network transport subsystem.
//!
//! # Data Flow
//! ```text
//! ProbeRequest
//!     → transport.rs (connect, write encoded bytes, read response)
//!         → tls.rs (rustls client for https targets, no ALPN)
//!     → ProbeResponse
//! ```
//!
//! # Design Decisions
//! - A fresh connection per probe; no pooling, no redirects
//! - The core only sees the `Transport` trait

pub mod tls;
pub mod transport;

pub use transport::{TcpTransport, Transport, TransportError};
