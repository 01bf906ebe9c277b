//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML, optional)
//!     → loader.rs (parse & deserialize)
//!     → command-line overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → ProberConfig (validated, immutable for the run)
//! ```
//!
//! # Design Decisions
//! - Config is validated once, before the first probe
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, read_config, ConfigError};
pub use schema::{
    ObservabilityConfig, ProbeConfig, ProberConfig, RetryConfig, StatusConfig, TargetConfig,
    TimeoutConfig,
};
pub use validation::{validate_config, ValidationError};
