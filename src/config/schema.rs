//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the prober.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};
use url::Url;

/// Default maximum header line length.
pub const DEFAULT_MAX_LINE: usize = 8192;

/// Default maximum probe size: four full default lines plus slack.
pub const DEFAULT_MAX_SIZE: usize = DEFAULT_MAX_LINE * 4 + 127;

/// Root configuration for a probe run.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ProberConfig {
    /// Target request settings.
    pub target: TargetConfig,

    /// Size bounds and mode.
    pub probe: ProbeConfig,

    /// Status code overrides.
    pub status: StatusConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Backoff between transient-error retries.
    pub retries: RetryConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// What to send.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Target URL (http or https).
    pub url: Url,

    /// HTTP method.
    pub method: String,

    /// User-Agent header value. Empty omits the header.
    pub user_agent: String,
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: Url::parse("http://localhost/").expect("static URL is valid"),
            method: "HEAD".to_string(),
            user_agent: String::new(),
        }
    }
}

/// Probe size bounds.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Search for the maximum accepted size instead of sending one probe.
    pub detect: bool,

    /// Lower bound of the search (raised to the baseline request size).
    pub min_size: usize,

    /// Upper bound of the search, or the single probe size.
    pub max_size: usize,

    /// Maximum length of one synthetic header line.
    pub max_line: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            detect: false,
            min_size: 0,
            max_size: DEFAULT_MAX_SIZE,
            max_line: DEFAULT_MAX_LINE,
        }
    }
}

/// Additional status codes for classification.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct StatusConfig {
    /// Extra status counted as success.
    pub ok_code: Option<u16>,

    /// Extra status counted as rejection.
    pub bad_code: Option<u16>,
}

/// Timeout configuration for network operations.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Connection establishment (and TLS handshake) timeout in seconds.
    pub connect_secs: u64,

    /// Timeout for each write or read on the connection in seconds.
    pub read_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            connect_secs: 10,
            read_secs: 30,
        }
    }
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Base delay for exponential backoff in milliseconds. 0 disables it.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay_ms: 250,
            max_delay_ms: 2000,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
