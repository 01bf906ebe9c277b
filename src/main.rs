//! HTTP header size prober.
//!
//! Sends requests padded to exact sizes through an HTTP intermediary and
//! reports the largest total header size it accepts.
//!
//! # Architecture Overview
//!
//! ```text
//!   CLI + config file
//!          │
//!          ▼
//!   ┌──────────────┐     ┌──────────────┐     ┌──────────────┐
//!   │ ProbeSession │────▶│  Bisection   │────▶│   Padding    │
//!   │ (bounds,mode)│     │  controller  │     │  generator   │
//!   └──────────────┘     └──────┬───────┘     └──────────────┘
//!                               │  ▲
//!                     request   ▼  │ status
//!                        ┌──────────────┐      ┌──────────────┐
//!                        │ TcpTransport │─────▶│ intermediary │
//!                        │  (TCP/TLS)   │◀─────│ under test   │
//!                        └──────────────┘      └──────────────┘
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use url::Url;

use header_prober::config::{read_config, validate_config, ConfigError, ProberConfig};
use header_prober::lifecycle::signals;
use header_prober::observability::{logging, metrics};
use header_prober::{ProbeSession, RunReport, TcpTransport};

#[derive(Parser, Debug)]
#[command(name = "header-prober")]
#[command(about = "Detect the maximum request header size an HTTP intermediary accepts", long_about = None)]
struct Cli {
    /// TOML configuration file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Target URL
    #[arg(long)]
    url: Option<Url>,

    /// HTTP method
    #[arg(long)]
    method: Option<String>,

    /// User-Agent header (empty omits it)
    #[arg(long)]
    user_agent: Option<String>,

    /// Minimum header size for auto-detection
    #[arg(long)]
    min_size: Option<usize>,

    /// Maximum header size
    #[arg(long)]
    max_size: Option<usize>,

    /// Maximum header line size
    #[arg(long)]
    max_line: Option<usize>,

    /// Detect maximum header size
    #[arg(long)]
    detect: bool,

    /// Additional HTTP status code for success
    #[arg(long)]
    code_ok: Option<u16>,

    /// Additional HTTP status code for failure
    #[arg(long)]
    code_bad: Option<u16>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

impl Cli {
    /// Overlay command-line values on `config`.
    fn apply(self, config: &mut ProberConfig) {
        if let Some(url) = self.url {
            config.target.url = url;
        }
        if let Some(method) = self.method {
            config.target.method = method;
        }
        if let Some(user_agent) = self.user_agent {
            config.target.user_agent = user_agent;
        }
        if let Some(min_size) = self.min_size {
            config.probe.min_size = min_size;
        }
        if let Some(max_size) = self.max_size {
            config.probe.max_size = max_size;
        }
        if let Some(max_line) = self.max_line {
            config.probe.max_line = max_line;
        }
        if self.detect {
            config.probe.detect = true;
        }
        if self.code_ok.is_some() {
            config.status.ok_code = self.code_ok;
        }
        if self.code_bad.is_some() {
            config.status.bad_code = self.code_bad;
        }
        if let Some(log_level) = self.log_level {
            config.observability.log_level = log_level;
        }
    }

    fn into_config(self) -> Result<ProberConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => ProberConfig::default(),
        };
        self.apply(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match Cli::parse().into_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("header-prober: {}", e);
            return ExitCode::from(2);
        }
    };

    logging::init(&config.observability);
    metrics::describe();

    tracing::info!(
        url = %config.target.url,
        method = %config.target.method,
        detect = config.probe.detect,
        min_size = config.probe.min_size,
        max_size = config.probe.max_size,
        max_line = config.probe.max_line,
        "Configuration loaded"
    );

    let transport = match TcpTransport::new(&config.timeouts) {
        Ok(transport) => transport,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize transport");
            return ExitCode::FAILURE;
        }
    };

    let mut session = ProbeSession::new(config, transport, io::stdout().lock());
    tokio::select! {
        result = session.run() => match result {
            Ok(RunReport::Detected(detection)) => {
                tracing::info!(
                    size = detection.size,
                    ceiling_reached = detection.ceiling_reached,
                    probes = detection.stats.probes,
                    "Detection complete"
                );
                ExitCode::SUCCESS
            }
            Ok(RunReport::Single { size, status }) => {
                tracing::debug!(size, status, "Probe complete");
                ExitCode::SUCCESS
            }
            Err(e) => {
                tracing::error!(error = %e, "Probe run failed");
                ExitCode::FAILURE
            }
        },
        _ = signals::interrupt() => ExitCode::from(130),
    }
}
