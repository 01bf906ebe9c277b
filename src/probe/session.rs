//! Probe run planning and execution.
//!
//! # Responsibilities
//! - Build the base request from configuration
//! - Clamp the size bounds to what padding can actually reach
//! - Run either one probe or a full detection
//! - Write the initial request and the final response to the output
//!
//! # Design Decisions
//! - The session owns the transport and output for one run
//! - The output only receives wire dumps; progress goes to the log

use std::io::Write;

use crate::config::{ProbeConfig, ProberConfig};
use crate::http::{measure, ProbeRequest};
use crate::net::transport::Transport;
use crate::probe::bisection::{send_padded, BisectionController};
use crate::probe::padding::MINIMUM_OVERHEAD;
use crate::probe::types::{Detection, ProbeError};

/// Effective size range for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeBounds {
    pub min: usize,
    pub max: usize,
}

/// What a completed run found.
#[derive(Debug, Clone)]
pub enum RunReport {
    /// One probe at the maximum size.
    Single { size: usize, status: u16 },
    /// Detection result.
    Detected(Detection),
}

/// Build the unpadded request described by the configuration.
pub fn base_request(config: &ProberConfig) -> ProbeRequest {
    let target = &config.target;
    let mut request = ProbeRequest::new(target.method.clone(), target.url.clone());
    if !target.user_agent.is_empty() {
        request.headers.set("User-Agent", target.user_agent.clone());
    }
    request.headers.set("Connection", "close");
    request
}

/// Clamp the configured bounds against the baseline request size.
pub fn plan_bounds(baseline: usize, probe: &ProbeConfig) -> SizeBounds {
    let mut max = probe.max_size;
    if max == baseline {
        tracing::info!(baseline, "No need for further padding");
    } else if max < baseline || max - baseline < MINIMUM_OVERHEAD {
        tracing::warn!(
            baseline,
            max_size = max,
            "Unable to add additional padding, probing the baseline size only"
        );
        max = baseline;
    }
    let min = probe.min_size.max(baseline).min(max);
    SizeBounds { min, max }
}

/// One probe run against one target.
pub struct ProbeSession<T, W> {
    config: ProberConfig,
    transport: T,
    output: W,
}

impl<T: Transport, W: Write> ProbeSession<T, W> {
    pub fn new(config: ProberConfig, transport: T, output: W) -> Self {
        Self {
            config,
            transport,
            output,
        }
    }

    /// Execute the run described by the configuration.
    pub async fn run(&mut self) -> Result<RunReport, ProbeError> {
        let request = base_request(&self.config);
        tracing::info!(url = %self.config.target.url, "Initial request:");
        request.write_to(&mut self.output)?;
        self.output.flush()?;

        let baseline = measure(&request);
        let bounds = plan_bounds(baseline, &self.config.probe);
        let max_line = self.config.probe.max_line;
        tracing::debug!(
            baseline,
            min = bounds.min,
            max = bounds.max,
            max_line,
            "Planned size bounds"
        );

        if self.config.probe.detect {
            let mut controller = BisectionController::new(
                &mut self.transport,
                &self.config.status,
                &self.config.retries,
            );
            let detection = controller
                .detect(&request, max_line, bounds.min, bounds.max)
                .await?;
            detection.response.write_to(&mut self.output)?;
            self.output.flush()?;
            Ok(RunReport::Detected(detection))
        } else {
            let probe = send_padded(&mut self.transport, &request, max_line, bounds.max).await?;
            tracing::info!(size = probe.delivered, "Request size");
            tracing::info!(status = probe.response.status, "Response received");
            probe.response.write_to(&mut self.output)?;
            self.output.flush()?;
            Ok(RunReport::Single {
                size: probe.delivered,
                status: probe.response.status,
            })
        }
    }

    /// Consume the session, returning the output sink.
    pub fn into_output(self) -> W {
        self.output
    }
}
