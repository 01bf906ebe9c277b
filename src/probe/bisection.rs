//! Bisection over request sizes.
//!
//! # Responsibilities
//! - Send a reference probe and refuse to run if it is already rejected
//! - Narrow `[low, high]` one padded probe at a time
//! - Retry server errors against a run-wide budget
//! - Report the largest size confirmed as accepted
//!
//! # Design Decisions
//! - Outcome is assumed monotonic in size; the search does not verify it
//! - Exactly one probe in flight; each step depends on the previous one
//! - Every fatal condition is returned as a `ProbeError`

use crate::config::{RetryConfig, StatusConfig};
use crate::http::{ProbeRequest, ProbeResponse};
use crate::net::transport::Transport;
use crate::observability::metrics;
use crate::probe::classifier::{classify, is_rejection};
use crate::probe::padding::pad_request;
use crate::probe::types::{Detection, Outcome, ProbeError, ProbeState, ProbeStats};
use crate::resilience::backoff::wait_before_retry;

/// Server errors tolerated per run before giving up.
pub const MAX_TRANSIENT_ERRORS: u32 = 5;

/// A sent probe and what came back.
#[derive(Debug, Clone)]
pub struct Probe {
    /// Size requested from the padding generator.
    pub target: usize,
    /// Size actually sent.
    pub delivered: usize,
    /// Bytes the padding generator could not add.
    pub shortfall: Option<usize>,
    pub response: ProbeResponse,
}

/// Pad `request` to `size` and send it.
pub async fn send_padded<T: Transport>(
    transport: &mut T,
    request: &ProbeRequest,
    max_line: usize,
    size: usize,
) -> Result<Probe, ProbeError> {
    let padded = pad_request(request, max_line, size);
    let delivered = padded.size();
    match transport.send(&padded.request).await {
        Ok(response) => Ok(Probe {
            target: size,
            delivered,
            shortfall: padded.shortfall,
            response,
        }),
        Err(e) => {
            metrics::record_transport_error();
            tracing::error!(size, error = %e, "Probe failed");
            Err(e.into())
        }
    }
}

/// Drives the probe/classify loop for one detection run.
pub struct BisectionController<'a, T> {
    transport: &'a mut T,
    ok_override: Option<u16>,
    bad_override: Option<u16>,
    retry: RetryConfig,
}

impl<'a, T: Transport> BisectionController<'a, T> {
    pub fn new(transport: &'a mut T, status: &StatusConfig, retry: &RetryConfig) -> Self {
        Self {
            transport,
            ok_override: status.ok_code,
            bad_override: status.bad_code,
            retry: retry.clone(),
        }
    }

    /// Find the largest accepted request size in `[min_size, max_size]`.
    ///
    /// `min_size` is sent first as the reference probe; its status becomes
    /// the "accepted" status for the rest of the run.
    pub async fn detect(
        &mut self,
        request: &ProbeRequest,
        max_line: usize,
        min_size: usize,
        max_size: usize,
    ) -> Result<Detection, ProbeError> {
        let reference = send_padded(self.transport, request, max_line, min_size).await?;
        let reference_status = reference.response.status;
        tracing::info!(
            status = reference_status,
            size = reference.delivered,
            "Initial response status code"
        );

        if is_rejection(reference_status, self.bad_override) {
            return Err(ProbeError::BaselineRejected {
                status: reference_status,
            });
        }
        if (500..600).contains(&reference_status) {
            tracing::warn!(
                status = reference_status,
                "Reference probe returned a server error; that status now counts as accepted"
            );
        }

        let mut stats = ProbeStats::default();
        stats.record(Outcome::Accepted);
        metrics::record_probe(Outcome::Accepted);

        let mut state = ProbeState::new(min_size, max_size);
        if let Some(missing) = reference.shortfall {
            tracing::warn!(
                target_size = reference.target,
                delivered = reference.delivered,
                missing,
                "Reference probe fell short; only the delivered size is confirmed"
            );
            state.detected = reference.delivered;
        }
        let mut success = reference.response;
        let mut ceiling_reached = false;

        while state.is_searching() {
            let mid = state.midpoint();
            let probes_remaining = state.probes_remaining();
            let probe = send_padded(self.transport, request, max_line, mid).await?;
            let status = probe.response.status;
            let outcome = classify(status, reference_status, self.ok_override, self.bad_override);
            stats.record(outcome);
            metrics::record_probe(outcome);

            tracing::info!(
                size = mid,
                status,
                outcome = %outcome,
                probes_remaining,
                "Tried size"
            );

            match outcome {
                Outcome::Accepted => {
                    state.detected = match probe.shortfall {
                        // Only the smaller delivered size was confirmed.
                        Some(_) => {
                            tracing::debug!(
                                target_size = probe.target,
                                delivered = probe.delivered,
                                "Accepted probe was sent short of its target"
                            );
                            state.detected.max(probe.delivered)
                        }
                        None => mid,
                    };
                    state.low = mid + 1;
                    success = probe.response;
                }
                Outcome::Rejected => {
                    state.high = mid - 1;
                    ceiling_reached = true;
                }
                Outcome::TransientError => {
                    state.consecutive_errors += 1;
                    if state.consecutive_errors > MAX_TRANSIENT_ERRORS {
                        return Err(ProbeError::TooManyFailures {
                            size: mid,
                            low: state.low,
                            high: state.high,
                        });
                    }
                    wait_before_retry(state.consecutive_errors, &self.retry).await;
                }
                Outcome::Unexpected => {
                    return Err(ProbeError::UnexpectedStatus { status, size: mid });
                }
            }
        }

        if !ceiling_reached {
            tracing::warn!(
                max_size,
                "Maximum header size was not exceeded and could be larger"
            );
        }
        tracing::info!(
            size = state.detected,
            probes = stats.probes,
            "Detected maximum header size"
        );
        metrics::record_detected_size(state.detected);

        Ok(Detection {
            size: state.detected,
            ceiling_reached,
            reference_status,
            response: success,
            stats,
        })
    }
}
