//! Probe outcome, search state and error definitions.

use thiserror::Error;

use crate::http::ProbeResponse;
use crate::net::transport::TransportError;

/// Classification of a single probe response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The intermediary accepted a request of this size.
    Accepted,
    /// The request was rejected as too large or malformed.
    Rejected,
    /// Server-error class response; the probe may be retried.
    TransientError,
    /// A status the search cannot interpret.
    Unexpected,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Accepted => "accepted",
            Outcome::Rejected => "rejected",
            Outcome::TransientError => "transient_error",
            Outcome::Unexpected => "unexpected",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Live bisection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeState {
    /// Smallest size not yet resolved.
    pub low: usize,
    /// Largest size not yet resolved.
    pub high: usize,
    /// Largest size confirmed as accepted.
    pub detected: usize,
    /// Transient errors seen so far in this run.
    pub consecutive_errors: u32,
}

impl ProbeState {
    /// State after the reference probe confirmed `min_size`.
    pub fn new(min_size: usize, max_size: usize) -> Self {
        Self {
            low: min_size + 1,
            high: max_size,
            detected: min_size,
            consecutive_errors: 0,
        }
    }

    pub fn is_searching(&self) -> bool {
        self.low <= self.high
    }

    /// Next size to probe.
    pub fn midpoint(&self) -> usize {
        self.low + (self.high - self.low) / 2
    }

    /// Upper bound on the probes still needed, `ceil(log2(high - low + 1))`.
    pub fn probes_remaining(&self) -> u32 {
        if !self.is_searching() {
            return 0;
        }
        let candidates = self.high - self.low + 1;
        candidates
            .checked_next_power_of_two()
            .map_or(usize::BITS, |n| n.trailing_zeros())
    }
}

/// Aggregate outcome counters for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProbeStats {
    pub probes: u32,
    pub accepted: u32,
    pub rejected: u32,
    pub transient_errors: u32,
}

impl ProbeStats {
    pub fn record(&mut self, outcome: Outcome) {
        self.probes += 1;
        match outcome {
            Outcome::Accepted => self.accepted += 1,
            Outcome::Rejected => self.rejected += 1,
            Outcome::TransientError => self.transient_errors += 1,
            Outcome::Unexpected => {}
        }
    }
}

/// Result of a completed detection run.
#[derive(Debug, Clone)]
pub struct Detection {
    /// Largest request size confirmed as accepted.
    pub size: usize,
    /// Whether any probe was rejected. When false the real limit may be
    /// larger than the probed range.
    pub ceiling_reached: bool,
    /// Status code of the reference probe.
    pub reference_status: u16,
    /// Response to the last accepted probe.
    pub response: ProbeResponse,
    pub stats: ProbeStats,
}

/// Fatal conditions that end a probe run.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The reference request is already rejected.
    #[error("initial request is already rejected (status {status}), cannot detect maximum size")]
    BaselineRejected { status: u16 },

    /// Transient error budget exhausted.
    #[error("too many failures, tried {size} in [{low},{high}]")]
    TooManyFailures { size: usize, low: usize, high: usize },

    /// Status outside the accepted/rejected/transient taxonomy.
    #[error("unexpected response code {status} for size {size}")]
    UnexpectedStatus { status: u16, size: usize },

    /// Network or protocol failure while sending a probe.
    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// The diagnostic dump could not be written.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_midpoint_and_estimate() {
        let state = ProbeState::new(99, 200);
        assert_eq!(state.low, 100);
        assert_eq!(state.midpoint(), 150);
        // 101 candidates need at most 7 probes.
        assert_eq!(state.probes_remaining(), 7);

        let single = ProbeState::new(9, 10);
        assert_eq!(single.probes_remaining(), 0);
        assert!(single.is_searching());

        let done = ProbeState::new(10, 10);
        assert!(!done.is_searching());
        assert_eq!(done.probes_remaining(), 0);
    }

    #[test]
    fn test_estimate_on_huge_range() {
        let state = ProbeState::new(0, usize::MAX - 1);
        assert_eq!(state.probes_remaining(), usize::BITS);
    }

    #[test]
    fn test_stats_record() {
        let mut stats = ProbeStats::default();
        stats.record(Outcome::Accepted);
        stats.record(Outcome::Rejected);
        stats.record(Outcome::TransientError);
        stats.record(Outcome::Unexpected);
        assert_eq!(stats.probes, 4);
        assert_eq!(stats.accepted, 1);
        assert_eq!(stats.rejected, 1);
        assert_eq!(stats.transient_errors, 1);
    }
}
