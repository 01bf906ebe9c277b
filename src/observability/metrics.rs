//! Probe metrics.
//!
//! # Metrics
//! - `prober_probes_total` (counter): probes sent, labelled by outcome
//! - `prober_transport_errors_total` (counter): failed exchanges
//! - `prober_detected_size_bytes` (gauge): last detected maximum size
//!
//! Recorded through the `metrics` facade; inert unless the embedding
//! application installs a recorder.

use metrics::{counter, describe_counter, describe_gauge, gauge, Unit};

use crate::probe::types::Outcome;

/// Register metric descriptions with the installed recorder.
pub fn describe() {
    describe_counter!("prober_probes_total", "Probes sent, by classified outcome");
    describe_counter!(
        "prober_transport_errors_total",
        "Probes that failed at the transport level"
    );
    describe_gauge!(
        "prober_detected_size_bytes",
        Unit::Bytes,
        "Largest request size confirmed as accepted"
    );
}

pub fn record_probe(outcome: Outcome) {
    counter!("prober_probes_total", "outcome" => outcome.as_str()).increment(1);
}

pub fn record_transport_error() {
    counter!("prober_transport_errors_total").increment(1);
}

pub fn record_detected_size(size: usize) {
    gauge!("prober_detected_size_bytes").set(size as f64);
}
