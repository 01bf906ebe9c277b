//! Response classification.
//!
//! Maps a status code to an [`Outcome`] given the reference status and the
//! optional operator overrides. Pure; no state is kept between probes.

use crate::probe::types::Outcome;

/// Statuses treated as "headers too large / malformed request".
pub const REJECTED_STATUSES: [u16; 3] = [400, 414, 431];

/// Whether `status` counts as a rejection, including the override code.
pub fn is_rejection(status: u16, bad_override: Option<u16>) -> bool {
    REJECTED_STATUSES.contains(&status) || bad_override == Some(status)
}

/// Classify a probe response status.
pub fn classify(
    status: u16,
    reference: u16,
    ok_override: Option<u16>,
    bad_override: Option<u16>,
) -> Outcome {
    if status == reference || ok_override == Some(status) {
        Outcome::Accepted
    } else if is_rejection(status, bad_override) {
        Outcome::Rejected
    } else if (500..600).contains(&status) {
        Outcome::TransientError
    } else {
        Outcome::Unexpected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_is_accepted() {
        assert_eq!(classify(200, 200, None, None), Outcome::Accepted);
        assert_eq!(classify(404, 404, None, None), Outcome::Accepted);
    }

    #[test]
    fn test_canonical_rejections() {
        for status in REJECTED_STATUSES {
            assert_eq!(classify(status, 200, None, None), Outcome::Rejected);
        }
    }

    #[test]
    fn test_overrides() {
        assert_eq!(classify(302, 200, Some(302), None), Outcome::Accepted);
        assert_eq!(classify(413, 200, None, Some(413)), Outcome::Rejected);
        // Accepted wins over rejected.
        assert_eq!(classify(400, 200, Some(400), None), Outcome::Accepted);
    }

    #[test]
    fn test_server_errors_are_transient() {
        assert_eq!(classify(500, 200, None, None), Outcome::TransientError);
        assert_eq!(classify(503, 200, None, None), Outcome::TransientError);
        assert_eq!(classify(599, 200, None, None), Outcome::TransientError);
    }

    #[test]
    fn test_everything_else_is_unexpected() {
        assert_eq!(classify(301, 200, None, None), Outcome::Unexpected);
        assert_eq!(classify(413, 200, None, None), Outcome::Unexpected);
        assert_eq!(classify(600, 200, None, None), Outcome::Unexpected);
    }
}
