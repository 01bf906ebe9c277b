//! Request padding to an exact wire size.
//!
//! # Responsibilities
//! - Inflate a request to a target serialized size with synthetic headers
//! - Keep every synthetic header line within the line-length limit
//! - Report the byte shortfall when the target cannot be reached
//!
//! # Design Decisions
//! - Keys are `X-Pad`, `X-Pad1`, `X-Pad2`, ...; values are runs of `x`
//! - A value too large for one line is split with a fresh key, leaving the
//!   next key enough room for its own overhead
//! - The caller's request is never mutated

use crate::http::request::{measure, ProbeRequest};

/// Key of the first synthetic header field.
pub const PAD_HEADER_KEY: &str = "X-Pad";

/// Bytes a header line adds beyond the key itself.
pub const LINE_OVERHEAD: usize = ": \r\n".len();

/// Smallest line limit that still leaves room for two synthetic fields.
pub const MINIMUM_OVERHEAD: usize = 2 * (PAD_HEADER_KEY.len() + LINE_OVERHEAD + 1);

const FILLER: char = 'x';

/// Result of padding a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedRequest {
    /// The padded copy of the request.
    pub request: ProbeRequest,
    /// Bytes missing to reach the target, if it could not be reached.
    pub shortfall: Option<usize>,
}

impl PaddedRequest {
    /// Serialized size actually produced.
    pub fn size(&self) -> usize {
        measure(&self.request)
    }
}

/// Key of the `index`-th synthetic header field.
pub fn pad_key(index: usize) -> String {
    if index == 0 {
        PAD_HEADER_KEY.to_string()
    } else {
        format!("{}{}", PAD_HEADER_KEY, index)
    }
}

/// Pad a copy of `request` so that it serializes to `target_size` bytes.
///
/// Targets at or below the baseline size return an unmodified copy.
pub fn pad_request(request: &ProbeRequest, max_line: usize, target_size: usize) -> PaddedRequest {
    let mut padded = request.clone();
    let baseline = measure(&padded);
    let Ok(target) = i64::try_from(target_size) else {
        tracing::warn!(target_size, "Target size is out of range, sending unpadded request");
        return PaddedRequest {
            request: padded,
            shortfall: Some(target_size - baseline),
        };
    };
    let max_line = i64::try_from(max_line).unwrap_or(i64::MAX);
    let mut remaining = target - baseline as i64;
    let mut shortfall = None;

    let mut index = 0;
    let mut key = pad_key(index);
    while remaining > 0 {
        let next_key = pad_key(index + 1);
        let overhead = (key.len() + LINE_OVERHEAD) as i64;
        remaining -= overhead;
        if remaining < 0 {
            tracing::warn!(
                key = %key,
                missing = -remaining,
                target_size,
                "Maximum length not reached, cannot fit padding header"
            );
            shortfall = Some((-remaining) as usize);
            break;
        }

        let mut size = remaining;
        if size > max_line - overhead {
            let next_overhead = (next_key.len() + LINE_OVERHEAD) as i64;
            size = (max_line - overhead).min(remaining - next_overhead);
        }

        if size <= 0 {
            padded.headers.set(&key, "");
        } else {
            padded
                .headers
                .set(&key, FILLER.to_string().repeat(size as usize));
            remaining -= size;
        }

        index += 1;
        key = next_key;
    }

    PaddedRequest {
        request: padded,
        shortfall,
    }
}
