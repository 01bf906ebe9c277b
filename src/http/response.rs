//! Probe response parsing.
//!
//! # Responsibilities
//! - Parse the status line and headers of a raw HTTP/1.x response
//! - Work out how many bytes make up the complete response
//! - Keep the verbatim bytes for the diagnostic dump
//!
//! # Design Decisions
//! - Parsing uses `httparse`; only the status code drives control flow
//! - Bodies are never interpreted, only delimited

use std::io::{self, Write};

/// Maximum number of response headers parsed.
const MAX_HEADERS: usize = 128;

/// A response received for a probe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw bytes as received (head and whatever body was read).
    pub raw: Vec<u8>,
}

impl ProbeResponse {
    pub fn new(status: u16, raw: Vec<u8>) -> Self {
        Self { status, raw }
    }

    /// Write the response verbatim.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        w.write_all(&self.raw)
    }
}

/// Parsed response head.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    pub status: u16,
    /// Length of the head including the blank line.
    pub head_len: usize,
    /// Value of `Content-Length`, if present and valid.
    pub content_length: Option<usize>,
}

impl ResponseHead {
    /// Total response size when it can be known up front.
    ///
    /// `None` means the body is delimited by connection close.
    pub fn expected_len(&self, head_request: bool) -> Option<usize> {
        let bodyless = head_request
            || (100..200).contains(&self.status)
            || self.status == 204
            || self.status == 304;
        if bodyless {
            return Some(self.head_len);
        }
        self.content_length.map(|len| self.head_len + len)
    }
}

/// Errors raised while parsing a response head.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("malformed response head: {0}")]
    Malformed(#[from] httparse::Error),

    #[error("response head has no status code")]
    MissingStatus,
}

/// Try to parse a response head from `buf`.
///
/// Returns `Ok(None)` while the head is incomplete.
pub fn parse_head(buf: &[u8]) -> Result<Option<ResponseHead>, ParseError> {
    let mut headers = [httparse::EMPTY_HEADER; MAX_HEADERS];
    let mut response = httparse::Response::new(&mut headers);
    let head_len = match response.parse(buf)? {
        httparse::Status::Complete(len) => len,
        httparse::Status::Partial => return Ok(None),
    };
    let status = response.code.ok_or(ParseError::MissingStatus)?;

    let content_length = response
        .headers
        .iter()
        .find(|h| h.name.eq_ignore_ascii_case("content-length"))
        .and_then(|h| std::str::from_utf8(h.value).ok())
        .and_then(|v| v.trim().parse::<usize>().ok());

    Ok(Some(ResponseHead {
        status,
        head_len,
        content_length,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_complete_head() {
        let raw = b"HTTP/1.1 431 Request Header Fields Too Large\r\nContent-Length: 5\r\n\r\nhello";
        let head = parse_head(raw).unwrap().unwrap();
        assert_eq!(head.status, 431);
        assert_eq!(head.content_length, Some(5));
        assert_eq!(head.expected_len(false), Some(raw.len()));
        assert_eq!(head.expected_len(true), Some(raw.len() - 5));
    }

    #[test]
    fn test_parse_partial_head() {
        assert!(parse_head(b"HTTP/1.1 200 OK\r\nServer: x\r\n").unwrap().is_none());
    }

    #[test]
    fn test_parse_garbage() {
        assert!(parse_head(b"SSH-2.0-OpenSSH\r\n\r\n").is_err());
    }

    #[test]
    fn test_close_delimited_body() {
        let head = parse_head(b"HTTP/1.1 200 OK\r\n\r\n").unwrap().unwrap();
        assert_eq!(head.expected_len(false), None);

        let head = parse_head(b"HTTP/1.1 204 No Content\r\n\r\n").unwrap().unwrap();
        assert_eq!(head.expected_len(false), Some(head.head_len));
    }
}
