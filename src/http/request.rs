//! Probe request model and wire encoding.
//!
//! # Responsibilities
//! - Hold the method, target URL and ordered header list of a probe
//! - Encode the request head exactly as it is written to the socket
//! - Measure the encoded size (`measure`)
//!
//! # Design Decisions
//! - Headers keep insertion order; names compare case-insensitively
//! - Setting an existing header replaces its value in place
//! - The transport sends `encode()` verbatim, so `measure` is ground truth
//! - No body is ever attached to a probe

use std::fmt;
use std::io::{self, Write};

use url::{Host, Url};

/// Line terminator used in the request head.
pub const CRLF: &str = "\r\n";

/// Ordered, case-insensitive header list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList {
    entries: Vec<(String, String)>,
}

impl HeaderList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a header. Replaces the value of an existing header with the
    /// same name (keeping its position), appends otherwise.
    pub fn set(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self
            .entries
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

/// A fully-formed HTTP/1.1 probe request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeRequest {
    /// Request method token (e.g. "HEAD").
    pub method: String,
    /// Target URL. Scheme, host and port select the connection.
    pub url: Url,
    /// Header fields in wire order.
    pub headers: HeaderList,
}

impl ProbeRequest {
    /// Create a request with only the `Host` header set.
    pub fn new(method: impl Into<String>, url: Url) -> Self {
        let mut headers = HeaderList::new();
        if let Some(host) = host_header(&url) {
            headers.set("Host", host);
        }
        Self {
            method: method.into(),
            url,
            headers,
        }
    }

    /// Origin-form request target: path plus optional query.
    pub fn request_target(&self) -> String {
        let path = self.url.path();
        let path = if path.is_empty() { "/" } else { path };
        match self.url.query() {
            Some(query) => format!("{}?{}", path, query),
            None => path.to_string(),
        }
    }

    /// Write the request head to `w` in wire format.
    pub fn write_to<W: Write>(&self, w: &mut W) -> io::Result<()> {
        write!(w, "{} {} HTTP/1.1{}", self.method, self.request_target(), CRLF)?;
        for (name, value) in self.headers.iter() {
            write!(w, "{}: {}{}", name, value, CRLF)?;
        }
        w.write_all(CRLF.as_bytes())
    }

    /// Encode the request head into the exact bytes sent on the wire.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);
        // Writing into a Vec cannot fail.
        let _ = self.write_to(&mut buf);
        buf
    }
}

impl fmt::Display for ProbeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.encode()))
    }
}

/// Serialized size of `request` in bytes.
pub fn measure(request: &ProbeRequest) -> usize {
    request.encode().len()
}

/// `Host` header value: host plus port when it differs from the scheme default.
fn host_header(url: &Url) -> Option<String> {
    let host = match url.host()? {
        Host::Domain(domain) => domain.to_string(),
        Host::Ipv4(addr) => addr.to_string(),
        Host::Ipv6(addr) => format!("[{}]", addr),
    };
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(url: &str) -> ProbeRequest {
        ProbeRequest::new("GET", Url::parse(url).unwrap())
    }

    #[test]
    fn test_encode_wire_format() {
        let mut req = request("http://localhost/");
        req.headers.set("Connection", "close");

        let wire = req.encode();
        assert_eq!(
            wire,
            b"GET / HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n".to_vec()
        );
        assert_eq!(measure(&req), wire.len());
    }

    #[test]
    fn test_measure_is_idempotent() {
        let req = request("https://example.com/a/b?x=1");
        assert_eq!(measure(&req), measure(&req));
        assert_eq!(measure(&req), req.to_string().len());
    }

    #[test]
    fn test_request_target_and_host() {
        let req = request("http://example.com:8080/path?q=1#frag");
        assert_eq!(req.request_target(), "/path?q=1");
        assert_eq!(req.headers.get("host"), Some("example.com:8080"));

        let req = request("https://[::1]:443/");
        assert_eq!(req.headers.get("Host"), Some("[::1]"));
    }

    #[test]
    fn test_header_set_replaces_in_place() {
        let mut headers = HeaderList::new();
        headers.set("A", "1");
        headers.set("B", "2");
        headers.set("a", "3");

        let collected: Vec<_> = headers.iter().collect();
        assert_eq!(collected, vec![("A", "3"), ("B", "2")]);
    }

    #[test]
    fn test_clone_does_not_alias() {
        let original = request("http://localhost/");
        let mut copy = original.clone();
        copy.headers.set("X-Pad", "xxx");
        assert!(original.headers.get("X-Pad").is_none());
        assert!(measure(&copy) > measure(&original));
    }
}
