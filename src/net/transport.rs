//! Probe transport.
//!
//! # Responsibilities
//! - Open one connection per probe (TCP or TLS)
//! - Write the encoded request bytes exactly as measured
//! - Read and delimit the response, never following redirects
//!
//! # Design Decisions
//! - One request in flight at a time; `Connection: close` on every probe
//! - Every network step runs under a deadline
//! - A response that arrives while the request is still being written
//!   (early rejection) is returned instead of the write error

use std::io;
use std::time::Duration;

use rustls::pki_types::ServerName;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use url::Host;

use crate::config::TimeoutConfig;
use crate::http::response::{parse_head, ParseError, ResponseHead};
use crate::http::{ProbeRequest, ProbeResponse};
use crate::net::tls;

/// Upper bound on response bytes kept per probe.
pub const MAX_RESPONSE_BYTES: usize = 1024 * 1024;

/// Sends fully-formed probe requests.
#[allow(async_fn_in_trait)]
pub trait Transport {
    /// Send `request` and return the first response received.
    async fn send(&mut self, request: &ProbeRequest) -> Result<ProbeResponse, TransportError>;
}

/// Errors raised while exchanging a probe with the target.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("target URL has no host")]
    MissingHost,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("failed to connect to {addr}: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("connect timed out after {0:?}")]
    ConnectTimeout(Duration),

    #[error("invalid TLS server name: {0}")]
    InvalidServerName(String),

    #[error("TLS setup failed: {0}")]
    TlsConfig(#[from] rustls::Error),

    #[error("TLS handshake failed: {0}")]
    Handshake(#[source] io::Error),

    #[error("write timed out after {0:?}")]
    WriteTimeout(Duration),

    #[error("read timed out after {0:?}")]
    ReadTimeout(Duration),

    #[error("connection closed after {0} bytes without a complete response head")]
    IncompleteResponse(usize),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Transport over plain TCP or TLS, one connection per request.
pub struct TcpTransport {
    tls: TlsConnector,
    connect_timeout: Duration,
    read_timeout: Duration,
}

impl TcpTransport {
    pub fn new(timeouts: &TimeoutConfig) -> Result<Self, TransportError> {
        Ok(Self {
            tls: tls::build_connector()?,
            connect_timeout: Duration::from_secs(timeouts.connect_secs),
            read_timeout: Duration::from_secs(timeouts.read_secs),
        })
    }

    async fn connect(&self, host: &str, port: u16) -> Result<TcpStream, TransportError> {
        let stream = timeout(self.connect_timeout, TcpStream::connect((host, port)))
            .await
            .map_err(|_| TransportError::ConnectTimeout(self.connect_timeout))?
            .map_err(|source| TransportError::Connect {
                addr: format!("{}:{}", host, port),
                source,
            })?;
        stream.set_nodelay(true)?;
        Ok(stream)
    }
}

impl Transport for TcpTransport {
    async fn send(&mut self, request: &ProbeRequest) -> Result<ProbeResponse, TransportError> {
        let url = &request.url;
        let host = match url.host() {
            Some(Host::Domain(domain)) => domain.to_string(),
            Some(Host::Ipv4(addr)) => addr.to_string(),
            Some(Host::Ipv6(addr)) => addr.to_string(),
            None => return Err(TransportError::MissingHost),
        };
        let port = url
            .port_or_known_default()
            .ok_or_else(|| TransportError::UnsupportedScheme(url.scheme().to_string()))?;
        let head_request = request.method.eq_ignore_ascii_case("HEAD");
        let wire = request.encode();

        tracing::trace!(host = %host, port, bytes = wire.len(), "Sending probe");
        let stream = self.connect(&host, port).await?;

        match url.scheme() {
            "http" => exchange(stream, &wire, head_request, self.read_timeout).await,
            "https" => {
                let name = ServerName::try_from(host.clone())
                    .map_err(|_| TransportError::InvalidServerName(host.clone()))?;
                let stream = timeout(self.connect_timeout, self.tls.connect(name, stream))
                    .await
                    .map_err(|_| TransportError::ConnectTimeout(self.connect_timeout))?
                    .map_err(TransportError::Handshake)?;
                exchange(stream, &wire, head_request, self.read_timeout).await
            }
            other => Err(TransportError::UnsupportedScheme(other.to_string())),
        }
    }
}

/// Write `wire` to `stream` and read back one response.
pub async fn exchange<S>(
    mut stream: S,
    wire: &[u8],
    head_request: bool,
    io_timeout: Duration,
) -> Result<ProbeResponse, TransportError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let write = async {
        stream.write_all(wire).await?;
        stream.flush().await
    };
    let write_error = match timeout(io_timeout, write).await {
        Ok(Ok(())) => None,
        Ok(Err(e)) => {
            tracing::debug!(error = %e, "Write failed, checking for an early response");
            Some(TransportError::Io(e))
        }
        Err(_) => Some(TransportError::WriteTimeout(io_timeout)),
    };

    match read_response(&mut stream, head_request, io_timeout).await {
        Ok(response) => Ok(response),
        Err(read_error) => Err(write_error.unwrap_or(read_error)),
    }
}

async fn read_response<S>(
    stream: &mut S,
    head_request: bool,
    read_timeout: Duration,
) -> Result<ProbeResponse, TransportError>
where
    S: AsyncRead + Unpin,
{
    let mut buf = Vec::with_capacity(4096);
    let mut chunk = [0u8; 8192];
    let mut head: Option<ResponseHead> = None;

    loop {
        let n = match timeout(read_timeout, stream.read(&mut chunk)).await {
            Err(_) => return Err(TransportError::ReadTimeout(read_timeout)),
            Ok(Ok(n)) => n,
            // Peers that reset or skip close_notify once the status is out.
            Ok(Err(e)) if head.is_some() => {
                tracing::debug!(error = %e, "Read failed after response head, keeping response");
                0
            }
            Ok(Err(e)) => return Err(e.into()),
        };
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);

        if head.is_none() {
            head = parse_head(&buf)?;
        }
        if let Some(expected) = head.as_ref().and_then(|h| h.expected_len(head_request)) {
            if buf.len() >= expected {
                buf.truncate(expected);
                break;
            }
        }
        if buf.len() >= MAX_RESPONSE_BYTES {
            tracing::debug!(bytes = buf.len(), "Response truncated");
            break;
        }
    }

    match head {
        Some(head) => Ok(ProbeResponse::new(head.status, buf)),
        None => Err(TransportError::IncompleteResponse(buf.len())),
    }
}
