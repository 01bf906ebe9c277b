//! TLS client configuration.

use std::sync::Arc;

use rustls::{ClientConfig, KeyLogFile, RootCertStore};
use tokio_rustls::TlsConnector;

/// Build the TLS connector used for `https` targets.
///
/// No ALPN protocols are offered, so servers always answer over HTTP/1.1
/// and never switch to a binary framing layer with different header limits.
/// Session keys are logged to `SSLKEYLOGFILE` when that variable is set.
pub fn build_connector() -> Result<TlsConnector, rustls::Error> {
    let mut roots = RootCertStore::empty();
    roots.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let mut config = ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()?
        .with_root_certificates(roots)
        .with_no_client_auth();

    config.alpn_protocols.clear();
    config.key_log = Arc::new(KeyLogFile::new());

    Ok(TlsConnector::from(Arc::new(config)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connector_builds() {
        assert!(build_connector().is_ok());
    }
}
