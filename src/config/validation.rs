//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check the target URL is probeable (scheme, host)
//! - Validate value ranges (line limit, size range, status codes)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProberConfig → Result<(), Vec<ValidationError>>
//! - Runs before any probe is sent

use thiserror::Error;

use crate::config::schema::ProberConfig;
use crate::probe::padding::MINIMUM_OVERHEAD;

/// Largest request size a run may ask for.
pub const MAX_REQUEST_SIZE: usize = 64 * 1024 * 1024;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("missing hostname in url")]
    MissingHost,

    #[error("unsupported url scheme '{0}' (expected http or https)")]
    UnsupportedScheme(String),

    #[error("invalid HTTP method '{0}'")]
    InvalidMethod(String),

    #[error("max-line must be at least {min} (got {actual})")]
    MaxLineTooSmall { min: usize, actual: usize },

    #[error("{field} ({actual}) exceeds the largest supported request size {max}")]
    SizeTooLarge {
        field: &'static str,
        max: usize,
        actual: usize,
    },

    #[error("min-size ({min}) cannot be larger than max-size ({max})")]
    InvertedSizeRange { min: usize, max: usize },

    #[error("{field} status code {code} is outside 100-599")]
    InvalidStatusCode { field: &'static str, code: u16 },

    #[error("timeouts must be greater than zero")]
    ZeroTimeout,
}

/// Validate a merged configuration.
pub fn validate_config(config: &ProberConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    let url = &config.target.url;
    match url.scheme() {
        "http" | "https" => {}
        other => errors.push(ValidationError::UnsupportedScheme(other.to_string())),
    }
    if url.host_str().map_or(true, str::is_empty) {
        errors.push(ValidationError::MissingHost);
    }

    if !is_token(&config.target.method) {
        errors.push(ValidationError::InvalidMethod(config.target.method.clone()));
    }

    if config.probe.max_line < MINIMUM_OVERHEAD {
        errors.push(ValidationError::MaxLineTooSmall {
            min: MINIMUM_OVERHEAD,
            actual: config.probe.max_line,
        });
    }

    for (field, actual) in [
        ("min-size", config.probe.min_size),
        ("max-size", config.probe.max_size),
    ] {
        if actual > MAX_REQUEST_SIZE {
            errors.push(ValidationError::SizeTooLarge {
                field,
                max: MAX_REQUEST_SIZE,
                actual,
            });
        }
    }

    if config.probe.detect && config.probe.min_size > config.probe.max_size {
        errors.push(ValidationError::InvertedSizeRange {
            min: config.probe.min_size,
            max: config.probe.max_size,
        });
    }

    for (field, code) in [
        ("code-ok", config.status.ok_code),
        ("code-bad", config.status.bad_code),
    ] {
        if let Some(code) = code {
            if !(100..=599).contains(&code) {
                errors.push(ValidationError::InvalidStatusCode { field, code });
            }
        }
    }

    if config.timeouts.connect_secs == 0 || config.timeouts.read_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// RFC 9110 token check for the method.
fn is_token(s: &str) -> bool {
    !s.is_empty()
        && s.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(validate_config(&ProberConfig::default()), Ok(()));
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = ProberConfig::default();
        config.target.method = "GET /".to_string();
        config.probe.max_line = 10;
        config.probe.detect = true;
        config.probe.min_size = 100;
        config.probe.max_size = 50;
        config.status.bad_code = Some(1000);

        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors.contains(&ValidationError::MaxLineTooSmall {
            min: MINIMUM_OVERHEAD,
            actual: 10
        }));
        assert!(errors.contains(&ValidationError::InvertedSizeRange { min: 100, max: 50 }));
    }

    #[test]
    fn test_inverted_range_only_matters_in_detect_mode() {
        let mut config = ProberConfig::default();
        config.probe.min_size = 100;
        config.probe.max_size = 50;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_url_checks() {
        let mut config = ProberConfig::default();
        config.target.url = Url::parse("file:///etc/passwd").unwrap();
        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::UnsupportedScheme("file".into())));
        assert!(errors.contains(&ValidationError::MissingHost));
    }

    #[test]
    fn test_oversized_range_is_rejected() {
        let mut config = ProberConfig::default();
        config.probe.max_size = usize::MAX;
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::SizeTooLarge {
                field: "max-size",
                max: MAX_REQUEST_SIZE,
                actual: usize::MAX,
            }]
        );

        config.probe.max_size = MAX_REQUEST_SIZE;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_minimum_line_is_accepted() {
        let mut config = ProberConfig::default();
        config.probe.max_line = MINIMUM_OVERHEAD;
        assert!(validate_config(&config).is_ok());
    }
}
