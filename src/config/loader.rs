//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ProberConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse a TOML config file without validating it.
///
/// Used when the file is only one layer and command-line overrides are
/// applied before validation.
pub fn read_config(path: &Path) -> Result<ProberConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ProberConfig, ConfigError> {
    let config = read_config(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_load_partial_file_uses_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[target]
url = "https://proxy.internal:8443/health"
method = "GET"

[probe]
detect = true
max_size = 65536

[status]
bad_code = 413
"#
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();
        assert_eq!(config.target.url.as_str(), "https://proxy.internal:8443/health");
        assert_eq!(config.target.method, "GET");
        assert!(config.probe.detect);
        assert_eq!(config.probe.max_size, 65536);
        assert_eq!(config.probe.max_line, 8192);
        assert_eq!(config.status.bad_code, Some(413));
        assert_eq!(config.status.ok_code, None);
        assert_eq!(config.timeouts.connect_secs, 10);
    }

    #[test]
    fn test_load_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[probe]\nmax_line = 4").unwrap();

        match load_config(file.path()) {
            Err(ConfigError::Validation(errors)) => assert_eq!(errors.len(), 1),
            other => panic!("expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_rejects_bad_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[target]\nurl = \"not a url\"").unwrap();
        assert!(matches!(load_config(file.path()), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_config(Path::new("/nonexistent/prober.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
