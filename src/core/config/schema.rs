//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Validation
//!
//! Values are validated after parsing: `host` must be an http(s) URL and
//! `api_version` must name a supported REST API version.

use serde::{Deserialize, Serialize};

use super::ConfigError;

pub(crate) const DEFAULT_HOST: &str = "https://gitlab.com";

/// Settings read from the config file.
///
/// # Example
///
/// ```toml
/// host = "https://gitlab.example.com"
/// api_version = "v4"
/// pretty = true
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    /// GitLab host URL
    pub host: Option<String>,

    /// REST API version
    pub api_version: Option<ApiVersion>,

    /// Pretty-print JSON output
    pub pretty: Option<bool>,
}

impl FileConfig {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(host) = &self.host {
            validate_host(host)?;
        }
        Ok(())
    }
}

pub(crate) fn validate_host(host: &str) -> Result<(), ConfigError> {
    let rest = host
        .strip_prefix("https://")
        .or_else(|| host.strip_prefix("http://"));
    match rest {
        Some(rest) if !rest.trim_matches('/').is_empty() => Ok(()),
        _ => Err(ConfigError::InvalidValue(format!(
            "invalid host '{}', must start with http:// or https://",
            host
        ))),
    }
}

/// Supported REST API versions.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ApiVersion {
    V3,
    #[default]
    V4,
}

impl std::fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiVersion::V3 => write!(f, "v3"),
            ApiVersion::V4 => write!(f, "v4"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_validation() {
        assert!(validate_host("https://gitlab.com").is_ok());
        assert!(validate_host("http://localhost:8080/").is_ok());
        assert!(validate_host("gitlab.com").is_err());
        assert!(validate_host("https://").is_err());
    }

    #[test]
    fn api_version_parses_lowercase() {
        let config: FileConfig = toml::from_str("api_version = \"v3\"").unwrap();
        assert_eq!(config.api_version, Some(ApiVersion::V3));

        assert!(toml::from_str::<FileConfig>("api_version = \"v5\"").is_err());
    }

    #[test]
    fn empty_file_is_default() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config, FileConfig::default());
        assert!(config.validate().is_ok());
    }
}
