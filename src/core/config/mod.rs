//! core::config
//!
//! Configuration schema and loading.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (`--host`, applied by the caller)
//!
//! # Config Locations
//!
//! Searched in order, first existing file wins:
//! 1. Path passed with `--config`
//! 2. `$RLAB_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/rlab/config.toml`
//! 4. `~/.rlab/config.toml`
//!
//! A path given with `--config` must exist. Missing files anywhere else are
//! not an error; defaults are used.
//!
//! # Example
//!
//! ```no_run
//! use rlab::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("{}", config.api_base());
//! ```

pub mod schema;

pub use schema::{ApiVersion, FileConfig};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}'")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),
}

/// Effective configuration.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub file: FileConfig,
    /// Path the file settings were read from, if any
    path: Option<PathBuf>,
    host_override: Option<String>,
}

impl Config {
    /// Load configuration, preferring `explicit` over the standard locations.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file exists but cannot be read, parsed or
    /// validated, or if `explicit` does not exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        match Self::locate() {
            Some(path) => Self::load_from(&path),
            None => {
                tracing::debug!("no config file found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Load configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let file: FileConfig = toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        file.validate()?;

        tracing::debug!(path = %path.display(), "loaded config");

        Ok(Self {
            file,
            path: Some(path.to_path_buf()),
            host_override: None,
        })
    }

    /// First existing file among the standard locations.
    fn locate() -> Option<PathBuf> {
        let mut candidates = Vec::new();
        if let Ok(path) = std::env::var("RLAB_CONFIG") {
            candidates.push(PathBuf::from(path));
        }
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            candidates.push(PathBuf::from(xdg_home).join("rlab/config.toml"));
        }
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".rlab/config.toml"));
        }

        candidates.into_iter().find(|path| path.exists())
    }

    /// Override the host from the command line.
    ///
    /// # Errors
    ///
    /// `InvalidValue` if `host` is not an http(s) URL.
    pub fn with_host(mut self, host: Option<String>) -> Result<Self, ConfigError> {
        if let Some(host) = host {
            schema::validate_host(&host)?;
            self.host_override = Some(host);
        }
        Ok(self)
    }

    /// Path the file settings were read from.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// GitLab host, without trailing slash.
    ///
    /// Defaults to `https://gitlab.com`.
    pub fn host(&self) -> &str {
        self.host_override
            .as_deref()
            .or(self.file.host.as_deref())
            .unwrap_or(schema::DEFAULT_HOST)
            .trim_end_matches('/')
    }

    pub fn api_version(&self) -> ApiVersion {
        self.file.api_version.unwrap_or_default()
    }

    /// Base URL of the REST API, e.g. `https://gitlab.com/api/v4`.
    pub fn api_base(&self) -> String {
        format!("{}/api/{}", self.host(), self.api_version())
    }

    /// Whether JSON output is pretty-printed. Defaults to `true`.
    pub fn pretty(&self) -> bool {
        self.file.pretty.unwrap_or(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.host(), "https://gitlab.com");
        assert_eq!(config.api_version(), ApiVersion::V4);
        assert_eq!(config.api_base(), "https://gitlab.com/api/v4");
        assert!(config.pretty());
        assert!(config.path().is_none());
    }

    #[test]
    fn loads_file() {
        let file = write_config(
            r#"
host = "https://gitlab.example.com/"
api_version = "v3"
pretty = false
"#,
        );
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.host(), "https://gitlab.example.com");
        assert_eq!(config.api_base(), "https://gitlab.example.com/api/v3");
        assert!(!config.pretty());
        assert_eq!(config.path(), Some(file.path()));
    }

    #[test]
    fn cli_host_wins() {
        let file = write_config("host = \"https://a.example\"\n");
        let config = Config::load(Some(file.path()))
            .unwrap()
            .with_host(Some("http://b.example".to_string()))
            .unwrap();
        assert_eq!(config.host(), "http://b.example");
    }

    #[test]
    fn cli_host_is_validated() {
        let err = Config::default()
            .with_host(Some("gitlab.com".to_string()))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn unknown_key_is_parse_error() {
        let file = write_config("token = \"secret\"\n");
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn invalid_value_rejected() {
        let file = write_config("host = \"ftp://gitlab.com\"\n");
        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn missing_explicit_file_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError { .. }));
    }
}
