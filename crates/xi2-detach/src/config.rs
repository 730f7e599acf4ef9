//! TOML configuration for the monitor.
//!
//! Everything is optional; with no file at all the monitor connects to
//! `$DISPLAY`, logs at `info` and announces XI 2.3.  Example:
//!
//! ```toml
//! display = ":1"
//! log_level = "debug"
//!
//! [client_version]
//! major = 2
//! minor = 2
//! ```
//!
//! # Precedence
//!
//! Command-line flag > environment variable > config file > built-in default.
//! `RUST_LOG`, when set, replaces `log_level` entirely.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::application::server::ExtensionVersion;

/// Log filter used when neither `RUST_LOG` nor the config file sets one.
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Runtime configuration of the monitor.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MonitorConfig {
    /// X display to connect to.  `None` means `$DISPLAY`.
    pub display: Option<String>,
    /// `tracing` filter directive: `"error"`, `"warn"`, `"info"`, `"debug"`, `"trace"`.
    pub log_level: String,
    /// XI2 version announced to the server.
    pub client_version: ExtensionVersion,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            display: None,
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            client_version: ExtensionVersion::CLIENT_DEFAULT,
        }
    }
}

impl MonitorConfig {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] if the text is not valid TOML or has
    /// unknown keys.
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Replaces the display when `display` is `Some`.
    pub fn with_display(mut self, display: Option<String>) -> Self {
        if display.is_some() {
            self.display = display;
        }
        self
    }
}

/// Loads the configuration file at `path`.
///
/// Unlike an implicit default location, an explicitly named file must exist.
///
/// # Errors
///
/// Returns [`ConfigError`] if the file cannot be read or parsed.
pub fn load_config(path: &Path) -> Result<MonitorConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    MonitorConfig::from_toml(&text)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_empty_file_yields_defaults() {
        assert_eq!(MonitorConfig::from_toml("").unwrap(), MonitorConfig::default());
    }

    #[test]
    fn test_default_announces_xi_2_3() {
        let cfg = MonitorConfig::default();
        assert_eq!(cfg.client_version, ExtensionVersion { major: 2, minor: 3 });
        assert_eq!(cfg.log_level, "info");
        assert!(cfg.display.is_none());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        // Arrange
        let text = r#"
            display = ":1"

            [client_version]
            major = 2
            minor = 2
        "#;

        // Act
        let cfg = MonitorConfig::from_toml(text).unwrap();

        // Assert
        assert_eq!(cfg.display.as_deref(), Some(":1"));
        assert_eq!(cfg.client_version, ExtensionVersion { major: 2, minor: 2 });
        assert_eq!(cfg.log_level, DEFAULT_LOG_LEVEL);
    }

    #[test]
    fn test_client_version_with_major_only_keeps_default_minor() {
        // Arrange
        let text = "[client_version]\nmajor = 2\n";

        // Act
        let cfg = MonitorConfig::from_toml(text).unwrap();

        // Assert
        assert_eq!(cfg.client_version, ExtensionVersion { major: 2, minor: 3 });
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = MonitorConfig::from_toml("detach_on_attach = true");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_cli_display_overrides_file() {
        let cfg = MonitorConfig::from_toml("display = \":1\"").unwrap();

        assert_eq!(
            cfg.clone().with_display(Some(":7".into())).display.as_deref(),
            Some(":7")
        );
        assert_eq!(cfg.with_display(None).display.as_deref(), Some(":1"));
    }

    #[test]
    fn test_load_config_missing_file_is_io_error() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/xi2-detach.toml");
        assert!(matches!(load_config(&path), Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_config_reads_file_via_temp_dir() {
        // Arrange
        let dir = std::env::temp_dir().join(format!("xi2_detach_test_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "log_level = \"debug\"\n").unwrap();

        // Act
        let cfg = load_config(&path).unwrap();

        // Assert
        assert_eq!(cfg.log_level, "debug");

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }
}
