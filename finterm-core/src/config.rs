//! Feature flags read by the menu engine.
//!
//! Stored as TOML; every field is optional and falls back to its default:
//!
//! ```toml
//! use_completion = true
//! remember_contexts = false
//! exit_auto_help = true
//! clear_after_command = false
//! routines_dir = "/home/me/.local/share/finterm/routines"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading the flags file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Process-wide switches the controllers read but never own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureFlags {
    /// Interactive line editor with tab completion instead of a plain read.
    pub use_completion: bool,
    /// Resume a menu's previous state when it is re-entered.
    pub remember_contexts: bool,
    /// Show the parent's help screen after leaving a menu.
    pub exit_auto_help: bool,
    /// Clear the screen before running each typed command.
    pub clear_after_command: bool,
    /// Where `stop` writes recorded routines.
    pub routines_dir: PathBuf,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            use_completion: true,
            remember_contexts: false,
            exit_auto_help: true,
            clear_after_command: false,
            routines_dir: data_dir().join("routines"),
        }
    }
}

impl FeatureFlags {
    /// Load flags from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse flags from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Like [`FeatureFlags::from_file`], but a missing file yields the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        Self::from_file(path)
    }
}

/// `<config_dir>/finterm/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("finterm")
        .join("config.toml")
}

/// `<data_dir>/finterm`
pub fn data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("finterm")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let flags = FeatureFlags::from_toml("").unwrap();
        assert_eq!(flags, FeatureFlags::default());
        assert!(flags.use_completion);
        assert!(!flags.remember_contexts);
        assert!(flags.exit_auto_help);
    }

    #[test]
    fn partial_override() {
        let flags = FeatureFlags::from_toml(
            r#"
remember_contexts = true
routines_dir = "/tmp/routines"
"#,
        )
        .unwrap();
        assert!(flags.remember_contexts);
        assert!(flags.use_completion);
        assert_eq!(flags.routines_dir, PathBuf::from("/tmp/routines"));
    }

    #[test]
    fn invalid_toml_is_parse_error() {
        let err = FeatureFlags::from_toml("remember_contexts = maybe").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_uses_defaults() {
        let flags = FeatureFlags::load_or_default(Path::new("/nonexistent/finterm.toml")).unwrap();
        assert_eq!(flags, FeatureFlags::default());
    }

    #[test]
    fn from_file_reports_path() {
        let err = FeatureFlags::from_file(Path::new("/nonexistent/finterm.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/finterm.toml"));
    }
}
