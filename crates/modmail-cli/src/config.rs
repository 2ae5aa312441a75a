//! CLI configuration file support
//!
//! Loads configuration from ~/.config/modmail/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// CLI configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    /// Default settings
    #[serde(default)]
    pub default: DefaultConfig,
}

/// Default configuration values
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultConfig {
    /// Default database path
    pub db_path: Option<String>,
}

impl CliConfig {
    /// Load configuration from default path
    pub fn load() -> Self {
        Self::load_from_path(Self::default_path())
    }

    /// Load configuration from a specific path
    pub fn load_from_path(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Get the default configuration file path
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("modmail").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_db_path() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("config.toml");
        std::fs::write(&path, "[default]\ndb_path = \"/tmp/modmail.db\"\n").unwrap();

        let config = CliConfig::load_from_path(Some(path));
        assert_eq!(config.default.db_path.as_deref(), Some("/tmp/modmail.db"));
    }

    #[test]
    fn test_missing_or_invalid_file_is_default() {
        let temp_dir = tempfile::tempdir().unwrap();
        let missing = CliConfig::load_from_path(Some(temp_dir.path().join("nope.toml")));
        assert!(missing.default.db_path.is_none());

        let path = temp_dir.path().join("bad.toml");
        std::fs::write(&path, "not = [valid").unwrap();
        assert!(CliConfig::load_from_path(Some(path)).default.db_path.is_none());
    }
}
