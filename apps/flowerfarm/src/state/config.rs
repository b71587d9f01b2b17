//! # Application Configuration
//!
//! Settings loaded once at startup.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FLOWERFARM_DB_PATH=./dev.db                                        │
//! │     FLOWERFARM_PAGE_SIZE=50                                            │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/flowerfarm/config.toml (Linux)                           │
//! │     ~/Library/Application Support/com.flowerfarm.app/config.toml       │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! database_path = "/home/me/flowerfarm.db"
//! export_dir = "/home/me/Documents"
//! page_size = 30
//! recent_limit = 10
//! share_command = "xdg-open"
//! ```
//!
//! ## Thread Safety
//! Read-only after initialization, so no mutex needed.

use std::path::{Path, PathBuf};

use directories::{ProjectDirs, UserDirs};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

use flowerfarm_core::{DEFAULT_PAGE_SIZE, DEFAULT_RECENT_LIMIT};

// =============================================================================
// Config Error
// =============================================================================

/// Errors raised while loading or saving configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read or written.
    #[error("Config I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Config file is not valid TOML for [`AppConfig`].
    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be serialized.
    #[error("Could not serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is out of range.
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// No platform directory could be determined.
    #[error("No config path available")]
    NoConfigPath,
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

// =============================================================================
// App Config
// =============================================================================

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Database file. `None` uses the platform data directory.
    pub database_path: Option<PathBuf>,

    /// Directory export files are written to. `None` uses the user's
    /// documents folder.
    pub export_dir: Option<PathBuf>,

    /// Rows per page of the recording list.
    pub page_size: u32,

    /// How many crops the recent strip shows.
    pub recent_limit: u32,

    /// Program run with the export file path to share it.
    /// Sharing is unavailable when unset.
    pub share_command: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            database_path: None,
            export_dir: None,
            page_size: DEFAULT_PAGE_SIZE,
            recent_limit: DEFAULT_RECENT_LIMIT,
            share_command: None,
        }
    }
}

impl AppConfig {
    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (config.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> ConfigResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ConfigResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or(ConfigError::NoConfigPath)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents)?;

        info!(?path, "Config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.page_size == 0 {
            return Err(ConfigError::Invalid(
                "page_size must be greater than 0".into(),
            ));
        }

        if self.recent_limit == 0 {
            return Err(ConfigError::Invalid(
                "recent_limit must be greater than 0".into(),
            ));
        }

        if let Some(ref command) = self.share_command {
            if command.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "share_command must not be blank".into(),
                ));
            }
        }

        Ok(())
    }

    /// Applies `FLOWERFARM_*` environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|key| std::env::var(key).ok());
    }

    /// Applies overrides looked up by variable name.
    fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup("FLOWERFARM_DB_PATH") {
            debug!(path = %path, "Overriding database path from environment");
            self.database_path = Some(PathBuf::from(path));
        }

        if let Some(dir) = lookup("FLOWERFARM_EXPORT_DIR") {
            self.export_dir = Some(PathBuf::from(dir));
        }

        if let Some(size) = lookup("FLOWERFARM_PAGE_SIZE") {
            match size.parse::<u32>() {
                Ok(n) => self.page_size = n,
                Err(_) => warn!(value = %size, "Ignoring invalid FLOWERFARM_PAGE_SIZE"),
            }
        }

        if let Some(limit) = lookup("FLOWERFARM_RECENT_LIMIT") {
            match limit.parse::<u32>() {
                Ok(n) => self.recent_limit = n,
                Err(_) => warn!(value = %limit, "Ignoring invalid FLOWERFARM_RECENT_LIMIT"),
            }
        }

        if let Some(command) = lookup("FLOWERFARM_SHARE_COMMAND") {
            self.share_command = Some(command);
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Resolved Paths
    // =========================================================================

    /// Database file to open.
    ///
    /// ## Platform-Specific Paths
    /// - **macOS**: `~/Library/Application Support/com.flowerfarm.app/flowerfarm.db`
    /// - **Windows**: `%APPDATA%\flowerfarm\app\data\flowerfarm.db`
    /// - **Linux**: `~/.local/share/flowerfarm/flowerfarm.db`
    pub fn resolved_database_path(&self) -> ConfigResult<PathBuf> {
        if let Some(ref path) = self.database_path {
            return Ok(path.clone());
        }

        let dirs = project_dirs().ok_or(ConfigError::NoConfigPath)?;
        let data_dir = dirs.data_dir();
        std::fs::create_dir_all(data_dir)?;

        Ok(data_dir.join("flowerfarm.db"))
    }

    /// Directory export files go to, if one can be determined.
    pub fn resolved_export_dir(&self) -> Option<PathBuf> {
        if let Some(ref dir) = self.export_dir {
            return Some(dir.clone());
        }
        UserDirs::new()
            .and_then(|dirs| dirs.document_dir().map(Path::to_path_buf))
            .or_else(|| project_dirs().map(|dirs| dirs.data_dir().join("exports")))
    }
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "flowerfarm", "app")
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.page_size, 30);
        assert_eq!(config.recent_limit, 10);
        assert!(config.share_command.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = AppConfig::default();

        config.page_size = 0;
        assert!(config.validate().is_err());

        config.page_size = 5;
        config.recent_limit = 0;
        assert!(config.validate().is_err());

        config.recent_limit = 5;
        config.share_command = Some("  ".to_string());
        assert!(config.validate().is_err());

        config.share_command = Some("xdg-open".to_string());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides() {
        let mut config = AppConfig::default();
        config.apply_overrides_from(env(&[
            ("FLOWERFARM_DB_PATH", "/tmp/farm.db"),
            ("FLOWERFARM_PAGE_SIZE", "50"),
            ("FLOWERFARM_RECENT_LIMIT", "not-a-number"),
            ("FLOWERFARM_SHARE_COMMAND", "xdg-open"),
        ]));

        assert_eq!(config.database_path, Some(PathBuf::from("/tmp/farm.db")));
        assert_eq!(config.page_size, 50);
        assert_eq!(config.recent_limit, 10);
        assert_eq!(config.share_command.as_deref(), Some("xdg-open"));
        assert!(config.export_dir.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: AppConfig = toml::from_str("page_size = 12\n").unwrap();
        assert_eq!(config.page_size, 12);
        assert_eq!(config.recent_limit, 10);
        assert!(config.database_path.is_none());
    }

    #[test]
    fn test_save_then_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = AppConfig {
            export_dir: Some(dir.path().to_path_buf()),
            page_size: 7,
            ..AppConfig::default()
        };
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let loaded: AppConfig = toml::from_str(&contents).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_invalid_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "page_size = \"many\"").unwrap();

        assert!(matches!(
            AppConfig::load(Some(path.clone())),
            Err(ConfigError::Parse(_))
        ));
        assert_eq!(AppConfig::load_or_default(Some(path)).page_size, 30);
    }

    #[test]
    fn test_configured_paths_win() {
        let config = AppConfig {
            database_path: Some(PathBuf::from("/data/farm.db")),
            export_dir: Some(PathBuf::from("/data/exports")),
            ..AppConfig::default()
        };
        assert_eq!(
            config.resolved_database_path().unwrap(),
            PathBuf::from("/data/farm.db")
        );
        assert_eq!(
            config.resolved_export_dir(),
            Some(PathBuf::from("/data/exports"))
        );
    }
}
