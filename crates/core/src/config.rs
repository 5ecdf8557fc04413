//! Screen Configuration
//!
//! Feature flags and platform settings for the app permissions screen:
//! - Permission usage surfacing
//! - Permissions hub fallback text
//! - Platform package identity and hidden groups

use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{AppPermissionsError, Result};

/// Package name the platform declares its own permission groups under
pub const DEFAULT_OS_PACKAGE: &str = "android";

/// Permission usage settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    /// Show "last accessed" summaries for modern groups
    pub permission_usage_enabled: bool,
    /// Show "never accessed" when a modern group has no usage and no description
    pub permissions_hub_enabled: bool,
    /// Groups that never show usage even when usage is enabled
    pub excluded_groups: Vec<String>,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            permission_usage_enabled: true,
            permissions_hub_enabled: false,
            excluded_groups: Vec::new(),
        }
    }
}

impl UsageConfig {
    /// Whether usage summaries apply to the named group
    pub fn shows_usage_for(&self, group: &str) -> bool {
        self.permission_usage_enabled && !self.excluded_groups.iter().any(|g| g == group)
    }
}

/// Screen settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Package that owns platform-declared permission groups
    pub os_package: String,
    /// Groups that are never surfaced to the user
    pub hidden_groups: Vec<String>,
    /// Hide the "app info" action in the header
    pub hide_info_button: bool,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            os_package: DEFAULT_OS_PACKAGE.to_string(),
            hidden_groups: Vec::new(),
            hide_info_button: false,
        }
    }
}

/// Main configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Configuration version for migrations
    pub version: u32,
    /// Usage settings
    pub usage: UsageConfig,
    /// Screen settings
    pub screen: ScreenConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            usage: UsageConfig::default(),
            screen: ScreenConfig::default(),
        }
    }
}

impl AppConfig {
    /// Get the configuration directory path
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("com", "apppermissions", "AppPermissions")
            .map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get the configuration file path
    pub fn config_file() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join("config.toml"))
    }

    /// Load configuration from the default location
    pub async fn load() -> Result<Self> {
        let config_file = Self::config_file()
            .ok_or_else(|| AppPermissionsError::Config("Cannot determine config path".into()))?;
        Self::load_from(&config_file).await
    }

    /// Load configuration from a file, writing defaults if it does not exist
    pub async fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            debug!("Loading config from {:?}", path);
            let contents = tokio::fs::read_to_string(path).await?;
            let config: AppConfig = toml::from_str(&contents)?;
            Ok(config)
        } else {
            info!("Config file not found, using defaults");
            let config = AppConfig::default();
            config.save_to(path).await?;
            Ok(config)
        }
    }

    /// Save configuration to the default location
    pub async fn save(&self) -> Result<()> {
        let config_file = Self::config_file()
            .ok_or_else(|| AppPermissionsError::Config("Cannot determine config path".into()))?;
        self.save_to(&config_file).await
    }

    /// Save configuration to a file
    pub async fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = toml::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;

        debug!("Config saved to {:?}", path);
        Ok(())
    }

    /// Whether the named group is ever surfaced
    pub fn is_hidden_group(&self, group: &str) -> bool {
        self.screen.hidden_groups.iter().any(|g| g == group)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.screen.os_package, "android");
        assert!(config.usage.permission_usage_enabled);
        assert!(!config.usage.permissions_hub_enabled);
        assert!(!config.screen.hide_info_button);
    }

    #[test]
    fn test_usage_exclusions() {
        let mut config = AppConfig::default();
        config.usage.excluded_groups.push("android.permission-group.SMS".into());

        assert!(config.usage.shows_usage_for("android.permission-group.CAMERA"));
        assert!(!config.usage.shows_usage_for("android.permission-group.SMS"));

        config.usage.permission_usage_enabled = false;
        assert!(!config.usage.shows_usage_for("android.permission-group.CAMERA"));
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let config: AppConfig =
            toml::from_str("[usage]\npermissions_hub_enabled = true\n").unwrap();
        assert!(config.usage.permissions_hub_enabled);
        assert!(config.usage.permission_usage_enabled);
        assert_eq!(config.screen.os_package, DEFAULT_OS_PACKAGE);
    }

    #[tokio::test]
    async fn test_load_writes_defaults_then_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let config = AppConfig::load_from(&path).await.unwrap();
        assert!(path.exists());
        assert_eq!(config.version, 1);

        let mut changed = config.clone();
        changed.screen.hidden_groups.push("android.permission-group.UNDEFINED".into());
        changed.save_to(&path).await.unwrap();

        let reloaded = AppConfig::load_from(&path).await.unwrap();
        assert!(reloaded.is_hidden_group("android.permission-group.UNDEFINED"));
    }
}
