//! Configuration Storage Implementation
//!
//! Provides JSON file-based settings storage with:
//! - Atomic writes using temp file + rename
//! - Thread-safe access via RwLock
//! - Tolerant loading: a missing or damaged file falls back to defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

/// Application directory name under the platform config dir
pub const APP_DIR_NAME: &str = "DeskFocus";

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration directory could not be determined")]
    NoConfigDir,
}

/// Configuration result type
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration store settings
#[derive(Debug, Clone)]
pub struct ConfigStoreConfig {
    /// Path to the configuration file
    pub config_path: PathBuf,
    /// Whether to write defaults when no file exists
    pub create_default: bool,
}

impl Default for ConfigStoreConfig {
    fn default() -> Self {
        let app_data = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR_NAME);

        Self {
            config_path: app_data.join("config.json"),
            create_default: true,
        }
    }
}

/// Persisted user settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AppSettings {
    /// Monitor the gesture is allowed on, 0-based in enumeration order
    #[serde(default)]
    pub allowed_monitor: usize,

    /// Whether DeskFocus starts with the user session
    #[serde(default)]
    pub autostart: bool,
}

/// Configuration store with thread-safe access
pub struct ConfigStore {
    settings: Arc<RwLock<AppSettings>>,
    config: ConfigStoreConfig,
}

impl ConfigStore {
    /// Open the store, loading the file or falling back to defaults
    pub async fn open(config: ConfigStoreConfig) -> ConfigResult<Self> {
        if let Some(parent) = config.config_path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let settings = match tokio::fs::try_exists(&config.config_path).await {
            Ok(true) => Self::load_tolerant(&config.config_path).await,
            _ => {
                let defaults = AppSettings::default();
                if config.create_default {
                    Self::save_to_file(&config.config_path, &defaults).await?;
                    tracing::info!("Created default settings at {}", config.config_path.display());
                }
                defaults
            }
        };

        Ok(Self {
            settings: Arc::new(RwLock::new(settings)),
            config,
        })
    }

    /// Open the store at the platform default location
    pub async fn open_default() -> ConfigResult<Self> {
        if dirs::config_dir().is_none() {
            return Err(ConfigError::NoConfigDir);
        }
        Self::open(ConfigStoreConfig::default()).await
    }

    /// Load settings; a damaged file yields defaults and a warning
    async fn load_tolerant(path: &Path) -> AppSettings {
        match Self::load_from_file(path).await {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(
                    "Could not read settings from {}, using defaults: {}",
                    path.display(),
                    e
                );
                AppSettings::default()
            }
        }
    }

    async fn load_from_file(path: &Path) -> ConfigResult<AppSettings> {
        let content = tokio::fs::read_to_string(path).await?;
        let settings: AppSettings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Save settings to file with atomic write
    async fn save_to_file(path: &Path, settings: &AppSettings) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(settings)?;

        let temp_path = path.with_extension("json.tmp");
        tokio::fs::write(&temp_path, &content).await?;
        tokio::fs::rename(&temp_path, path).await?;

        Ok(())
    }

    /// Current settings
    pub async fn get(&self) -> AppSettings {
        self.settings.read().await.clone()
    }

    /// Apply a change and persist it
    pub async fn update<F>(&self, updater: F) -> ConfigResult<AppSettings>
    where
        F: FnOnce(&mut AppSettings),
    {
        let mut settings = self.settings.write().await;

        let mut next = settings.clone();
        updater(&mut next);
        Self::save_to_file(&self.config.config_path, &next).await?;
        *settings = next;

        tracing::debug!(settings = ?*settings, "Settings saved");
        Ok(settings.clone())
    }

    /// Reset to default settings
    pub async fn reset(&self) -> ConfigResult<AppSettings> {
        self.update(|settings| *settings = AppSettings::default()).await
    }

    /// Get configuration file path
    pub fn path(&self) -> &Path {
        &self.config.config_path
    }
}

// Convenience methods for individual fields
impl ConfigStore {
    pub async fn set_allowed_monitor(&self, monitor_index: usize) -> ConfigResult<AppSettings> {
        self.update(|settings| {
            settings.allowed_monitor = monitor_index;
        })
        .await
    }

    pub async fn set_autostart(&self, enabled: bool) -> ConfigResult<AppSettings> {
        self.update(|settings| {
            settings.autostart = enabled;
        })
        .await
    }
}
