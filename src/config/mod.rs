//! Configuration Management Module for DeskFocus
//!
//! Provides persistent user settings with:
//! - JSON file-based storage
//! - Thread-safe access
//! - Startup-folder autostart registration

mod autostart;
mod storage;

pub use autostart::{startup_folder, Autostart, SHORTCUT_NAME};
pub use storage::{AppSettings, ConfigError, ConfigResult, ConfigStore, ConfigStoreConfig, APP_DIR_NAME};
