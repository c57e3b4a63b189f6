//! Autostart registration
//!
//! DeskFocus starts with the user session through a shortcut in the per-user
//! Startup folder. The shortcut existing is the registration; there is no
//! other state.

use std::path::{Path, PathBuf};

use crate::core::error::{OsError, Result};
use crate::os;

/// Shortcut file name inside the Startup folder
pub const SHORTCUT_NAME: &str = "DeskFocus.lnk";

/// Startup folder location relative to the roaming config dir
const STARTUP_SUBDIR: [&str; 5] = ["Microsoft", "Windows", "Start Menu", "Programs", "Startup"];

/// Per-user Startup folder (`%APPDATA%\Microsoft\Windows\Start Menu\Programs\Startup`)
pub fn startup_folder() -> Option<PathBuf> {
    let mut dir = dirs::config_dir()?;
    dir.extend(STARTUP_SUBDIR);
    Some(dir)
}

/// Startup-folder shortcut manager
#[derive(Debug, Clone)]
pub struct Autostart {
    startup_dir: PathBuf,
}

impl Autostart {
    /// Use the current user's Startup folder
    pub fn new() -> Result<Self> {
        let startup_dir = startup_folder().ok_or_else(|| OsError::AutostartFailed {
            reason: "could not locate the Startup folder".to_string(),
        })?;
        Ok(Self::with_startup_dir(startup_dir))
    }

    pub fn with_startup_dir(startup_dir: impl Into<PathBuf>) -> Self {
        Self {
            startup_dir: startup_dir.into(),
        }
    }

    pub fn shortcut_path(&self) -> PathBuf {
        self.startup_dir.join(SHORTCUT_NAME)
    }

    pub fn is_enabled(&self) -> bool {
        self.shortcut_path().exists()
    }

    /// Create or remove the shortcut
    pub fn set_enabled(&self, enabled: bool) -> Result<()> {
        let link = self.shortcut_path();

        if !enabled {
            if link.exists() {
                std::fs::remove_file(&link)?;
                tracing::info!("Removed autostart shortcut {}", link.display());
            }
            return Ok(());
        }

        std::fs::create_dir_all(&self.startup_dir)?;
        let exe = std::env::current_exe()?;
        let working_dir = exe.parent().map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from("."));

        os::create_shortcut(&link, &exe, &working_dir)?;
        tracing::info!("Created autostart shortcut {} -> {}", link.display(), exe.display());
        Ok(())
    }

    /// Bring the registration in line with the stored preference.
    /// Returns whether anything changed.
    pub fn apply(&self, wanted: bool) -> Result<bool> {
        if self.is_enabled() == wanted {
            return Ok(false);
        }
        self.set_enabled(wanted)?;
        Ok(true)
    }
}
