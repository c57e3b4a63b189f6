//! Window Classifier
//!
//! Decides which top-level windows are ordinary application windows and which
//! monitor each one lives on.

use crate::core::error::Result;
use crate::os::{DesktopPlatform, MonitorRegistry, WindowHandle};

/// Shell-owned window classes that must never be minimized
pub const SHELL_WINDOW_CLASSES: &[&str] = &["Progman", "Shell_TrayWnd"];

/// Window Classifier
///
/// Borrows the platform and a monitor snapshot for the duration of one query.
pub struct WindowClassifier<'a> {
    platform: &'a dyn DesktopPlatform,
    registry: &'a MonitorRegistry,
}

impl<'a> WindowClassifier<'a> {
    pub fn new(platform: &'a dyn DesktopPlatform, registry: &'a MonitorRegistry) -> Self {
        Self { platform, registry }
    }

    /// Visible, not a shell window, not a tool window
    pub fn is_eligible(&self, window: WindowHandle) -> bool {
        if !self.platform.is_visible(window) {
            return false;
        }

        match self.platform.class_name(window) {
            Some(class) if SHELL_WINDOW_CLASSES.contains(&class.as_str()) => return false,
            Some(_) => {}
            None => return false,
        }

        !self.platform.is_tool_window(window)
    }

    /// Monitor owning the center of the window, if any
    pub fn monitor_of(&self, window: WindowHandle) -> Option<usize> {
        let rect = self.platform.window_rect(window)?;
        self.registry.monitor_of_rect(&rect)
    }

    /// Eligible, non-minimized windows centered on `monitor_index`, in OS order
    pub fn enumerate_eligible_on(&self, monitor_index: usize) -> Result<Vec<WindowHandle>> {
        let windows = self.platform.top_level_windows()?;

        let eligible: Vec<WindowHandle> = windows
            .into_iter()
            .filter(|&w| self.is_eligible(w))
            .filter(|&w| self.monitor_of(w) == Some(monitor_index))
            .filter(|&w| !self.platform.is_minimized(w))
            .collect();

        tracing::debug!(
            monitor = monitor_index,
            count = eligible.len(),
            "Enumerated eligible windows"
        );
        Ok(eligible)
    }
}
