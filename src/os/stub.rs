//! Stub backend for non-Windows platforms
//!
//! Lets the crate build and its platform-neutral logic run on macOS and
//! Linux. Nothing here touches real windows or keys.

use std::path::Path;
use std::sync::Arc;

use crate::core::error::{OsError, Result};
use crate::os::{ComboCallback, DesktopPlatform, MonitorInfo, Point, Rect, WindowHandle};

/// Single 1920x1080 monitor with no windows
#[derive(Debug, Default, Clone, Copy)]
pub struct StubDesktopPlatform;

impl StubDesktopPlatform {
    pub fn new() -> Self {
        Self
    }
}

impl DesktopPlatform for StubDesktopPlatform {
    fn enumerate_monitors(&self) -> Result<Vec<MonitorInfo>> {
        Ok(vec![MonitorInfo {
            handle: 0,
            rect: Rect::new(0, 0, 1920, 1080),
            is_primary: true,
            name: "Default".to_string(),
        }])
    }

    fn cursor_position(&self) -> Result<Point> {
        Ok(Point::new(0, 0))
    }

    fn top_level_windows(&self) -> Result<Vec<WindowHandle>> {
        Ok(Vec::new())
    }

    fn is_visible(&self, _window: WindowHandle) -> bool {
        false
    }

    fn class_name(&self, _window: WindowHandle) -> Option<String> {
        None
    }

    fn is_tool_window(&self, _window: WindowHandle) -> bool {
        false
    }

    fn window_rect(&self, _window: WindowHandle) -> Option<Rect> {
        None
    }

    fn is_minimized(&self, _window: WindowHandle) -> bool {
        false
    }

    fn minimize(&self, _window: WindowHandle) -> Result<()> {
        Err(OsError::unsupported().into())
    }

    fn restore(&self, _window: WindowHandle) -> Result<()> {
        Err(OsError::unsupported().into())
    }
}

/// Keyboard interceptor that cannot be started
#[derive(Debug, Default)]
pub struct KeyboardInterceptor;

impl KeyboardInterceptor {
    pub fn new() -> Self {
        Self
    }

    pub fn start(&mut self, _callback: ComboCallback) -> Result<()> {
        Err(OsError::unsupported().into())
    }

    pub fn stop(&mut self) {}

    pub fn is_running(&self) -> bool {
        false
    }
}

/// New primary display mode reported with a display change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayChangeEvent {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u32,
}

pub type DisplayChangeCallback = Arc<dyn Fn(DisplayChangeEvent) + Send + Sync>;

/// Display listener that never fires
#[derive(Debug, Default)]
pub struct DisplayChangeListener;

impl DisplayChangeListener {
    pub fn new() -> Self {
        Self
    }

    pub fn start(&mut self, _callback: DisplayChangeCallback) -> Result<()> {
        tracing::warn!("Display change notifications not supported on this platform");
        Err(OsError::unsupported().into())
    }

    pub fn stop(&mut self) {}

    pub fn is_running(&self) -> bool {
        false
    }
}

pub fn create_shortcut(_link: &Path, _target: &Path, _working_dir: &Path) -> Result<()> {
    Err(OsError::unsupported().into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DeskFocusError;
    use crate::os::MonitorRegistry;
    use crate::toggle::{ToggleController, TriggerOutcome};

    #[test]
    fn test_stub_reports_single_monitor() {
        let platform = StubDesktopPlatform::new();
        let registry = MonitorRegistry::capture(&platform).unwrap();
        assert_eq!(registry.len(), 1);
        assert!(registry.get(0).map(|m| m.is_primary).unwrap_or(false));
    }

    #[test]
    fn test_stub_interceptor_is_unsupported() {
        let mut interceptor = KeyboardInterceptor::new();
        let result = interceptor.start(Arc::new(|| {}));
        assert!(matches!(
            result,
            Err(DeskFocusError::Os(OsError::PlatformNotSupported { .. }))
        ));
        assert!(!interceptor.is_running());
    }

    #[test]
    fn test_stub_controller_toggles_nothing() {
        let controller = ToggleController::new(Arc::new(StubDesktopPlatform::new()), 0);
        controller.refresh_monitors().unwrap();
        assert_eq!(
            controller.trigger().unwrap(),
            TriggerOutcome::Minimized {
                windows: vec![],
                failures: 0
            }
        );
    }

    #[test]
    fn test_stub_shortcut_is_unsupported() {
        let p = Path::new("x.lnk");
        assert!(create_shortcut(p, p, p).is_err());
    }
}
