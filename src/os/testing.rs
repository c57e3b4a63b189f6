//! In-memory desktop used by unit and property tests on every target.

use std::collections::HashSet;

use parking_lot::Mutex;

use crate::core::error::{OsError, Result};
use crate::os::{DesktopPlatform, MonitorInfo, MonitorRegistry, Point, Rect, WindowHandle};

#[derive(Debug, Clone)]
pub struct FakeWindow {
    pub rect: Rect,
    pub class: Option<String>,
    pub visible: bool,
    pub tool: bool,
    pub minimized: bool,
}

impl FakeWindow {
    pub fn app(rect: Rect) -> Self {
        Self {
            rect,
            class: Some("Notepad".to_string()),
            visible: true,
            tool: false,
            minimized: false,
        }
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.class = Some(class.to_string());
        self
    }

    pub fn without_class(mut self) -> Self {
        self.class = None;
        self
    }

    pub fn tool(mut self) -> Self {
        self.tool = true;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    pub fn minimized(mut self) -> Self {
        self.minimized = true;
        self
    }
}

/// Recorded window-state mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Minimize(WindowHandle),
    Restore(WindowHandle),
}

struct Inner {
    monitors: Vec<MonitorInfo>,
    windows: Vec<(WindowHandle, FakeWindow)>,
    next_id: isize,
    cursor: Point,
    calls: Vec<Call>,
    failing: HashSet<WindowHandle>,
    fail_enumeration: bool,
    fail_cursor: bool,
    fail_monitors: bool,
}

pub struct FakeDesktop {
    inner: Mutex<Inner>,
}

pub fn monitor(x: i32, y: i32, width: i32, height: i32, is_primary: bool) -> MonitorInfo {
    MonitorInfo {
        handle: (x as usize) ^ 0x10001,
        rect: Rect::new(x, y, width, height),
        is_primary,
        name: String::new(),
    }
}

impl FakeDesktop {
    pub fn new(monitors: Vec<MonitorInfo>) -> Self {
        Self {
            inner: Mutex::new(Inner {
                monitors,
                windows: Vec::new(),
                next_id: 0x100,
                cursor: Point::new(0, 0),
                calls: Vec::new(),
                failing: HashSet::new(),
                fail_enumeration: false,
                fail_cursor: false,
                fail_monitors: false,
            }),
        }
    }

    /// M0 = (0,0)-(1920,1080), M1 = (1920,0)-(3840,1080)
    pub fn dual_1080p() -> Self {
        Self::new(vec![
            monitor(0, 0, 1920, 1080, true),
            monitor(1920, 0, 1920, 1080, false),
        ])
    }

    pub fn registry(&self) -> MonitorRegistry {
        MonitorRegistry::new(self.inner.lock().monitors.clone())
    }

    pub fn set_monitors(&self, monitors: Vec<MonitorInfo>) {
        self.inner.lock().monitors = monitors;
    }

    pub fn add_window(&self, window: FakeWindow) -> WindowHandle {
        let mut inner = self.inner.lock();
        let handle = WindowHandle(inner.next_id);
        inner.next_id += 0x10;
        inner.windows.push((handle, window));
        handle
    }

    pub fn close_window(&self, window: WindowHandle) {
        self.inner.lock().windows.retain(|(h, _)| *h != window);
    }

    pub fn set_cursor(&self, point: Point) {
        self.inner.lock().cursor = point;
    }

    /// The user un-minimizes a window by hand
    pub fn user_restore(&self, window: WindowHandle) {
        if let Some((_, w)) = self.inner.lock().windows.iter_mut().find(|(h, _)| *h == window) {
            w.minimized = false;
        }
    }

    pub fn fail_state_changes_for(&self, window: WindowHandle) {
        self.inner.lock().failing.insert(window);
    }

    pub fn fail_window_enumeration(&self, fail: bool) {
        self.inner.lock().fail_enumeration = fail;
    }

    pub fn fail_cursor(&self, fail: bool) {
        self.inner.lock().fail_cursor = fail;
    }

    pub fn fail_monitor_enumeration(&self, fail: bool) {
        self.inner.lock().fail_monitors = fail;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().calls.clone()
    }

    pub fn is_window_minimized(&self, window: WindowHandle) -> bool {
        self.with_window(window, |w| w.minimized).unwrap_or(false)
    }

    fn with_window<T>(&self, window: WindowHandle, f: impl FnOnce(&FakeWindow) -> T) -> Option<T> {
        let inner = self.inner.lock();
        inner.windows.iter().find(|(h, _)| *h == window).map(|(_, w)| f(w))
    }

    fn change_state(&self, window: WindowHandle, minimized: bool) -> Result<()> {
        let mut inner = self.inner.lock();
        inner.calls.push(if minimized {
            Call::Minimize(window)
        } else {
            Call::Restore(window)
        });

        if inner.failing.contains(&window) {
            return Err(OsError::WindowStateChangeFailed {
                window: window.0,
                reason: "access denied".to_string(),
            }
            .into());
        }

        match inner.windows.iter_mut().find(|(h, _)| *h == window) {
            Some((_, w)) => {
                w.minimized = minimized;
                Ok(())
            }
            None => Err(OsError::WindowStateChangeFailed {
                window: window.0,
                reason: "invalid window handle".to_string(),
            }
            .into()),
        }
    }
}

impl DesktopPlatform for FakeDesktop {
    fn enumerate_monitors(&self) -> Result<Vec<MonitorInfo>> {
        let inner = self.inner.lock();
        if inner.fail_monitors {
            return Err(OsError::MonitorEnumFailed {
                reason: "simulated".to_string(),
            }
            .into());
        }
        Ok(inner.monitors.clone())
    }

    fn cursor_position(&self) -> Result<Point> {
        let inner = self.inner.lock();
        if inner.fail_cursor {
            return Err(OsError::CursorPositionFailed {
                reason: "simulated".to_string(),
            }
            .into());
        }
        Ok(inner.cursor)
    }

    fn top_level_windows(&self) -> Result<Vec<WindowHandle>> {
        let inner = self.inner.lock();
        if inner.fail_enumeration {
            return Err(OsError::WindowEnumFailed {
                reason: "simulated".to_string(),
            }
            .into());
        }
        Ok(inner.windows.iter().map(|(h, _)| *h).collect())
    }

    fn is_visible(&self, window: WindowHandle) -> bool {
        self.with_window(window, |w| w.visible).unwrap_or(false)
    }

    fn class_name(&self, window: WindowHandle) -> Option<String> {
        self.with_window(window, |w| w.class.clone()).flatten()
    }

    fn is_tool_window(&self, window: WindowHandle) -> bool {
        self.with_window(window, |w| w.tool).unwrap_or(false)
    }

    fn window_rect(&self, window: WindowHandle) -> Option<Rect> {
        self.with_window(window, |w| w.rect)
    }

    fn is_minimized(&self, window: WindowHandle) -> bool {
        self.is_window_minimized(window)
    }

    fn minimize(&self, window: WindowHandle) -> Result<()> {
        self.change_state(window, true)
    }

    fn restore(&self, window: WindowHandle) -> Result<()> {
        self.change_state(window, false)
    }
}
