//! OS Integration Layer for DeskFocus
//!
//! This module provides:
//! - The platform-neutral desktop model (points, rectangles, monitors, window handles)
//! - The `DesktopPlatform` trait that the toggle logic queries and mutates through
//! - Monitor registry and window classification built on top of that trait
//! - Key tracking for the Win+D combination and the hook dispatch boundary
//! - The Win32 backend and a stub backend for other targets

pub mod classifier;
pub mod hook;
pub mod keys;
pub mod monitor;

#[cfg(windows)]
pub mod windows;

#[cfg(windows)]
pub use self::windows::{
    create_shortcut, DisplayChangeCallback, DisplayChangeEvent, DisplayChangeListener, KeyboardInterceptor,
    Win32DesktopPlatform as NativeDesktopPlatform,
};

#[cfg(not(windows))]
pub mod stub;

#[cfg(not(windows))]
pub use stub::{
    create_shortcut, DisplayChangeCallback, DisplayChangeEvent, DisplayChangeListener, KeyboardInterceptor,
    StubDesktopPlatform as NativeDesktopPlatform,
};

#[cfg(test)]
pub(crate) mod testing;


pub use classifier::WindowClassifier;
pub use hook::ComboCallback;
pub use keys::{KeyAction, KeyCombo, KeyEvent, KeyTracker, KeyTransition};
pub use monitor::{describe_monitors, MonitorRegistry};

use crate::core::error::Result;

/// A point in virtual-screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Rectangle bounds in virtual-screen coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self { x, y, width, height }
    }

    /// Build from left/top/right/bottom edges as Win32 reports them
    pub const fn from_edges(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            x: left,
            y: top,
            width: right - left,
            height: bottom - top,
        }
    }

    pub fn right(&self) -> i32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.y + self.height
    }

    /// Half-open containment: `left <= x < right`, `top <= y < bottom`
    pub fn contains(&self, point: Point) -> bool {
        self.x <= point.x && point.x < self.right() && self.y <= point.y && point.y < self.bottom()
    }

    /// Geometric center, rounding toward negative infinity
    pub fn center(&self) -> Point {
        let left = self.x as i64;
        let top = self.y as i64;
        let cx = (left + left + self.width as i64).div_euclid(2);
        let cy = (top + top + self.height as i64).div_euclid(2);
        Point::new(cx as i32, cy as i32)
    }
}

/// Monitor information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorInfo {
    /// Monitor handle (platform-specific, opaque)
    pub handle: usize,
    /// Monitor bounds
    pub rect: Rect,
    /// Whether this is the primary monitor
    pub is_primary: bool,
    /// Device name, informational only
    pub name: String,
}

/// Opaque top-level window handle. DeskFocus never owns the window behind it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindowHandle(pub isize);

impl std::fmt::Display for WindowHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// Everything the toggle logic needs from the windowing system.
///
/// Queries that concern a single window return `None`/`false` when the window
/// has gone away; they never fail the whole operation.
pub trait DesktopPlatform: Send + Sync {
    /// Enumerate monitors in OS order
    fn enumerate_monitors(&self) -> Result<Vec<MonitorInfo>>;

    /// Current cursor position
    fn cursor_position(&self) -> Result<Point>;

    /// All top-level windows in OS enumeration (z) order
    fn top_level_windows(&self) -> Result<Vec<WindowHandle>>;

    fn is_visible(&self, window: WindowHandle) -> bool;

    /// Window class name, `None` if it cannot be read
    fn class_name(&self, window: WindowHandle) -> Option<String>;

    /// Whether the window carries the tool-window extended style
    fn is_tool_window(&self, window: WindowHandle) -> bool;

    /// Window bounds, `None` if the window is gone
    fn window_rect(&self, window: WindowHandle) -> Option<Rect>;

    fn is_minimized(&self, window: WindowHandle) -> bool;

    fn minimize(&self, window: WindowHandle) -> Result<()>;

    fn restore(&self, window: WindowHandle) -> Result<()>;
}
