//! Win32 implementation of `DesktopPlatform`

use windows::Win32::Foundation::{BOOL, HWND, LPARAM, POINT, RECT};
use windows::Win32::UI::WindowsAndMessaging::{
    EnumWindows, GetClassNameW, GetCursorPos, GetWindowLongW, GetWindowRect, IsIconic, IsWindow,
    IsWindowVisible, ShowWindow, GWL_EXSTYLE, SHOW_WINDOW_CMD, SW_MINIMIZE, SW_RESTORE,
    WS_EX_TOOLWINDOW,
};

use crate::core::error::{OsError, Result};
use crate::os::{DesktopPlatform, MonitorInfo, Point, Rect, WindowHandle};

/// Longest class name Win32 allows
const MAX_CLASS_NAME: usize = 256;

/// Desktop access through user32
#[derive(Debug, Default, Clone, Copy)]
pub struct Win32DesktopPlatform;

impl Win32DesktopPlatform {
    pub fn new() -> Self {
        Self
    }

    fn set_show_state(&self, window: WindowHandle, command: SHOW_WINDOW_CMD) -> Result<()> {
        let hwnd = HWND(window.0);
        unsafe {
            if !IsWindow(hwnd).as_bool() {
                return Err(OsError::WindowStateChangeFailed {
                    window: window.0,
                    reason: "window no longer exists".to_string(),
                }
                .into());
            }
            // The return value is the previous visibility, not a status
            let _ = ShowWindow(hwnd, command);
        }
        Ok(())
    }
}

impl DesktopPlatform for Win32DesktopPlatform {
    fn enumerate_monitors(&self) -> Result<Vec<MonitorInfo>> {
        super::monitor::enumerate_monitors()
    }

    fn cursor_position(&self) -> Result<Point> {
        let mut point = POINT::default();
        unsafe { GetCursorPos(&mut point) }.map_err(|e| OsError::CursorPositionFailed {
            reason: format!("GetCursorPos failed: {:?}", e),
        })?;
        Ok(Point::new(point.x, point.y))
    }

    fn top_level_windows(&self) -> Result<Vec<WindowHandle>> {
        let mut windows: Vec<WindowHandle> = Vec::new();
        let windows_ptr = &mut windows as *mut Vec<WindowHandle>;

        unsafe { EnumWindows(Some(enum_windows_callback), LPARAM(windows_ptr as isize)) }.map_err(
            |e| OsError::WindowEnumFailed {
                reason: format!("EnumWindows failed: {:?}", e),
            },
        )?;

        Ok(windows)
    }

    fn is_visible(&self, window: WindowHandle) -> bool {
        unsafe { IsWindowVisible(HWND(window.0)).as_bool() }
    }

    fn class_name(&self, window: WindowHandle) -> Option<String> {
        let mut buffer = [0u16; MAX_CLASS_NAME];
        let len = unsafe { GetClassNameW(HWND(window.0), &mut buffer) };
        if len <= 0 {
            return None;
        }
        Some(String::from_utf16_lossy(&buffer[..len as usize]))
    }

    fn is_tool_window(&self, window: WindowHandle) -> bool {
        let style = unsafe { GetWindowLongW(HWND(window.0), GWL_EXSTYLE) } as u32;
        style & WS_EX_TOOLWINDOW.0 != 0
    }

    fn window_rect(&self, window: WindowHandle) -> Option<Rect> {
        let mut rect = RECT::default();
        unsafe { GetWindowRect(HWND(window.0), &mut rect) }.ok()?;
        Some(Rect::from_edges(rect.left, rect.top, rect.right, rect.bottom))
    }

    fn is_minimized(&self, window: WindowHandle) -> bool {
        unsafe { IsIconic(HWND(window.0)).as_bool() }
    }

    fn minimize(&self, window: WindowHandle) -> Result<()> {
        self.set_show_state(window, SW_MINIMIZE)
    }

    fn restore(&self, window: WindowHandle) -> Result<()> {
        self.set_show_state(window, SW_RESTORE)
    }
}

unsafe extern "system" fn enum_windows_callback(hwnd: HWND, lparam: LPARAM) -> BOOL {
    let windows = &mut *(lparam.0 as *mut Vec<WindowHandle>);
    windows.push(WindowHandle(hwnd.0));
    BOOL(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_window_queries_are_benign() {
        let platform = Win32DesktopPlatform::new();
        let bogus = WindowHandle(0);
        assert!(!platform.is_visible(bogus));
        assert!(platform.class_name(bogus).is_none());
        assert!(platform.window_rect(bogus).is_none());
        assert!(platform.minimize(bogus).is_err());
    }

    #[test]
    fn test_enumerates_top_level_windows() {
        let platform = Win32DesktopPlatform::new();
        assert!(platform.top_level_windows().is_ok());
    }
}
