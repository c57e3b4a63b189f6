//! Windows monitor enumeration

use windows::Win32::Foundation::{BOOL, LPARAM, RECT};
use windows::Win32::Graphics::Gdi::{EnumDisplayMonitors, GetMonitorInfoW, HDC, HMONITOR, MONITORINFOEXW};

use crate::core::error::{OsError, Result};
use crate::os::{MonitorInfo, Rect};

/// MONITORINFOF_PRIMARY
const MONITOR_PRIMARY_FLAG: u32 = 0x1;

/// Enumerate all connected monitors in OS order
pub fn enumerate_monitors() -> Result<Vec<MonitorInfo>> {
    let mut monitors: Vec<MonitorInfo> = Vec::new();
    let monitors_ptr = &mut monitors as *mut Vec<MonitorInfo>;

    let ok = unsafe {
        EnumDisplayMonitors(
            HDC::default(),
            None,
            Some(monitor_enum_callback),
            LPARAM(monitors_ptr as isize),
        )
    };

    if !ok.as_bool() {
        return Err(OsError::MonitorEnumFailed {
            reason: format!("EnumDisplayMonitors failed: {:?}", windows::core::Error::from_win32()),
        }
        .into());
    }

    tracing::debug!("Enumerated {} monitors", monitors.len());
    Ok(monitors)
}

unsafe extern "system" fn monitor_enum_callback(
    hmonitor: HMONITOR,
    _hdc: HDC,
    _lprect: *mut RECT,
    lparam: LPARAM,
) -> BOOL {
    let monitors = &mut *(lparam.0 as *mut Vec<MonitorInfo>);

    let mut monitor_info = MONITORINFOEXW::default();
    monitor_info.monitorInfo.cbSize = std::mem::size_of::<MONITORINFOEXW>() as u32;

    if GetMonitorInfoW(hmonitor, &mut monitor_info.monitorInfo).as_bool() {
        let rect = monitor_info.monitorInfo.rcMonitor;
        let device = &monitor_info.szDevice;
        let len = device.iter().position(|&c| c == 0).unwrap_or(device.len());

        monitors.push(MonitorInfo {
            handle: hmonitor.0 as usize,
            rect: Rect::from_edges(rect.left, rect.top, rect.right, rect.bottom),
            is_primary: monitor_info.monitorInfo.dwFlags & MONITOR_PRIMARY_FLAG != 0,
            name: String::from_utf16_lossy(&device[..len]),
        });
    } else {
        tracing::debug!("GetMonitorInfoW failed for monitor {:#x}", hmonitor.0);
    }

    BOOL(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enumerate_reports_primary() {
        // Interactive sessions always have at least one monitor
        if let Ok(monitors) = enumerate_monitors() {
            if !monitors.is_empty() {
                assert_eq!(monitors.iter().filter(|m| m.is_primary).count(), 1);
                assert!(monitors.iter().all(|m| m.rect.width > 0 && m.rect.height > 0));
            }
        }
    }
}
