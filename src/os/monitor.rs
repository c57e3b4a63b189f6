//! Monitor Registry
//!
//! Holds an immutable snapshot of the connected monitors and answers
//! "which monitor is at this point" queries. The snapshot is replaced
//! wholesale on refresh, never edited in place, so monitor numbers are only
//! meaningful between two refreshes.

use std::fmt::Write;
use std::sync::Arc;

use crate::core::error::Result;
use crate::os::{DesktopPlatform, MonitorInfo, Point, Rect};

/// Snapshot of monitors in OS enumeration order
#[derive(Debug, Clone)]
pub struct MonitorRegistry {
    monitors: Arc<[MonitorInfo]>,
}

impl MonitorRegistry {
    /// Create a registry from an already enumerated monitor list
    pub fn new(monitors: Vec<MonitorInfo>) -> Self {
        Self {
            monitors: monitors.into(),
        }
    }

    /// Create a registry by enumerating monitors through the platform
    pub fn capture(platform: &dyn DesktopPlatform) -> Result<Self> {
        let monitors = platform.enumerate_monitors()?;
        tracing::debug!("Captured monitor snapshot with {} monitors", monitors.len());
        Ok(Self::new(monitors))
    }

    /// Current snapshot. Cheap to clone; outlives later refreshes.
    pub fn snapshot(&self) -> Arc<[MonitorInfo]> {
        Arc::clone(&self.monitors)
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&MonitorInfo> {
        self.monitors.get(index)
    }

    /// Index of the monitor containing `point`; first match wins on overlap
    pub fn monitor_at_point(&self, point: Point) -> Option<usize> {
        self.monitors.iter().position(|m| m.rect.contains(point))
    }

    /// Index of the monitor containing the center of `rect`
    pub fn monitor_of_rect(&self, rect: &Rect) -> Option<usize> {
        self.monitor_at_point(rect.center())
    }
}

impl Default for MonitorRegistry {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

/// Human-readable listing, numbered from 1 the way users pick monitors
pub fn describe_monitors(monitors: &[MonitorInfo]) -> String {
    let mut out = String::new();

    if monitors.is_empty() {
        out.push_str("No monitors detected\n");
        return out;
    }

    for (i, monitor) in monitors.iter().enumerate() {
        let r = monitor.rect;
        let primary = if monitor.is_primary { " (PRIMARY)" } else { "" };
        let _ = writeln!(out, "Monitor {}{}", i + 1, primary);
        let _ = writeln!(out, "  Resolution: {}x{}", r.width, r.height);
        let _ = writeln!(
            out,
            "  Position: x={} y={} -> x={} y={}",
            r.x,
            r.y,
            r.right(),
            r.bottom()
        );
        if !monitor.name.is_empty() {
            let _ = writeln!(out, "  Device: {}", monitor.name);
        }
        out.push('\n');
    }

    out
}
