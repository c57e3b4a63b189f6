use std::mem;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::core::error::{ErrorRecovery, RecoveryAction, Result};
use crate::os::{ComboCallback, DesktopPlatform, MonitorInfo, MonitorRegistry, WindowClassifier, WindowHandle};

/// Current toggle phase
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TogglePhase {
    /// Nothing minimized by DeskFocus
    #[default]
    Idle,
    /// Windows minimized by the last trigger, in the order they were minimized
    Minimized(Vec<WindowHandle>),
}

impl TogglePhase {
    pub fn is_idle(&self) -> bool {
        matches!(self, TogglePhase::Idle)
    }

    /// Windows awaiting restore; empty while idle
    pub fn minimized_set(&self) -> &[WindowHandle] {
        match self {
            TogglePhase::Idle => &[],
            TogglePhase::Minimized(windows) => windows,
        }
    }
}

/// What a single `trigger()` did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TriggerOutcome {
    /// Cursor was not on the allowed monitor
    Ignored { cursor_monitor: Option<usize> },
    /// Windows were captured and minimized
    Minimized { windows: Vec<WindowHandle>, failures: usize },
    /// The captured set was restored
    Restored { windows: Vec<WindowHandle>, failures: usize },
}

#[derive(Debug, Default)]
struct ToggleState {
    allowed_monitor: usize,
    phase: TogglePhase,
    registry: MonitorRegistry,
}

/// Toggle Controller
///
/// All state sits behind one mutex. `trigger()` holds it for the whole
/// toggle so configuration changes cannot interleave with a toggle.
pub struct ToggleController {
    platform: Arc<dyn DesktopPlatform>,
    state: Mutex<ToggleState>,
}

impl ToggleController {
    /// Create a controller with an empty monitor snapshot
    pub fn new(platform: Arc<dyn DesktopPlatform>, allowed_monitor: usize) -> Self {
        Self {
            platform,
            state: Mutex::new(ToggleState {
                allowed_monitor,
                ..ToggleState::default()
            }),
        }
    }

    /// Toggle the windows on the allowed monitor if the cursor is there
    pub fn trigger(&self) -> Result<TriggerOutcome> {
        let mut state = self.state.lock();

        let cursor = self.platform.cursor_position()?;
        let cursor_monitor = state.registry.monitor_at_point(cursor);
        if cursor_monitor != Some(state.allowed_monitor) {
            tracing::debug!(
                cursor_x = cursor.x,
                cursor_y = cursor.y,
                ?cursor_monitor,
                allowed = state.allowed_monitor,
                "Cursor is not on the allowed monitor, ignoring"
            );
            return Ok(TriggerOutcome::Ignored { cursor_monitor });
        }

        match mem::replace(&mut state.phase, TogglePhase::Idle) {
            TogglePhase::Idle => {
                let classifier = WindowClassifier::new(self.platform.as_ref(), &state.registry);
                // On failure the phase stays Idle and nothing was touched
                let windows = classifier.enumerate_eligible_on(state.allowed_monitor)?;

                let failures = windows
                    .iter()
                    .filter(|&&window| !self.apply(window, true))
                    .count();

                tracing::info!(
                    monitor = state.allowed_monitor,
                    count = windows.len(),
                    failures,
                    "Minimized windows"
                );
                state.phase = TogglePhase::Minimized(windows.clone());
                Ok(TriggerOutcome::Minimized { windows, failures })
            }
            TogglePhase::Minimized(windows) => {
                let failures = windows
                    .iter()
                    .rev()
                    .filter(|&&window| !self.apply(window, false))
                    .count();

                tracing::info!(count = windows.len(), failures, "Restored windows");
                Ok(TriggerOutcome::Restored { windows, failures })
            }
        }
    }

    /// Minimize or restore one window; a failure is logged and skipped
    fn apply(&self, window: WindowHandle, minimize: bool) -> bool {
        let result = if minimize {
            self.platform.minimize(window)
        } else {
            self.platform.restore(window)
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                tracing::debug!(%window, error = %e, "Skipping window");
                false
            }
        }
    }

    /// Re-enumerate monitors. The previous snapshot is kept if enumeration fails.
    pub fn refresh_monitors(&self) -> Result<usize> {
        let registry = MonitorRegistry::capture(self.platform.as_ref())?;
        let count = registry.len();

        let mut state = self.state.lock();
        if state.allowed_monitor >= count {
            tracing::warn!(
                allowed = state.allowed_monitor + 1,
                available = count,
                "Allowed monitor is not connected; the gesture will do nothing"
            );
        }
        state.registry = registry;
        tracing::info!("Monitor snapshot refreshed: {} monitors", count);
        Ok(count)
    }

    pub fn set_allowed(&self, monitor_index: usize) {
        let mut state = self.state.lock();
        if state.allowed_monitor != monitor_index {
            tracing::info!(
                from = state.allowed_monitor,
                to = monitor_index,
                "Allowed monitor changed"
            );
        }
        state.allowed_monitor = monitor_index;
    }

    pub fn allowed(&self) -> usize {
        self.state.lock().allowed_monitor
    }

    /// Current monitor snapshot
    pub fn monitors(&self) -> Arc<[MonitorInfo]> {
        self.state.lock().registry.snapshot()
    }

    pub fn phase(&self) -> TogglePhase {
        self.state.lock().phase.clone()
    }

    /// Adapt `trigger()` to the keyboard interceptor
    pub fn combo_callback(self: &Arc<Self>) -> ComboCallback {
        let controller = Arc::clone(self);
        Arc::new(move || {
            if let Err(e) = controller.trigger() {
                match e.recovery_action() {
                    RecoveryAction::Skip => tracing::debug!("Show-desktop toggle skipped: {}", e),
                    _ => tracing::warn!("Show-desktop toggle failed: {}", e),
                }
            }
        })
    }
}
