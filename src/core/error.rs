//! Error types for DeskFocus
//!
//! Every failure is classified by how the caller should react. Nothing in
//! DeskFocus is retried: a failed window operation is skipped, a failed hook
//! installation aborts startup.

use thiserror::Error;

/// Result type alias for DeskFocus operations
pub type Result<T> = std::result::Result<T, DeskFocusError>;

/// Main error type for DeskFocus
#[derive(Error, Debug)]
pub enum DeskFocusError {
    #[error("OS integration error: {0}")]
    Os(#[from] OsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// OS integration errors
#[derive(Error, Debug)]
pub enum OsError {
    #[error("Keyboard hook failed: {reason}")]
    KeyboardHookFailed { reason: String },

    #[error("Interceptor thread failed: {reason}")]
    InterceptorThreadFailed { reason: String },

    #[error("Monitor enumeration failed: {reason}")]
    MonitorEnumFailed { reason: String },

    #[error("Cursor position unavailable: {reason}")]
    CursorPositionFailed { reason: String },

    #[error("Window enumeration failed: {reason}")]
    WindowEnumFailed { reason: String },

    #[error("Window {window:#x} state change failed: {reason}")]
    WindowStateChangeFailed { window: isize, reason: String },

    #[error("Display change listener failed: {reason}")]
    DisplayListenerFailed { reason: String },

    #[error("Autostart registration failed: {reason}")]
    AutostartFailed { reason: String },

    #[error("Platform not supported: {platform}")]
    PlatformNotSupported { platform: String },
}

impl OsError {
    /// Shorthand for the error every non-Windows backend reports.
    pub fn unsupported() -> Self {
        OsError::PlatformNotSupported {
            platform: std::env::consts::OS.to_string(),
        }
    }
}

/// Trait for error recovery strategies
pub trait ErrorRecovery {
    /// Get recovery action suggestion
    fn recovery_action(&self) -> RecoveryAction;

    /// Whether the process cannot do its job after this error
    fn is_fatal(&self) -> bool {
        self.recovery_action() == RecoveryAction::Abort
    }
}

/// Recovery action suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    /// Skip this item and continue
    Skip,
    /// Notify user and keep running
    NotifyUser,
    /// Abort the operation
    Abort,
}

impl ErrorRecovery for DeskFocusError {
    fn recovery_action(&self) -> RecoveryAction {
        match self {
            DeskFocusError::Os(e) => e.recovery_action(),
            DeskFocusError::Io(_) => RecoveryAction::NotifyUser,
        }
    }
}

impl ErrorRecovery for OsError {
    fn recovery_action(&self) -> RecoveryAction {
        match self {
            OsError::KeyboardHookFailed { .. } => RecoveryAction::Abort,
            OsError::InterceptorThreadFailed { .. } => RecoveryAction::Abort,
            OsError::PlatformNotSupported { .. } => RecoveryAction::Abort,
            OsError::WindowStateChangeFailed { .. } => RecoveryAction::Skip,
            OsError::CursorPositionFailed { .. } => RecoveryAction::Skip,
            OsError::WindowEnumFailed { .. } => RecoveryAction::Skip,
            OsError::MonitorEnumFailed { .. } => RecoveryAction::NotifyUser,
            OsError::DisplayListenerFailed { .. } => RecoveryAction::NotifyUser,
            OsError::AutostartFailed { .. } => RecoveryAction::NotifyUser,
        }
    }
}
