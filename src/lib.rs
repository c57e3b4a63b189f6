//! DeskFocus - per-monitor "show desktop"
//!
//! This crate provides the core functionality for DeskFocus including:
//! - Win+D interception with exact per-key suppression
//! - Monitor snapshot and cursor-to-monitor resolution
//! - Window classification for the toggle
//! - The minimize/restore toggle state machine
//! - Persisted settings and Startup-folder autostart
//! - Structured logging with file rotation

pub mod config;
pub mod core;
pub mod logging;
pub mod os;
pub mod toggle;

// Re-export commonly used items
pub use config::{AppSettings, Autostart, ConfigStore};
pub use core::error::{DeskFocusError, OsError, Result};
pub use os::{DesktopPlatform, MonitorInfo, MonitorRegistry, NativeDesktopPlatform, WindowHandle};
pub use toggle::{ToggleController, TogglePhase, TriggerOutcome};
