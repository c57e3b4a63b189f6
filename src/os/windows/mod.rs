//! Windows-specific OS integration
//!
//! This module provides Windows-specific implementations for:
//! - Desktop queries and window minimize/restore
//! - The low-level keyboard hook thread
//! - Multi-monitor enumeration
//! - Display change monitoring
//! - Startup-folder shortcuts

pub mod display_listener;
pub mod keyboard;
pub mod monitor;
pub mod platform;
pub mod shortcut;

pub use display_listener::{DisplayChangeCallback, DisplayChangeEvent, DisplayChangeListener};
pub use keyboard::KeyboardInterceptor;
pub use platform::Win32DesktopPlatform;
pub use shortcut::create_shortcut;
