//! DeskFocus Core Module
//!
//! Error types and the recovery classification shared by every subsystem.

pub mod error;

// Re-export commonly used items
pub use error::{DeskFocusError, ErrorRecovery, OsError, RecoveryAction, Result};
