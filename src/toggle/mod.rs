//! Toggle Controller for DeskFocus
//!
//! Owns the per-process toggle state: which monitor the gesture is allowed
//! on, whether a set of windows is currently minimized, and the monitor
//! snapshot used to answer "which monitor is the cursor on".

mod controller;


pub use controller::{ToggleController, TogglePhase, TriggerOutcome};
