//! Hook dispatch boundary
//!
//! The OS calls the low-level keyboard hook on the thread that installed it.
//! Everything that thread needs (the key tracker and the combination
//! callback) lives in a thread-local context so the `extern "system"` hook
//! procedure can stay a thin shim. This module is platform-neutral; the Win32
//! shim in `os::windows::keyboard` only translates the hook arguments.
//!
//! Two rules hold at this boundary:
//! - a panic raised by the callback is caught and logged here, never
//!   unwinding into the OS dispatch path
//! - a nested hook invocation that arrives while the callback is still
//!   running (sent messages pumped during a cross-thread `ShowWindow`) is
//!   suppressed but does not run the callback a second time

use std::any::Any;
use std::cell::RefCell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::os::keys::{KeyAction, KeyCombo, KeyEvent, KeyTracker, KeyTransition};

/// Invoked on the hook thread each time the combination fires
pub type ComboCallback = Arc<dyn Fn() + Send + Sync>;

struct DispatchContext {
    tracker: KeyTracker,
    callback: ComboCallback,
    firing: bool,
}

thread_local! {
    static CONTEXT: RefCell<Option<DispatchContext>> = RefCell::new(None);
}

/// Keeps the current thread's dispatch context installed until dropped
#[must_use = "the dispatch context is removed when the guard is dropped"]
pub struct DispatchGuard {
    _not_send: std::marker::PhantomData<*const ()>,
}

impl Drop for DispatchGuard {
    fn drop(&mut self) {
        clear();
    }
}

/// Install the dispatch context for the calling thread, replacing any previous one
pub fn install(combo: KeyCombo, callback: ComboCallback) -> DispatchGuard {
    CONTEXT.with(|ctx| {
        *ctx.borrow_mut() = Some(DispatchContext {
            tracker: KeyTracker::new(combo),
            callback,
            firing: false,
        });
    });
    DispatchGuard {
        _not_send: std::marker::PhantomData,
    }
}

/// Remove the calling thread's dispatch context
pub fn clear() {
    CONTEXT.with(|ctx| {
        if let Ok(mut slot) = ctx.try_borrow_mut() {
            *slot = None;
        }
    });
}

#[cfg(test)]
fn is_installed() -> bool {
    CONTEXT.with(|ctx| ctx.borrow().is_some())
}

/// Translate a raw hook message and return whether it must be swallowed
pub fn dispatch_message(message: u32, vk: u32) -> bool {
    match KeyTransition::from_message(message) {
        Some(transition) => dispatch_event(KeyEvent { vk, transition }).suppresses(),
        None => false,
    }
}

/// Run one key event through the tracker, firing the callback when needed
pub fn dispatch_event(event: KeyEvent) -> KeyAction {
    let (action, callback) = CONTEXT.with(|ctx| {
        let Ok(mut slot) = ctx.try_borrow_mut() else {
            return (KeyAction::Pass, None);
        };
        let Some(context) = slot.as_mut() else {
            return (KeyAction::Pass, None);
        };

        match context.tracker.observe(event) {
            KeyAction::Fire if context.firing => {
                tracing::debug!("Combination re-entered while a toggle is running, skipping");
                (KeyAction::Suppress, None)
            }
            KeyAction::Fire => {
                context.firing = true;
                (KeyAction::Fire, Some(Arc::clone(&context.callback)))
            }
            other => (other, None),
        }
    });

    // The RefCell borrow is released here so the callback may re-enter
    if let Some(callback) = callback {
        invoke_contained(&callback);
        CONTEXT.with(|ctx| {
            if let Ok(mut slot) = ctx.try_borrow_mut() {
                if let Some(context) = slot.as_mut() {
                    context.firing = false;
                }
            }
        });
    }

    action
}

fn invoke_contained(callback: &ComboCallback) {
    if let Err(payload) = panic::catch_unwind(AssertUnwindSafe(|| callback())) {
        tracing::error!("Combination handler panicked: {}", panic_message(&payload));
    }
}

fn panic_message(payload: &Box<dyn Any + Send>) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic payload"
    }
}
