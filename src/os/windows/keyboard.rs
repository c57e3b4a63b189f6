//! Windows Keyboard Interceptor
//!
//! Installs a WH_KEYBOARD_LL hook on a dedicated thread and pumps that
//! thread's message queue until asked to stop. The hook procedure only
//! unpacks its arguments and hands the key to `os::hook`, which owns the
//! tracking state and runs the combination callback.

use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use windows::Win32::Foundation::{HINSTANCE, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::System::Threading::GetCurrentThreadId;
use windows::Win32::UI::WindowsAndMessaging::{
    CallNextHookEx, DispatchMessageW, GetMessageW, PeekMessageW, PostThreadMessageW,
    SetWindowsHookExW, TranslateMessage, UnhookWindowsHookEx, HHOOK, KBDLLHOOKSTRUCT,
    MSG, PM_NOREMOVE, WH_KEYBOARD_LL, WM_QUIT,
};

use crate::core::error::{OsError, Result};
use crate::os::hook::{self, ComboCallback};
use crate::os::keys::KeyCombo;

const THREAD_NAME: &str = "key-interceptor";

struct HookThread {
    thread_id: u32,
    handle: JoinHandle<()>,
}

/// Keyboard Interceptor
///
/// Owns the hook thread. Dropping the interceptor stops it.
pub struct KeyboardInterceptor {
    worker: Option<HookThread>,
}

impl KeyboardInterceptor {
    pub fn new() -> Self {
        Self { worker: None }
    }

    /// Install the hook on a new thread. Returns once the hook is in place or
    /// installation failed; does nothing if already running.
    pub fn start(&mut self, callback: ComboCallback) -> Result<()> {
        if self.worker.is_some() {
            return Ok(());
        }

        let (tx, rx) = mpsc::channel::<std::result::Result<u32, OsError>>();

        let handle = thread::Builder::new()
            .name(THREAD_NAME.to_string())
            .spawn(move || run_hook_thread(callback, tx))
            .map_err(|e| OsError::InterceptorThreadFailed {
                reason: format!("failed to spawn {}: {}", THREAD_NAME, e),
            })?;

        let thread_id = match rx.recv() {
            Ok(Ok(thread_id)) => thread_id,
            Ok(Err(e)) => {
                let _ = handle.join();
                return Err(e.into());
            }
            Err(_) => {
                let _ = handle.join();
                return Err(OsError::InterceptorThreadFailed {
                    reason: "hook thread exited before reporting".to_string(),
                }
                .into());
            }
        };

        self.worker = Some(HookThread { thread_id, handle });
        tracing::info!(thread_id, "Keyboard interceptor started");
        Ok(())
    }

    /// Ask the hook thread to unhook and exit, then wait for it.
    ///
    /// If the thread cannot be signalled the worker is kept, so `is_running()`
    /// stays true and a later `stop()` (or drop) tries again.
    pub fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };

        let posted = post_quit(worker.thread_id).or_else(|first| {
            tracing::debug!("Retrying quit signal after {:?}", first);
            thread::yield_now();
            post_quit(worker.thread_id)
        });
        if let Err(e) = posted {
            tracing::warn!(
                thread_id = worker.thread_id,
                "Could not signal keyboard interceptor thread, hook may still be installed: {:?}",
                e
            );
            self.worker = Some(worker);
            return;
        }

        if worker.handle.join().is_err() {
            tracing::error!("Keyboard interceptor thread panicked");
        }
        tracing::info!("Keyboard interceptor stopped");
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }
}

impl Default for KeyboardInterceptor {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for KeyboardInterceptor {
    fn drop(&mut self) {
        self.stop();
    }
}

fn post_quit(thread_id: u32) -> windows::core::Result<()> {
    unsafe { PostThreadMessageW(thread_id, WM_QUIT, WPARAM(0), LPARAM(0)) }
}

fn run_hook_thread(callback: ComboCallback, ready: mpsc::Sender<std::result::Result<u32, OsError>>) {
    let thread_id = unsafe { GetCurrentThreadId() };

    // Make sure the queue exists before anyone posts WM_QUIT to it
    let mut msg = MSG::default();
    unsafe {
        let _ = PeekMessageW(&mut msg, None, 0, 0, PM_NOREMOVE);
    }

    let _dispatch = hook::install(KeyCombo::SHOW_DESKTOP, callback);

    let hook = match install_hook() {
        Ok(hook) => hook,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };
    let _ = ready.send(Ok(thread_id));

    loop {
        let result = unsafe { GetMessageW(&mut msg, None, 0, 0) };
        if result.0 <= 0 {
            if result.0 < 0 {
                tracing::error!("GetMessageW failed on the hook thread");
            }
            break;
        }
        unsafe {
            TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    if let Err(e) = unsafe { UnhookWindowsHookEx(hook) } {
        tracing::warn!("UnhookWindowsHookEx failed: {:?}", e);
    }
    tracing::debug!("Keyboard hook removed");
}

fn install_hook() -> std::result::Result<HHOOK, OsError> {
    unsafe {
        let module = GetModuleHandleW(None).map_err(|e| OsError::KeyboardHookFailed {
            reason: format!("GetModuleHandleW failed: {:?}", e),
        })?;

        SetWindowsHookExW(
            WH_KEYBOARD_LL,
            Some(keyboard_hook_proc),
            HINSTANCE(module.0),
            0,
        )
        .map_err(|e| OsError::KeyboardHookFailed {
            reason: format!("SetWindowsHookExW failed: {:?}", e),
        })
    }
}

/// Low-level keyboard hook procedure
///
/// Called by Windows on the hook thread for every keyboard event system-wide.
unsafe extern "system" fn keyboard_hook_proc(code: i32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    if code >= 0 {
        let kb = &*(lparam.0 as *const KBDLLHOOKSTRUCT);
        if hook::dispatch_message(wparam.0 as u32, kb.vkCode) {
            return LRESULT(1);
        }
    }

    CallNextHookEx(HHOOK::default(), code, wparam, lparam)
}
