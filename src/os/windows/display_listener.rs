//! Display Change Listener
//!
//! Watches for display configuration changes (WM_DISPLAYCHANGE) through a
//! hidden window on its own thread, so the monitor snapshot can be refreshed
//! when monitors are added, removed or rearranged.

use std::sync::atomic::{AtomicIsize, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

use parking_lot::Mutex;
use windows::core::w;
use windows::Win32::Foundation::{HWND, LPARAM, LRESULT, WPARAM};
use windows::Win32::System::LibraryLoader::GetModuleHandleW;
use windows::Win32::UI::WindowsAndMessaging::{
    CreateWindowExW, DefWindowProcW, DispatchMessageW, GetMessageW, PostMessageW, PostQuitMessage,
    RegisterClassW, TranslateMessage, CW_USEDEFAULT, MSG, WINDOW_EX_STYLE, WM_CLOSE, WM_DESTROY,
    WM_DISPLAYCHANGE, WNDCLASSW, WS_OVERLAPPEDWINDOW,
};

use crate::core::error::{OsError, Result};

/// New primary display mode reported with a display change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayChangeEvent {
    pub width: u32,
    pub height: u32,
    pub bits_per_pixel: u32,
}

impl DisplayChangeEvent {
    fn from_params(wparam: WPARAM, lparam: LPARAM) -> Self {
        Self {
            width: (lparam.0 & 0xFFFF) as u32,
            height: ((lparam.0 >> 16) & 0xFFFF) as u32,
            bits_per_pixel: wparam.0 as u32,
        }
    }
}

/// Callback type for display change events
pub type DisplayChangeCallback = Arc<dyn Fn(DisplayChangeEvent) + Send + Sync>;

/// Only one listener window exists per process
static DISPLAY_CALLBACK: Mutex<Option<DisplayChangeCallback>> = parking_lot::const_mutex(None);

static LISTENER_HWND: AtomicIsize = AtomicIsize::new(0);

/// Display Change Listener
pub struct DisplayChangeListener {
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl DisplayChangeListener {
    pub fn new() -> Self {
        Self { thread_handle: None }
    }

    /// Create the listener window and start its message loop
    pub fn start(&mut self, callback: DisplayChangeCallback) -> Result<()> {
        if self.thread_handle.is_some() {
            return Ok(());
        }

        *DISPLAY_CALLBACK.lock() = Some(callback);

        let (tx, rx) = mpsc::channel::<std::result::Result<(), OsError>>();
        let handle = thread::Builder::new()
            .name("display-listener".to_string())
            .spawn(move || run_message_loop(tx))
            .map_err(|e| OsError::DisplayListenerFailed {
                reason: format!("failed to spawn listener thread: {}", e),
            })?;

        match rx.recv() {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                let _ = handle.join();
                *DISPLAY_CALLBACK.lock() = None;
                return Err(e.into());
            }
            Err(_) => {
                let _ = handle.join();
                *DISPLAY_CALLBACK.lock() = None;
                return Err(OsError::DisplayListenerFailed {
                    reason: "listener thread exited before reporting".to_string(),
                }
                .into());
            }
        }

        self.thread_handle = Some(handle);
        tracing::info!("Display change listener started");
        Ok(())
    }

    /// Close the listener window and wait for its thread
    pub fn stop(&mut self) {
        let Some(handle) = self.thread_handle.take() else {
            return;
        };

        let hwnd = LISTENER_HWND.load(Ordering::SeqCst);
        if hwnd != 0 {
            // DestroyWindow only works on the owning thread
            if let Err(e) = unsafe { PostMessageW(HWND(hwnd), WM_CLOSE, WPARAM(0), LPARAM(0)) } {
                tracing::warn!("Could not close display listener window: {:?}", e);
                return;
            }
        }

        if handle.join().is_err() {
            tracing::error!("Display listener thread panicked");
        }
        *DISPLAY_CALLBACK.lock() = None;
        tracing::info!("Display change listener stopped");
    }

    pub fn is_running(&self) -> bool {
        self.thread_handle.is_some()
    }
}

impl Default for DisplayChangeListener {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for DisplayChangeListener {
    fn drop(&mut self) {
        self.stop();
    }
}

fn run_message_loop(ready: mpsc::Sender<std::result::Result<(), OsError>>) {
    let hwnd = match create_listener_window() {
        Ok(hwnd) => hwnd,
        Err(e) => {
            let _ = ready.send(Err(e));
            return;
        }
    };
    LISTENER_HWND.store(hwnd.0, Ordering::SeqCst);
    let _ = ready.send(Ok(()));

    let mut msg = MSG::default();
    loop {
        let result = unsafe { GetMessageW(&mut msg, None, 0, 0) };
        if result.0 <= 0 {
            break;
        }
        unsafe {
            TranslateMessage(&msg);
            DispatchMessageW(&msg);
        }
    }

    LISTENER_HWND.store(0, Ordering::SeqCst);
}

fn create_listener_window() -> std::result::Result<HWND, OsError> {
    let class_name = w!("DeskFocus_DisplayListener");

    unsafe {
        let hinstance = GetModuleHandleW(None).map_err(|e| OsError::DisplayListenerFailed {
            reason: format!("GetModuleHandleW failed: {:?}", e),
        })?;

        let wc = WNDCLASSW {
            lpfnWndProc: Some(window_proc),
            hInstance: hinstance.into(),
            lpszClassName: class_name,
            ..Default::default()
        };

        // Zero on a restart means the class is already registered
        if RegisterClassW(&wc) == 0 {
            tracing::debug!("Display listener window class was already registered");
        }

        // Hidden top-level window; message-only windows miss broadcasts
        let hwnd = CreateWindowExW(
            WINDOW_EX_STYLE::default(),
            class_name,
            w!("DeskFocus"),
            WS_OVERLAPPEDWINDOW,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            CW_USEDEFAULT,
            None,
            None,
            hinstance,
            None,
        );

        if hwnd.0 == 0 {
            return Err(OsError::DisplayListenerFailed {
                reason: "CreateWindowExW failed".to_string(),
            });
        }
        Ok(hwnd)
    }
}

unsafe extern "system" fn window_proc(hwnd: HWND, msg: u32, wparam: WPARAM, lparam: LPARAM) -> LRESULT {
    match msg {
        WM_DISPLAYCHANGE => {
            let event = DisplayChangeEvent::from_params(wparam, lparam);
            tracing::debug!(
                "Display change detected: {}x{} @ {} bpp",
                event.width,
                event.height,
                event.bits_per_pixel
            );

            let callback = DISPLAY_CALLBACK.lock().clone();
            if let Some(callback) = callback {
                if std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| callback(event))).is_err() {
                    tracing::error!("Display change handler panicked");
                }
            }
            LRESULT(0)
        }
        WM_DESTROY => {
            PostQuitMessage(0);
            LRESULT(0)
        }
        _ => DefWindowProcW(hwnd, msg, wparam, lparam),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_listener_creation() {
        let listener = DisplayChangeListener::new();
        assert!(!listener.is_running());
    }

    #[test]
    fn test_event_from_params() {
        let event = DisplayChangeEvent::from_params(WPARAM(32), LPARAM((1080 << 16) | 1920));
        assert_eq!(
            event,
            DisplayChangeEvent {
                width: 1920,
                height: 1080,
                bits_per_pixel: 32
            }
        );
    }
}
