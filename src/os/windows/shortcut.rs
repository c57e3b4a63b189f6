//! Shell shortcut (.lnk) writer

use std::path::Path;

use windows::core::{ComInterface, HSTRING};
use windows::Win32::Foundation::BOOL;
use windows::Win32::System::Com::{
    CoCreateInstance, CoInitializeEx, CoUninitialize, IPersistFile, CLSCTX_INPROC_SERVER,
    COINIT_APARTMENTTHREADED,
};
use windows::Win32::UI::Shell::{IShellLinkW, ShellLink};

use crate::core::error::{OsError, Result};

/// Write a shortcut at `link` pointing to `target`
///
/// COM is initialized on a short-lived thread so the caller's apartment
/// (possibly a runtime worker) is left alone.
pub fn create_shortcut(link: &Path, target: &Path, working_dir: &Path) -> Result<()> {
    let link = HSTRING::from(link.as_os_str());
    let target = HSTRING::from(target.as_os_str());
    let working_dir = HSTRING::from(working_dir.as_os_str());

    let worker = std::thread::Builder::new()
        .name("shell-link".to_string())
        .spawn(move || write_link(&link, &target, &working_dir))
        .map_err(|e| OsError::AutostartFailed {
            reason: format!("failed to spawn COM thread: {}", e),
        })?;

    match worker.join() {
        Ok(result) => result.map_err(|e| {
            OsError::AutostartFailed {
                reason: format!("IShellLinkW failed: {:?}", e),
            }
            .into()
        }),
        Err(_) => Err(OsError::AutostartFailed {
            reason: "COM thread panicked".to_string(),
        }
        .into()),
    }
}

fn write_link(link: &HSTRING, target: &HSTRING, working_dir: &HSTRING) -> windows::core::Result<()> {
    unsafe {
        CoInitializeEx(None, COINIT_APARTMENTTHREADED)?;
        let result = (|| {
            let shell_link: IShellLinkW = CoCreateInstance(&ShellLink, None, CLSCTX_INPROC_SERVER)?;
            shell_link.SetPath(target)?;
            shell_link.SetWorkingDirectory(working_dir)?;
            shell_link.SetIconLocation(target, 0)?;

            let persist: IPersistFile = shell_link.cast()?;
            persist.Save(link, BOOL::from(true))
        })();
        CoUninitialize();
        result
    }
}
