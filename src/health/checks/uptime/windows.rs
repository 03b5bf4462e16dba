use std::io;
use std::sync::OnceLock;

use tracing::{debug, warn};
use windows_sys::Win32::Foundation::GetLastError;
use windows_sys::Win32::System::LibraryLoader::{
    GetProcAddress, LOAD_LIBRARY_SEARCH_SYSTEM32, LoadLibraryExW,
};

use super::tick_count::{TickCount32, TickCount64, TickCounter};
use super::{UpTimeSource, UptimeError};

/// kernel32.dll tick counters, resolved on first use and kept for the
/// process lifetime. Holds the Win32 error code if the library failed to load.
static KERNEL32: OnceLock<Result<TickCounter, i32>> = OnceLock::new();

/// Uptime from `GetTickCount64`, or `GetTickCount` where the former is missing
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformUpTime;

impl UpTimeSource for PlatformUpTime {
    fn up_time(&self) -> Result<u64, UptimeError> {
        match KERNEL32.get_or_init(load_kernel32) {
            Ok(counter) => counter.seconds(),
            Err(code) => Err(io::Error::from_raw_os_error(*code).into()),
        }
    }
}

fn load_kernel32() -> Result<TickCounter, i32> {
    let name: Vec<u16> = "kernel32.dll\0".encode_utf16().collect();

    // SAFETY: `name` is a NUL-terminated UTF-16 string that outlives the call
    let module = unsafe {
        LoadLibraryExW(name.as_ptr(), std::ptr::null_mut(), LOAD_LIBRARY_SEARCH_SYSTEM32)
    };
    if module.is_null() {
        // SAFETY: reads the calling thread's last-error value
        let code = unsafe { GetLastError() } as i32;
        warn!(code, "Failed to load kernel32.dll");
        return Err(code);
    }

    // SAFETY: the module handle is valid and the names are NUL-terminated
    let tick64 = unsafe { GetProcAddress(module, c"GetTickCount64".as_ptr().cast()) };
    // SAFETY: as above
    let tick32 = unsafe { GetProcAddress(module, c"GetTickCount".as_ptr().cast()) };

    if tick64.is_none() {
        debug!("GetTickCount64 not exported, falling back to GetTickCount");
    }

    // SAFETY: both entry points take no arguments and return the tick count
    // in the declared width; kernel32 is never unloaded.
    Ok(unsafe {
        TickCounter::new(
            tick64.map(|f| std::mem::transmute::<_, TickCount64>(f)),
            tick32.map(|f| std::mem::transmute::<_, TickCount32>(f)),
        )
    })
}
