//! Linux kernel system-information counter

use std::io;
use std::mem::MaybeUninit;

/// Reads `sysinfo(2)`
pub(crate) fn sysinfo() -> io::Result<libc::sysinfo> {
    let mut info = MaybeUninit::<libc::sysinfo>::zeroed();

    // SAFETY: the pointer is valid for writes of one `sysinfo` struct
    let rc = unsafe { libc::sysinfo(info.as_mut_ptr()) };
    if rc != 0 {
        return Err(io::Error::last_os_error());
    }

    // SAFETY: sysinfo(2) filled the struct on success, and it started zeroed
    Ok(unsafe { info.assume_init() })
}
