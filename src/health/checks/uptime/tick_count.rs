//! Selection between the 64-bit and 32-bit kernel tick counters

use std::time::Duration;

use super::UptimeError;

pub(crate) type TickCount64 = unsafe extern "system" fn() -> u64;
pub(crate) type TickCount32 = unsafe extern "system" fn() -> u32;

/// Resolved tick-count entry points, preferring `GetTickCount64`
#[derive(Debug, Clone, Copy)]
pub(crate) struct TickCounter {
    tick64: Option<TickCount64>,
    tick32: Option<TickCount32>,
}

impl TickCounter {
    /// # Safety
    ///
    /// Each pointer must be a zero-argument function that is safe to call
    /// at any time for the rest of the process lifetime.
    pub(crate) unsafe fn new(tick64: Option<TickCount64>, tick32: Option<TickCount32>) -> Self {
        Self { tick64, tick32 }
    }

    /// Milliseconds since boot
    ///
    /// The 32-bit counter wraps to zero after 49.7 days of uptime.
    pub(crate) fn millis(&self) -> Result<u64, UptimeError> {
        if let Some(tick64) = self.tick64 {
            // SAFETY: upheld by `new`
            return Ok(unsafe { tick64() });
        }
        if let Some(tick32) = self.tick32 {
            // SAFETY: upheld by `new`
            return Ok(u64::from(unsafe { tick32() }));
        }
        Err(UptimeError::Unavailable(
            "neither GetTickCount64 nor GetTickCount is exported by kernel32.dll",
        ))
    }

    /// Whole seconds since boot, sub-second precision dropped
    pub(crate) fn seconds(&self) -> Result<u64, UptimeError> {
        Ok(Duration::from_millis(self.millis()?).as_secs())
    }
}
