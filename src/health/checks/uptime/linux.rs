use super::{UpTimeSource, UptimeError};
use crate::health::checks::kernel;

/// Uptime from the `uptime` field of `sysinfo(2)`
#[derive(Debug, Clone, Copy, Default)]
pub struct PlatformUpTime;

impl UpTimeSource for PlatformUpTime {
    fn up_time(&self) -> Result<u64, UptimeError> {
        let info = kernel::sysinfo()?;
        seconds(i64::from(info.uptime))
    }
}

fn seconds(raw: i64) -> Result<u64, UptimeError> {
    u64::try_from(raw).map_err(|_| UptimeError::Negative(raw))
}
