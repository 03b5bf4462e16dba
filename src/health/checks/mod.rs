//! Built-in health check providers

#[cfg(target_os = "linux")]
mod kernel;
pub mod sysinfo;
#[cfg(any(target_os = "linux", windows))]
pub mod uptime;

pub use sysinfo::SysinfoProvider;
#[cfg(any(target_os = "linux", windows))]
pub use uptime::{UpTimeSource, UptimeError, UptimeProvider};
