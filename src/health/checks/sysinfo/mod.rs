//! System information health checks
//!
//! On Linux the provider reports figures from `sysinfo(2)`: load averages,
//! RAM, swap and process count. On other platforms it reports no groups.

#[cfg(target_os = "linux")]
mod linux;
#[cfg(any(not(target_os = "linux"), test))]
mod stub;

#[cfg(target_os = "linux")]
pub use linux::SysinfoProvider;
#[cfg(not(target_os = "linux"))]
pub use stub::SysinfoProvider;

/// Returns a provider of system information checks for this platform
pub fn health() -> SysinfoProvider {
    SysinfoProvider::new()
}
