//! Host uptime health check
//!
//! The provider reports a single `"uptime"` group holding one record: the
//! number of whole seconds since the host booted, or a failure carrying the
//! OS error when the counter cannot be read. Uptime is host uptime, so it
//! does not reset when the process restarts.
//!
//! Exactly one [`PlatformUpTime`] is compiled in per target. On platforms
//! other than Linux and Windows this module is absent.

#[cfg(target_os = "linux")]
mod linux;
#[cfg(any(windows, test))]
mod tick_count;
#[cfg(windows)]
mod windows;

#[cfg(target_os = "linux")]
pub use linux::PlatformUpTime;
#[cfg(windows)]
pub use windows::PlatformUpTime;

use std::io;

use chrono::Utc;
use http::request::Parts;
use thiserror::Error;
use tracing::{debug, warn};

use crate::health::check::{CheckGroups, CheckRecord, ChecksProvider, SYSTEM_COMPONENT};

/// Name of the check group the provider reports under
pub const GROUP: &str = "uptime";

/// Unit of the observed uptime value
pub const UNIT: &str = "s";

/// Failure to read the host uptime counter
#[derive(Debug, Error)]
pub enum UptimeError {
    #[error(transparent)]
    Os(#[from] io::Error),

    #[error("kernel reported negative uptime: {0}")]
    Negative(i64),

    #[error("uptime counter unavailable: {0}")]
    Unavailable(&'static str),
}

/// Source of host uptime in whole seconds
pub trait UpTimeSource: Send + Sync {
    fn up_time(&self) -> Result<u64, UptimeError>;
}

impl<F> UpTimeSource for F
where
    F: Fn() -> Result<u64, UptimeError> + Send + Sync,
{
    fn up_time(&self) -> Result<u64, UptimeError> {
        self()
    }
}

/// Reports host uptime as the `"uptime"` check group
pub struct UptimeProvider<S = PlatformUpTime> {
    source: S,
}

impl UptimeProvider {
    /// Creates a provider reading the platform uptime counter
    pub fn new() -> Self {
        Self::with_source(PlatformUpTime)
    }
}

impl Default for UptimeProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: UpTimeSource> UptimeProvider<S> {
    /// Creates a provider over a custom uptime source
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    fn record(&self) -> CheckRecord {
        let result = self.source.up_time();
        let now = Utc::now();

        match result {
            Ok(seconds) => {
                debug!(seconds, "Read host uptime");
                CheckRecord::observed(SYSTEM_COMPONENT, seconds, now).with_unit(UNIT)
            }
            Err(e) => {
                warn!(error = %e, "Failed to read host uptime");
                CheckRecord::failed(SYSTEM_COMPONENT, e.to_string(), now)
            }
        }
    }
}

impl<S: UpTimeSource> ChecksProvider for UptimeProvider<S> {
    fn name(&self) -> &'static str {
        "uptime"
    }

    fn health_checks(&self) -> CheckGroups {
        CheckGroups::from([(GROUP.to_string(), vec![self.record()])])
    }

    /// Grants every caller access. Uptime carries nothing sensitive; wrap the
    /// provider when a deployment needs an access policy.
    fn authorize_health(&self, _request: &Parts) -> bool {
        true
    }
}

/// Returns a provider for health checks about the system uptime
pub fn system() -> UptimeProvider {
    UptimeProvider::new()
}
