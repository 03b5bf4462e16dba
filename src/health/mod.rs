//! Health check providers for OS-level system status
//!
//! Each provider answers two questions when polled: what its checks
//! currently report, and whether a given caller may see them. Providers
//! are plain synchronous values; polling one reads an OS counter once and
//! builds fresh records.
//!
//! # Example
//!
//! ```no_run
//! use system_health::health::{HealthCheckRunner, checks::sysinfo};
//!
//! let (request, ()) = http::Request::new(()).into_parts();
//! let report = HealthCheckRunner::new()
//!     .add_provider(sysinfo::health())
//!     .run(&request);
//!
//! if report.is_healthy() {
//!     println!("All systems operational!");
//! }
//! ```

pub mod check;
pub mod checks;
pub mod reporter;
pub mod runner;

pub use check::{CheckGroups, CheckRecord, CheckStatus, ChecksProvider, ObservedValue};
pub use reporter::{format_json, format_report, render};
pub use runner::{HealthCheckReport, HealthCheckRunner};

use tracing::warn;

use crate::config::ProvidersConfig;

/// Builds a runner over the providers enabled in `providers`
///
/// The uptime provider only exists on Linux and Windows; elsewhere enabling
/// it is logged and ignored.
pub fn runner_for(providers: &ProvidersConfig) -> HealthCheckRunner {
    let mut runner = HealthCheckRunner::new();

    if providers.uptime {
        #[cfg(any(target_os = "linux", windows))]
        {
            runner = runner.add_provider(checks::uptime::system());
        }
        #[cfg(not(any(target_os = "linux", windows)))]
        warn!("Uptime provider is not available on this platform");
    }

    if providers.sysinfo {
        runner = runner.add_provider(checks::sysinfo::health());
    }

    if runner.is_empty() {
        warn!("No health check providers enabled");
    }

    runner
}

/// Polls every provider available on this platform with an anonymous request
pub fn run_all_checks() -> HealthCheckReport {
    let (request, ()) = http::Request::new(()).into_parts();
    runner_for(&ProvidersConfig::default()).run(&request)
}
