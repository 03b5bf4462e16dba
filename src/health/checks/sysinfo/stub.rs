use http::request::Parts;

use crate::health::check::{CheckGroups, ChecksProvider};

/// System information provider for platforms without a kernel counter
/// implementation; it reports no check groups
#[derive(Debug, Clone, Copy, Default)]
pub struct SysinfoProvider;

impl SysinfoProvider {
    pub fn new() -> Self {
        Self
    }
}

impl ChecksProvider for SysinfoProvider {
    fn name(&self) -> &'static str {
        "sysinfo"
    }

    fn health_checks(&self) -> CheckGroups {
        CheckGroups::new()
    }

    /// Grants every caller access
    fn authorize_health(&self, _request: &Parts) -> bool {
        true
    }
}
