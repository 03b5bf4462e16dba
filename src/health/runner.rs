//! Polls registered providers and collects their check groups

use std::time::{Duration, Instant};

use http::request::Parts;
use tracing::{debug, warn};

use super::check::{CheckGroups, CheckStatus, ChecksProvider};

/// Results from polling a set of providers
#[derive(Debug)]
pub struct HealthCheckReport {
    /// Check groups from every provider that authorized the request
    pub groups: CheckGroups,
    /// Polled providers with how long each poll took
    pub polled: Vec<(String, Duration)>,
    /// Providers that refused the request
    pub denied: Vec<String>,
    /// Total number of records
    pub total: usize,
    /// Number of passing records
    pub passed: usize,
    /// Number of records with warnings
    pub warned: usize,
    /// Number of failing records
    pub failed: usize,
}

impl HealthCheckReport {
    /// Returns true if no record failed
    pub fn is_healthy(&self) -> bool {
        self.failed == 0
    }

    /// Returns true if there are any warnings
    pub fn has_warnings(&self) -> bool {
        self.warned > 0
    }

    /// Worst status across all records; an empty report passes
    pub fn status(&self) -> CheckStatus {
        self.groups
            .values()
            .flatten()
            .map(|record| record.status())
            .max()
            .unwrap_or(CheckStatus::Pass)
    }

    /// Returns the appropriate exit code for this report
    /// 0 = all pass, 1 = any fail, 2 = any warn (but no fail)
    pub fn exit_code(&self) -> i32 {
        if self.failed > 0 {
            1
        } else if self.warned > 0 {
            2
        } else {
            0
        }
    }
}

/// Orchestrates polling providers and merging their groups
pub struct HealthCheckRunner {
    providers: Vec<Box<dyn ChecksProvider>>,
}

impl HealthCheckRunner {
    /// Creates a new runner with no providers
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Adds a provider to the runner
    pub fn add_provider<P: ChecksProvider + 'static>(mut self, provider: P) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    /// Number of registered providers
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no provider is registered
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Polls every provider that authorizes `request`
    ///
    /// When two providers report the same group name, the one added later
    /// wins.
    pub fn run(&self, request: &Parts) -> HealthCheckReport {
        let mut groups = CheckGroups::new();
        let mut polled = Vec::new();
        let mut denied = Vec::new();

        for provider in &self.providers {
            let name = provider.name().to_string();

            if !provider.authorize_health(request) {
                debug!(provider = %name, "Provider denied health request");
                denied.push(name);
                continue;
            }

            let start = Instant::now();
            let provided = provider.health_checks();
            let duration = start.elapsed();

            for (group, records) in provided {
                if groups.contains_key(&group) {
                    warn!(provider = %name, %group, "Replacing check group from an earlier provider");
                }
                groups.insert(group, records);
            }

            polled.push((name, duration));
        }

        let mut passed = 0;
        let mut warned = 0;
        let mut failed = 0;
        for record in groups.values().flatten() {
            match record.status() {
                CheckStatus::Pass => passed += 1,
                CheckStatus::Warn => warned += 1,
                CheckStatus::Fail => failed += 1,
            }
        }

        HealthCheckReport {
            total: passed + warned + failed,
            groups,
            polled,
            denied,
            passed,
            warned,
            failed,
        }
    }
}

impl Default for HealthCheckRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::check::{CheckRecord, SYSTEM_COMPONENT};
    use chrono::Utc;
    use http::Request;

    struct Fixed {
        name: &'static str,
        group: &'static str,
        status: CheckStatus,
        allow: bool,
    }

    impl Fixed {
        fn new(name: &'static str, group: &'static str, status: CheckStatus) -> Self {
            Self {
                name,
                group,
                status,
                allow: true,
            }
        }

        fn denying(mut self) -> Self {
            self.allow = false;
            self
        }
    }

    impl ChecksProvider for Fixed {
        fn name(&self) -> &'static str {
            self.name
        }

        fn health_checks(&self) -> CheckGroups {
            let now = Utc::now();
            let record = match self.status {
                CheckStatus::Pass => CheckRecord::observed(SYSTEM_COMPONENT, 1i64, now),
                CheckStatus::Warn => CheckRecord::warn(SYSTEM_COMPONENT, 1i64, now),
                CheckStatus::Fail => CheckRecord::failed(SYSTEM_COMPONENT, "broken", now),
            };
            CheckGroups::from([(self.group.to_string(), vec![record])])
        }

        fn authorize_health(&self, _request: &Parts) -> bool {
            self.allow
        }
    }

    fn request() -> Parts {
        Request::new(()).into_parts().0
    }

    #[test]
    fn test_empty_runner_is_healthy() {
        let report = HealthCheckRunner::new().run(&request());
        assert_eq!(report.total, 0);
        assert!(report.is_healthy());
        assert_eq!(report.status(), CheckStatus::Pass);
        assert_eq!(report.exit_code(), 0);
    }

    #[test]
    fn test_counts_statuses() {
        let runner = HealthCheckRunner::new()
            .add_provider(Fixed::new("a", "a", CheckStatus::Pass))
            .add_provider(Fixed::new("b", "b", CheckStatus::Warn))
            .add_provider(Fixed::new("c", "c", CheckStatus::Fail));
        let report = runner.run(&request());

        assert_eq!(runner.len(), 3);
        assert_eq!(report.total, 3);
        assert_eq!((report.passed, report.warned, report.failed), (1, 1, 1));
        assert_eq!(report.polled.len(), 3);
        assert_eq!(report.status(), CheckStatus::Fail);
        assert_eq!(report.exit_code(), 1);
    }

    #[test]
    fn test_warnings_exit_with_two() {
        let report = HealthCheckRunner::new()
            .add_provider(Fixed::new("a", "a", CheckStatus::Pass))
            .add_provider(Fixed::new("b", "b", CheckStatus::Warn))
            .run(&request());

        assert!(report.is_healthy());
        assert!(report.has_warnings());
        assert_eq!(report.exit_code(), 2);
    }

    #[test]
    fn test_denied_providers_are_skipped() {
        let report = HealthCheckRunner::new()
            .add_provider(Fixed::new("open", "open", CheckStatus::Pass))
            .add_provider(Fixed::new("closed", "closed", CheckStatus::Fail).denying())
            .run(&request());

        assert_eq!(report.denied, vec!["closed".to_string()]);
        assert!(report.groups.contains_key("open"));
        assert!(!report.groups.contains_key("closed"));
        assert!(report.is_healthy());
    }

    #[test]
    fn test_later_provider_wins_group_clash() {
        let report = HealthCheckRunner::new()
            .add_provider(Fixed::new("first", "shared", CheckStatus::Fail))
            .add_provider(Fixed::new("second", "shared", CheckStatus::Pass))
            .run(&request());

        assert_eq!(report.groups.len(), 1);
        assert_eq!(report.groups["shared"][0].status(), CheckStatus::Pass);
        assert_eq!(report.total, 1);
    }
}
