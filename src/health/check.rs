//! Core provider trait and check record types

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, SecondsFormat, Utc};
use http::request::Parts;
use serde::{Serialize, Serializer};

/// Component type reported by the built-in OS-level checks
pub const SYSTEM_COMPONENT: &str = "system";

/// Named check groups returned by a provider, keyed by group name
pub type CheckGroups = BTreeMap<String, Vec<CheckRecord>>;

/// Status of a single health observation
///
/// Variants are ordered by severity, so the worst status of a set of
/// records is their maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Check passed successfully
    Pass,
    /// Check passed with warnings
    Warn,
    /// Check failed
    Fail,
}

impl CheckStatus {
    /// Returns true if the check passed (Pass or Warn)
    pub fn is_ok(&self) -> bool {
        matches!(self, CheckStatus::Pass | CheckStatus::Warn)
    }

    /// Returns true if the check failed
    pub fn is_fail(&self) -> bool {
        matches!(self, CheckStatus::Fail)
    }

    /// Lowercase wire name of the status
    pub fn as_str(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "pass",
            CheckStatus::Warn => "warn",
            CheckStatus::Fail => "fail",
        }
    }

    /// Returns the status as a colored string
    pub fn as_colored_str(&self) -> String {
        use colored::Colorize;
        match self {
            CheckStatus::Pass => "PASS".green().to_string(),
            CheckStatus::Warn => "WARN".yellow().to_string(),
            CheckStatus::Fail => "FAIL".red().to_string(),
        }
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric payload of a check record, serialized as a bare JSON number
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ObservedValue {
    Integer(i64),
    Float(f64),
}

impl From<i64> for ObservedValue {
    fn from(value: i64) -> Self {
        ObservedValue::Integer(value)
    }
}

impl From<u64> for ObservedValue {
    fn from(value: u64) -> Self {
        ObservedValue::Integer(i64::try_from(value).unwrap_or(i64::MAX))
    }
}

impl From<f64> for ObservedValue {
    fn from(value: f64) -> Self {
        ObservedValue::Float(value)
    }
}

impl fmt::Display for ObservedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ObservedValue::Integer(v) => write!(f, "{v}"),
            ObservedValue::Float(v) => write!(f, "{v:.2}"),
        }
    }
}

/// A single health observation
///
/// A record either carries an observed value (Pass or Warn) or an output
/// message (Fail), never both. The constructors are the only way to build
/// one, and nothing mutates a record afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRecord {
    component_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    observed_value: Option<ObservedValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    observed_unit: Option<String>,
    status: CheckStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    output: Option<String>,
    #[serde(serialize_with = "serialize_time")]
    time: DateTime<Utc>,
}

impl CheckRecord {
    /// Creates a passing record carrying an observed value
    pub fn observed(
        component_type: impl Into<String>,
        value: impl Into<ObservedValue>,
        time: DateTime<Utc>,
    ) -> Self {
        Self::with_value(component_type, CheckStatus::Pass, value.into(), time)
    }

    /// Creates a warning record carrying an observed value
    pub fn warn(
        component_type: impl Into<String>,
        value: impl Into<ObservedValue>,
        time: DateTime<Utc>,
    ) -> Self {
        Self::with_value(component_type, CheckStatus::Warn, value.into(), time)
    }

    /// Creates a failing record carrying an output message and no value
    pub fn failed(
        component_type: impl Into<String>,
        output: impl Into<String>,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            component_type: component_type.into(),
            observed_value: None,
            observed_unit: None,
            status: CheckStatus::Fail,
            output: Some(output.into()),
            time,
        }
    }

    fn with_value(
        component_type: impl Into<String>,
        status: CheckStatus,
        value: ObservedValue,
        time: DateTime<Utc>,
    ) -> Self {
        Self {
            component_type: component_type.into(),
            observed_value: Some(value),
            observed_unit: None,
            status,
            output: None,
            time,
        }
    }

    /// Attaches the unit of the observed value; ignored on failed records
    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        if self.observed_value.is_some() {
            self.observed_unit = Some(unit.into());
        }
        self
    }

    /// Kind of component observed, e.g. `"system"`
    pub fn component_type(&self) -> &str {
        &self.component_type
    }

    /// Outcome of the observation
    pub fn status(&self) -> CheckStatus {
        self.status
    }

    /// Observed value; `None` on failed records
    pub fn observed_value(&self) -> Option<ObservedValue> {
        self.observed_value
    }

    /// Unit of the observed value, if any
    pub fn observed_unit(&self) -> Option<&str> {
        self.observed_unit.as_deref()
    }

    /// Failure message; `None` unless the record failed
    pub fn output(&self) -> Option<&str> {
        self.output.as_deref()
    }

    /// When the observation was taken
    pub fn time(&self) -> DateTime<Utc> {
        self.time
    }

    /// Observation time as RFC3339 with nanoseconds, e.g. `2026-10-19T12:00:00.000000001Z`
    pub fn time_rfc3339(&self) -> String {
        format_time(&self.time)
    }
}

fn format_time(time: &DateTime<Utc>) -> String {
    time.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn serialize_time<S: Serializer>(time: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format_time(time))
}

/// Capability a health check plugin exposes to an aggregator
pub trait ChecksProvider: Send + Sync {
    /// Short name used in logs and reports
    fn name(&self) -> &'static str;

    /// Polls the provider, returning its check groups
    fn health_checks(&self) -> CheckGroups;

    /// Decides whether the caller behind `request` may see the checks
    fn authorize_health(&self, request: &Parts) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap() + chrono::Duration::nanoseconds(5)
    }

    #[test]
    fn test_status_ordering_is_by_severity() {
        assert!(CheckStatus::Pass < CheckStatus::Warn);
        assert!(CheckStatus::Warn < CheckStatus::Fail);
        assert!(CheckStatus::Warn.is_ok());
        assert!(CheckStatus::Fail.is_fail());
    }

    #[test]
    fn test_observed_record_serializes_without_output() {
        let record = CheckRecord::observed(SYSTEM_COMPONENT, 123456u64, fixed_time()).with_unit("s");
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "componentType": "system",
                "observedValue": 123456,
                "observedUnit": "s",
                "status": "pass",
                "time": "2026-10-19T12:00:00.000000005Z",
            })
        );
    }

    #[test]
    fn test_failed_record_has_no_value() {
        let record = CheckRecord::failed(SYSTEM_COMPONENT, "permission denied", fixed_time())
            .with_unit("s");

        assert_eq!(record.status(), CheckStatus::Fail);
        assert_eq!(record.output(), Some("permission denied"));
        assert!(record.observed_value().is_none());
        assert!(record.observed_unit().is_none());

        let json = serde_json::to_value(&record).unwrap();
        assert!(json.get("observedValue").is_none());
        assert_eq!(json["output"], "permission denied");
        assert_eq!(json["status"], "fail");
    }

    #[test]
    fn test_float_values_serialize_as_numbers() {
        let record = CheckRecord::warn(SYSTEM_COMPONENT, 0.75, fixed_time());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["observedValue"], 0.75);
        assert_eq!(json["status"], "warn");
    }

    #[test]
    fn test_large_unsigned_values_saturate() {
        assert_eq!(ObservedValue::from(u64::MAX), ObservedValue::Integer(i64::MAX));
    }
}
