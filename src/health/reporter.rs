//! Formatting and reporting for health check results

use colored::Colorize;
use serde::Serialize;
use tabled::{
    builder::Builder,
    settings::{Alignment, Modify, Style, object::Rows},
};

use super::check::{CheckGroups, CheckRecord, CheckStatus};
use super::runner::HealthCheckReport;
use crate::config::ReportFormat;

/// JSON body of a report: overall status plus the merged groups
#[derive(Serialize)]
struct JsonReport<'a> {
    status: CheckStatus,
    checks: &'a CheckGroups,
}

/// Renders a report in the requested format
pub fn render(report: &HealthCheckReport, format: ReportFormat) -> serde_json::Result<String> {
    match format {
        ReportFormat::Table => Ok(format_report(report)),
        ReportFormat::Json => format_json(report),
    }
}

/// Formats a report as pretty-printed JSON
pub fn format_json(report: &HealthCheckReport) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&JsonReport {
        status: report.status(),
        checks: &report.groups,
    })
}

/// Formats a health check report as a pretty table
pub fn format_report(report: &HealthCheckReport) -> String {
    let mut builder = Builder::default();

    builder.push_record(["Group", "Status", "Value", "Time", "Output"]);

    for (group, records) in &report.groups {
        for record in records {
            builder.push_record([
                group.as_str(),
                &record.status().as_colored_str(),
                &value_cell(record),
                &record.time_rfc3339(),
                record.output().unwrap_or(""),
            ]);
        }
    }

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::first()).with(Alignment::center()));

    let mut output = String::new();
    output.push_str(&table.to_string());
    output.push('\n');

    output.push_str(&format_summary(report));

    output
}

fn value_cell(record: &CheckRecord) -> String {
    match (record.observed_value(), record.observed_unit()) {
        (Some(value), Some(unit)) => format!("{value} {unit}"),
        (Some(value), None) => value.to_string(),
        (None, _) => String::new(),
    }
}

/// Formats the summary section of the report
fn format_summary(report: &HealthCheckReport) -> String {
    let mut summary = String::new();

    summary.push_str(&format!("\n{}\n", "Summary".bold().underline()));
    let polled: Vec<String> = report
        .polled
        .iter()
        .map(|(name, duration)| format!("{name} ({duration:.2?})"))
        .collect();
    summary.push_str(&format!("  Providers polled: {}\n", polled.join(", ")));
    if !report.denied.is_empty() {
        summary.push_str(&format!("  Providers denied: {}\n", report.denied.join(", ")));
    }
    summary.push_str(&format!("  Total checks: {}\n", report.total));
    summary.push_str(&format!("  {} Passed: {}\n", "✓".green(), report.passed));

    if report.warned > 0 {
        summary.push_str(&format!("  {} Warned: {}\n", "⚠".yellow(), report.warned));
    }

    if report.failed > 0 {
        summary.push_str(&format!("  {} Failed: {}\n", "✗".red(), report.failed));
    }

    summary.push('\n');
    if report.is_healthy() {
        if report.has_warnings() {
            summary.push_str(&format!(
                "  {}\n",
                "Overall: HEALTHY (with warnings)".yellow().bold()
            ));
        } else {
            summary.push_str(&format!("  {}\n", "Overall: HEALTHY".green().bold()));
        }
    } else {
        summary.push_str(&format!("  {}\n", "Overall: UNHEALTHY".red().bold()));
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::health::check::{ChecksProvider, SYSTEM_COMPONENT};
    use crate::health::runner::HealthCheckRunner;
    use chrono::{TimeZone, Utc};
    use http::request::Parts;

    struct Scripted(Vec<CheckRecord>);

    impl ChecksProvider for Scripted {
        fn name(&self) -> &'static str {
            "scripted"
        }

        fn health_checks(&self) -> CheckGroups {
            CheckGroups::from([("scripted".to_string(), self.0.clone())])
        }

        fn authorize_health(&self, _request: &Parts) -> bool {
            true
        }
    }

    fn report(records: Vec<CheckRecord>) -> HealthCheckReport {
        let (request, ()) = http::Request::new(()).into_parts();
        HealthCheckRunner::new()
            .add_provider(Scripted(records))
            .run(&request)
    }

    fn at_noon() -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_json_report_shape() {
        let report = report(vec![
            CheckRecord::observed(SYSTEM_COMPONENT, 42u64, at_noon()).with_unit("s"),
        ]);
        let json: serde_json::Value = serde_json::from_str(&format_json(&report).unwrap()).unwrap();

        assert_eq!(json["status"], "pass");
        assert_eq!(json["checks"]["scripted"][0]["observedValue"], 42);
        assert_eq!(json["checks"]["scripted"][0]["observedUnit"], "s");
        assert_eq!(
            json["checks"]["scripted"][0]["time"],
            "2026-10-19T12:00:00.000000000Z"
        );
    }

    #[test]
    fn test_json_status_is_worst_record() {
        let report = report(vec![
            CheckRecord::observed(SYSTEM_COMPONENT, 1u64, at_noon()),
            CheckRecord::failed(SYSTEM_COMPONENT, "counter unreadable", at_noon()),
        ]);
        let json: serde_json::Value =
            serde_json::from_str(&render(&report, ReportFormat::Json).unwrap()).unwrap();

        assert_eq!(json["status"], "fail");
        assert_eq!(json["checks"]["scripted"][1]["output"], "counter unreadable");
    }

    #[test]
    fn test_table_lists_records_and_summary() {
        colored::control::set_override(false);
        let report = report(vec![
            CheckRecord::observed(SYSTEM_COMPONENT, 42u64, at_noon()).with_unit("s"),
            CheckRecord::failed(SYSTEM_COMPONENT, "counter unreadable", at_noon()),
        ]);
        let table = render(&report, ReportFormat::Table).unwrap();

        assert!(table.contains("42 s"), "{table}");
        assert!(table.contains("counter unreadable"), "{table}");
        assert!(table.contains("Total checks: 2"), "{table}");
        assert!(table.contains("Overall: UNHEALTHY"), "{table}");
    }
}
