use anyhow::Context;
use clap::Parser;
use system_health::config::{ReportConfig, ReportFormat};
use system_health::health::{self, reporter};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Poll the system health providers once and print their checks
#[derive(Debug, Parser)]
#[command(name = "health-report", version)]
struct Cli {
    /// Configuration profile to load (defaults to $HEALTH_PROFILE or "release")
    #[arg(long)]
    profile: Option<String>,

    /// Output format, overriding the configured one
    #[arg(long, value_enum)]
    format: Option<ReportFormat>,

    /// Skip the uptime provider
    #[arg(long)]
    no_uptime: bool,

    /// Skip the sysinfo provider
    #[arg(long)]
    no_sysinfo: bool,
}

impl Cli {
    /// Overlays command-line flags on the loaded configuration
    fn apply(&self, config: &mut ReportConfig) {
        if let Some(format) = self.format {
            config.format = format;
        }
        if self.no_uptime {
            config.providers.uptime = false;
        }
        if self.no_sysinfo {
            config.providers.sysinfo = false;
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.profile {
        Some(profile) => ReportConfig::load(profile),
        None => ReportConfig::load_from_env(),
    }
    .context("failed to load report configuration")?;

    cli.apply(&mut config);
    info!(profile = %config.profile, format = ?config.format, "Running health checks");

    let runner = health::runner_for(&config.providers);
    let (request, ()) = http::Request::new(()).into_parts();
    let report = runner.run(&request);

    let output = reporter::render(&report, config.format).context("failed to render health report")?;
    println!("{output}");

    std::process::exit(report.exit_code());
}

#[cfg(test)]
mod tests {
    use super::*;
    use system_health::config::ProvidersConfig;

    fn configured() -> ReportConfig {
        ReportConfig {
            profile: "ci".to_string(),
            format: ReportFormat::Table,
            providers: ProvidersConfig::default(),
        }
    }

    fn applied(args: &[&str]) -> ReportConfig {
        let cli = Cli::parse_from(std::iter::once("health-report").chain(args.iter().copied()));
        let mut config = configured();
        cli.apply(&mut config);
        config
    }

    #[test]
    fn test_no_flags_keep_config() {
        assert_eq!(applied(&[]), configured());
    }

    #[test]
    fn test_format_flag_overrides_config() {
        assert_eq!(applied(&["--format", "json"]).format, ReportFormat::Json);
    }

    #[test]
    fn test_no_uptime_disables_uptime() {
        let config = applied(&["--no-uptime"]);
        assert!(!config.providers.uptime);
        assert!(config.providers.sysinfo);
    }

    #[test]
    fn test_no_sysinfo_disables_sysinfo() {
        let config = applied(&["--no-sysinfo"]);
        assert!(config.providers.uptime);
        assert!(!config.providers.sysinfo);
    }

    #[test]
    fn test_profile_flag_is_parsed() {
        let cli = Cli::parse_from(["health-report", "--profile", "ci", "--no-uptime", "--no-sysinfo"]);
        assert_eq!(cli.profile.as_deref(), Some("ci"));
        let mut config = configured();
        cli.apply(&mut config);
        assert_eq!(
            config.providers,
            ProvidersConfig {
                uptime: false,
                sysinfo: false,
            }
        );
    }
}
