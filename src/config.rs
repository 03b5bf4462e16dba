//! Report configuration
//!
//! Supports multiple profiles with different settings. Only the
//! `health-report` binary reads configuration; the providers take none.

use std::path::PathBuf;

use config::{Config, ConfigError, Environment, File, Source};
use serde::{Deserialize, Serialize};

/// Output format of the health report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Human-readable table with a summary
    #[default]
    Table,
    /// Overall status plus check groups as JSON
    Json,
}

/// Which providers the report polls
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvidersConfig {
    /// Host uptime (Linux and Windows only)
    #[serde(default = "enabled")]
    pub uptime: bool,
    /// Kernel system information
    #[serde(default = "enabled")]
    pub sysinfo: bool,
}

fn enabled() -> bool {
    true
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            uptime: true,
            sysinfo: true,
        }
    }
}

/// Health report configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportConfig {
    /// The active profile
    pub profile: String,
    /// Output format
    #[serde(default)]
    pub format: ReportFormat,
    /// Enabled providers
    #[serde(default)]
    pub providers: ProvidersConfig,
}

impl ReportConfig {
    /// Loads configuration based on the specified profile
    ///
    /// Sources, later ones overriding earlier ones:
    /// 1. config/{profile}.toml
    /// 2. Environment variables with prefix HEALTH_ (e.g., HEALTH_PROVIDERS__UPTIME=false)
    ///
    /// Config files are searched for next to the executable, then in the
    /// current directory.
    pub fn load(profile: &str) -> Result<Self, ConfigError> {
        let file = match Self::find_config_dir() {
            Some(dir) => File::from(dir.join(profile).as_path()).required(false),
            None => File::with_name(&format!("config/{}", profile)).required(false),
        };

        Self::load_from_sources(profile, file, Self::environment())
    }

    /// Environment source for `HEALTH_` variables
    ///
    /// Use __ as separator for nested fields (e.g., HEALTH_PROVIDERS__SYSINFO)
    fn environment() -> Environment {
        Environment::with_prefix("HEALTH")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true)
    }

    fn load_from_sources<S>(profile: &str, file: S, env: Environment) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        let config = Config::builder()
            .add_source(file)
            .add_source(env)
            .set_override("profile", profile)?
            .build()?;

        config.try_deserialize()
    }

    fn find_config_dir() -> Option<PathBuf> {
        if let Ok(exe_path) = std::env::current_exe()
            && let Some(exe_dir) = exe_path.parent()
        {
            let config_dir = exe_dir.join("config");
            if config_dir.exists() {
                return Some(config_dir);
            }
        }

        let cwd_config = PathBuf::from("config");
        if cwd_config.exists() {
            return Some(cwd_config);
        }

        None
    }

    /// Loads configuration using the HEALTH_PROFILE environment variable,
    /// defaulting to "release"
    pub fn load_from_env() -> Result<Self, ConfigError> {
        let profile = std::env::var("HEALTH_PROFILE").unwrap_or_else(|_| "release".to_string());
        Self::load(&profile)
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self::load("release").unwrap_or_else(|_| Self {
            profile: "release".to_string(),
            format: ReportFormat::Table,
            providers: ProvidersConfig::default(),
        })
    }
}
