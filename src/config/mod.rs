pub mod cli;
pub mod toml_config;

use crate::app::OutputFormat;
use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, validate_positive_number, validate_url, Validate};
use std::collections::HashMap;
use std::time::Duration;
use toml_config::TomlConfig;

#[cfg(feature = "cli")]
use clap::Parser;

pub const DEFAULT_API_ENDPOINT: &str = "https://jsonplaceholder.typicode.com/users";

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "users-fetch")]
#[command(about = "Fetch a bounded list of users from a REST API and render it")]
pub struct CliConfig {
    #[arg(long, help = "Users endpoint (overrides the config file)")]
    pub api_endpoint: Option<String>,

    #[arg(long, help = "Number of users to list; absent or 0 means 10")]
    pub limit: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    #[arg(long, help = "Write the listing to this file instead of stdout")]
    pub output: Option<String>,

    #[arg(long, help = "TOML configuration file")]
    pub config: Option<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Merges the optional config file with the flags; flags win.
    pub fn resolve(&self) -> Result<AppConfig> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::debug!("Loading configuration from {}", path);
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                AppConfig::from(file)
            }
            None => AppConfig::default(),
        };

        if let Some(endpoint) = &self.api_endpoint {
            config.api_endpoint = endpoint.clone();
        }
        if let Some(timeout) = self.timeout_seconds {
            config.timeout_seconds = Some(timeout);
        }
        if let Some(format) = self.format {
            config.format = format;
        }
        if let Some(output) = &self.output {
            config.output_path = Some(output.clone());
        }

        Ok(config)
    }
}

/// Effective settings after merging file and flags.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub api_endpoint: String,
    pub timeout_seconds: Option<u64>,
    pub headers: HashMap<String, String>,
    pub format: OutputFormat,
    pub output_path: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_endpoint: DEFAULT_API_ENDPOINT.to_string(),
            timeout_seconds: None,
            headers: HashMap::new(),
            format: OutputFormat::default(),
            output_path: None,
        }
    }
}

impl From<TomlConfig> for AppConfig {
    fn from(file: TomlConfig) -> Self {
        let format = file.output_format().unwrap_or_default();
        let output_path = file.output_path().map(str::to_string);
        Self {
            api_endpoint: file.source.endpoint,
            timeout_seconds: file.source.timeout_seconds,
            headers: file.source.headers,
            format,
            output_path,
        }
    }
}

impl ConfigProvider for AppConfig {
    fn api_endpoint(&self) -> &str {
        &self.api_endpoint
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout_seconds.map(Duration::from_secs)
    }

    fn headers(&self) -> &HashMap<String, String> {
        &self.headers
    }
}

impl Validate for AppConfig {
    fn validate(&self) -> Result<()> {
        validate_url("api_endpoint", &self.api_endpoint)?;
        if let Some(timeout) = self.timeout_seconds {
            validate_positive_number("timeout_seconds", timeout, 1)?;
        }
        if let Some(path) = &self.output_path {
            validate_path("output", path)?;
        }
        Ok(())
    }
}
