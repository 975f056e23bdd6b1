use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::stamp::{TimeFormat, WriterConfig};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub stamp: StampConfig,

    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Defaults for the timestamp flags; command-line flags take precedence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StampConfig {
    #[serde(default = "default_format")]
    pub format: String,

    #[serde(default)]
    pub utc: bool,

    #[serde(default)]
    pub millis: bool,

    #[serde(default)]
    pub tabs: bool,
}

fn default_format() -> String {
    TimeFormat::Default.as_str().to_string()
}

impl Default for StampConfig {
    fn default() -> Self {
        Self {
            format: default_format(),
            utc: false,
            millis: false,
            tabs: false,
        }
    }
}

impl StampConfig {
    pub fn time_format(&self) -> Result<TimeFormat, ConfigError> {
        self.format.parse()
    }

    pub fn resolve(&self) -> Result<WriterConfig, ConfigError> {
        Ok(WriterConfig::new(
            self.time_format()?,
            self.utc,
            self.millis,
            self.tabs,
        ))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// EnvFilter string, e.g. "warn" or "tstamp_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// If true, also log to a file under `directory` (or OS temp dir if unset).
    #[serde(default)]
    pub file: bool,

    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_level() -> String {
    "warn".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            level: default_logging_level(),
            file: false,
            directory: None,
        }
    }
}
