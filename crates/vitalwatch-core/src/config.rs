//! Configuration management for VitalWatch

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Environment variable prefix, e.g. `VITALWATCH__LOGGING__LEVEL=debug`
pub const ENV_PREFIX: &str = "VITALWATCH";

/// Main configuration struct
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Ingestion configuration
    pub ingest: IngestConfig,

    /// Alerting configuration
    pub alerting: AlertingConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from defaults, an optional TOML file and the environment.
    ///
    /// Later sources override earlier ones. A `.env` file in the working
    /// directory is honoured when present.
    pub fn load(path: Option<&str>) -> Result<Self> {
        let _ = dotenvy::dotenv();

        let mut builder = config::Config::builder();
        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        let config = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }
}

/// Ingestion configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Default source: a log file/directory path or a `host:port` address
    pub source: Option<String>,
    /// Timeout for establishing a producer connection, in milliseconds
    pub connect_timeout_ms: u64,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            source: None,
            connect_timeout_ms: 5000,
        }
    }
}

/// Alerting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AlertingConfig {
    /// How often `listen` mode re-evaluates every patient, in seconds
    pub evaluation_interval_seconds: u64,
}

impl Default for AlertingConfig {
    fn default() -> Self {
        Self {
            evaluation_interval_seconds: 10,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level
    pub level: String,
    /// Log format (json or pretty)
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.ingest.connect_timeout_ms, 5000);
        assert_eq!(config.alerting.evaluation_interval_seconds, 10);
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_load_partial_file_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[logging]\nformat = \"json\"\n\n[alerting]\nevaluation_interval_seconds = 3"
        )
        .unwrap();

        let config = Config::load(file.path().to_str()).unwrap();

        assert_eq!(config.logging.format, "json");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.alerting.evaluation_interval_seconds, 3);
        assert_eq!(config.ingest.connect_timeout_ms, 5000);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = Config::load(Some("/nonexistent/vitalwatch.toml"));
        assert!(matches!(result, Err(crate::Error::Config(_))));
    }
}
