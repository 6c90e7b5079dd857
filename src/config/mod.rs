//! Configuration loading and management

use crate::core::ConfigError;
use crate::document::PathOptions;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

fn default_true() -> bool {
    true
}

fn default_log_filter() -> String {
    "info".to_string()
}

fn default_graphql_path() -> String {
    "/graphql".to_string()
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// `tracing` filter directive used when `RUST_LOG` is not set
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

/// HTTP exposure configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Path of the GraphQL endpoint
    #[serde(default = "default_graphql_path")]
    pub graphql_path: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            graphql_path: default_graphql_path(),
        }
    }
}

/// Complete executor configuration
///
/// Every section is optional; an empty document yields the defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutorConfig {
    /// Debug-log the GraphQL errors of failed requests
    #[serde(default = "default_true")]
    pub log_query_errors: bool,

    /// Path evaluation options for extraction and documents
    #[serde(default)]
    pub paths: PathOptions,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub http: HttpConfig,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            log_query_errors: true,
            paths: PathOptions::default(),
            logging: LoggingConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl ExecutorConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::FileNotFound {
                path: path.to_string(),
            },
            _ => ConfigError::ParseError {
                file: Some(path.to_string()),
                message: e.to_string(),
            },
        })?;
        Self::parse(&content, Some(path))
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Self::parse(yaml, None)
    }

    fn parse(yaml: &str, file: Option<&str>) -> Result<Self, ConfigError> {
        // serde_yaml reads an empty document as unit, not as an empty mapping
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| ConfigError::ParseError {
            file: file.map(str::to_string),
            message: e.to_string(),
        })
    }

    /// Install a global `tracing` subscriber
    ///
    /// `RUST_LOG` takes precedence over `logging.filter`. Returns `false`
    /// when a subscriber was already installed.
    pub fn init_tracing(&self) -> bool {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(&self.logging.filter))
            .unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ExecutorConfig::default();

        assert!(config.log_query_errors);
        assert!(!config.paths.default_leaf_to_null);
        assert_eq!(config.logging.filter, "info");
        assert_eq!(config.http.graphql_path, "/graphql");
    }

    #[test]
    fn test_yaml_serialization() {
        let config = ExecutorConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();

        // Should be able to parse it back
        let parsed = ExecutorConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(
            ExecutorConfig::from_yaml_str("").unwrap(),
            ExecutorConfig::default()
        );
    }
}
