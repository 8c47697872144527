//! Configuration Loader
//!
//! Loads and validates analyzer configuration from TOML files.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

/// Log levels accepted in `[logging] level`
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Main configuration structure matching analyzer.toml
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub analysis: AnalysisSection,
    pub ranges: RangesSection,
    pub logging: LoggingSection,
    #[serde(default)]
    pub filter: FilterSection,
}

/// Analysis configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSection {
    /// Variation treated as baseline
    pub control_variation: String,
    /// Bootstrap rounds per variation
    pub iterations: usize,
    /// Confidence level for bootstrap intervals (0.95 = 95%)
    pub confidence_level: f64,
    /// Fixed seed for reproducible output
    #[serde(default)]
    pub seed: Option<u64>,
}

/// Revenue range table section
#[derive(Debug, Clone, Deserialize)]
pub struct RangesSection {
    /// Number of contiguous revenue ranges
    pub revenue_bucket_count: usize,
}

/// Logging configuration section
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSection {
    /// Log level: "trace", "debug", "info", "warn", "error"
    pub level: String,
}

/// Default dashboard filter (optional)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FilterSection {
    #[serde(default)]
    pub device_category: Option<String>,
    #[serde(default)]
    pub item_category2: Option<String>,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parse and validate configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    config.validate()?;
    Ok(config)
}

impl Config {
    /// Validate all configuration parameters
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.analysis.control_variation.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "control_variation cannot be empty".to_string(),
            ));
        }

        if self.analysis.iterations == 0 {
            return Err(ConfigError::ValidationError(format!(
                "iterations must be > 0, got {}",
                self.analysis.iterations
            )));
        }

        if self.analysis.confidence_level <= 0.0 || self.analysis.confidence_level >= 1.0 {
            return Err(ConfigError::ValidationError(format!(
                "confidence_level must be between 0 and 1, got {}",
                self.analysis.confidence_level
            )));
        }

        if self.ranges.revenue_bucket_count == 0 {
            return Err(ConfigError::ValidationError(format!(
                "revenue_bucket_count must be > 0, got {}",
                self.ranges.revenue_bucket_count
            )));
        }

        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::ValidationError(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }

        Ok(())
    }
}

// Conversion from Config to AnalysisConfig
impl From<&Config> for crate::application::params::AnalysisConfig {
    fn from(config: &Config) -> Self {
        use crate::application::params::AnalysisConfig;
        use crate::domain::transaction::TransactionFilter;
        use crate::stats::bootstrap::BootstrapConfig;

        AnalysisConfig {
            control_variation: config.analysis.control_variation.clone(),
            bootstrap: BootstrapConfig {
                iterations: config.analysis.iterations,
                confidence_level: config.analysis.confidence_level,
            },
            seed: config.analysis.seed,
            revenue_bucket_count: config.ranges.revenue_bucket_count,
            filter: TransactionFilter {
                device_category: config.filter.device_category.clone(),
                item_category2: config.filter.item_category2.clone(),
            },
        }
    }
}
