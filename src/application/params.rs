//! Analysis Parameters
//!
//! Runtime configuration for one analyzer run.
//! Defaults mirror the dashboard: 1000 bootstrap rounds at 95% confidence.

use serde::{Deserialize, Serialize};

use crate::domain::transaction::TransactionFilter;
use crate::stats::bootstrap::BootstrapConfig;

/// Main analysis configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Variation name treated as the baseline
    pub control_variation: String,
    /// Bootstrap resampling settings
    pub bootstrap: BootstrapConfig,
    /// Fixed seed for reproducible bootstrap output
    pub seed: Option<u64>,
    /// Number of revenue ranges in the breakdown table
    pub revenue_bucket_count: usize,
    /// Device / category filter applied before analysis
    pub filter: TransactionFilter,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            control_variation: "control".to_string(),
            bootstrap: BootstrapConfig::default(),
            seed: None,
            revenue_bucket_count: 10,
            filter: TransactionFilter::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn with_control(mut self, name: impl Into<String>) -> Self {
        self.control_variation = name.into();
        self
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.bootstrap.iterations = iterations;
        self
    }

    pub fn with_confidence_level(mut self, level: f64) -> Self {
        self.bootstrap.confidence_level = level;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_bucket_count(mut self, count: usize) -> Self {
        self.revenue_bucket_count = count;
        self
    }

    pub fn with_filter(mut self, filter: TransactionFilter) -> Self {
        self.filter = filter;
        self
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> Result<(), ParamsError> {
        if self.control_variation.trim().is_empty() {
            return Err(ParamsError::EmptyControl);
        }
        if self.bootstrap.iterations == 0 {
            return Err(ParamsError::InvalidIterations(self.bootstrap.iterations));
        }
        if !(self.bootstrap.confidence_level > 0.0 && self.bootstrap.confidence_level < 1.0) {
            return Err(ParamsError::InvalidConfidenceLevel(
                self.bootstrap.confidence_level,
            ));
        }
        if self.revenue_bucket_count == 0 {
            return Err(ParamsError::InvalidBucketCount(self.revenue_bucket_count));
        }
        Ok(())
    }
}

/// Parameter validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamsError {
    #[error("Control variation name cannot be empty")]
    EmptyControl,
    #[error("Invalid iterations: {0} (must be > 0)")]
    InvalidIterations(usize),
    #[error("Invalid confidence level: {0} (must be 0 < level < 1)")]
    InvalidConfidenceLevel(f64),
    #[error("Invalid revenue bucket count: {0} (must be > 0)")]
    InvalidBucketCount(usize),
}
