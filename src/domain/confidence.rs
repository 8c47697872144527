//! Confidence display model
//!
//! What the analyzer shows next to each variation: a 0-100 value, a
//! labelled tier, and the raw counts behind it for both groups.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Confidence at or above this is reported as significant
pub const SIGNIFICANT_THRESHOLD: f64 = 95.0;
/// Confidence at or above this (and below significant) is trending
pub const TRENDING_THRESHOLD: f64 = 80.0;

/// Significance tier of a confidence value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceTier {
    Significant,
    Trending,
    Inconclusive,
}

impl ConfidenceTier {
    pub fn from_value(value: f64) -> Self {
        if value >= SIGNIFICANT_THRESHOLD {
            ConfidenceTier::Significant
        } else if value >= TRENDING_THRESHOLD {
            ConfidenceTier::Trending
        } else {
            ConfidenceTier::Inconclusive
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ConfidenceTier::Significant => "High",
            ConfidenceTier::Trending => "Medium",
            ConfidenceTier::Inconclusive => "Low",
        }
    }
}

/// Label + tier pair rendered as a badge
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfidenceLevel {
    pub label: String,
    pub tier: ConfidenceTier,
}

impl ConfidenceLevel {
    pub fn from_value(value: f64) -> Self {
        let tier = ConfidenceTier::from_value(value);
        Self {
            label: tier.label().to_string(),
            tier,
        }
    }
}

/// Unit of a metric's rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MetricUnit {
    Currency,
}

/// Raw numbers behind a confidence value for one group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricDetail {
    /// Number of observations (transactions)
    pub count: u64,
    /// Aggregate of the metric, rounded to whole units
    pub total: i64,
    /// total / count in `unit`
    pub rate: f64,
    pub unit: MetricUnit,
}

impl MetricDetail {
    /// Detail for a set of revenue values; rate is the average order value
    pub fn from_revenue(values: &[f64]) -> Self {
        let sum: f64 = values.iter().sum();
        let rate = if values.is_empty() {
            0.0
        } else {
            sum / values.len() as f64
        };
        Self {
            count: values.len() as u64,
            total: sum.round() as i64,
            rate,
            unit: MetricUnit::Currency,
        }
    }
}

impl fmt::Display for MetricDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.unit {
            MetricUnit::Currency => write!(
                f,
                "{} orders, {} total, {:.2} avg",
                self.count, self.total, self.rate
            ),
        }
    }
}

/// Details for both sides of a comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceDetails {
    pub variation: MetricDetail,
    pub control: MetricDetail,
}

/// Confidence of a variation vs control comparison
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConfidenceResult {
    /// 0-100
    pub value: f64,
    pub level: ConfidenceLevel,
    pub details: ConfidenceDetails,
}

impl ConfidenceResult {
    pub fn new(value: f64, variation: MetricDetail, control: MetricDetail) -> Self {
        let value = if value.is_finite() {
            value.clamp(0.0, 100.0)
        } else {
            0.0
        };
        Self {
            value,
            level: ConfidenceLevel::from_value(value),
            details: ConfidenceDetails { variation, control },
        }
    }

    pub fn is_significant(&self) -> bool {
        self.level.tier == ConfidenceTier::Significant
    }
}
