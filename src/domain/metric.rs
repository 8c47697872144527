//! Per-variation metric row and the outlier policy applied to it

use serde::{Deserialize, Serialize};

use crate::stats::outliers::detect_outliers;

/// One row of the analyzer's metric table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationMetric {
    pub variation: String,
    /// Metric value (average order value for revenue)
    pub value: f64,
    /// Uplift vs control, in percent
    pub uplift: f64,
    /// Confidence, 0-100
    pub confidence: f64,
    #[serde(default)]
    pub is_outlier: bool,
}

impl VariationMetric {
    pub fn new(variation: impl Into<String>, value: f64, uplift: f64, confidence: f64) -> Self {
        Self {
            variation: variation.into(),
            value,
            uplift,
            confidence,
            is_outlier: false,
        }
    }
}

/// Flag metric values outside the IQR fences and zero their uplift and
/// confidence. Returns the number of flagged rows.
pub fn apply_outlier_policy(metrics: &mut [VariationMetric]) -> usize {
    let values: Vec<f64> = metrics.iter().map(|m| m.value).collect();
    let flags = detect_outliers(&values);

    let mut flagged = 0;
    for (metric, is_outlier) in metrics.iter_mut().zip(flags) {
        metric.is_outlier = is_outlier;
        if is_outlier {
            metric.uplift = 0.0;
            metric.confidence = 0.0;
            flagged += 1;
        }
    }
    flagged
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_resets_flagged_rows() {
        let mut metrics = vec![
            VariationMetric::new("A", 50.0, 2.0, 60.0),
            VariationMetric::new("B", 52.0, 4.0, 70.0),
            VariationMetric::new("C", 51.0, 3.0, 65.0),
            VariationMetric::new("D", 49.0, -1.0, 40.0),
            VariationMetric::new("E", 250.0, 400.0, 99.9),
        ];

        let flagged = apply_outlier_policy(&mut metrics);

        assert_eq!(flagged, 1);
        assert!(metrics[4].is_outlier);
        assert_eq!(metrics[4].uplift, 0.0);
        assert_eq!(metrics[4].confidence, 0.0);
        assert_eq!(metrics[4].value, 250.0);

        assert!(!metrics[1].is_outlier);
        assert_eq!(metrics[1].uplift, 4.0);
        assert_eq!(metrics[1].confidence, 70.0);
    }

    #[test]
    fn test_policy_on_empty_and_single() {
        let mut empty: Vec<VariationMetric> = Vec::new();
        assert_eq!(apply_outlier_policy(&mut empty), 0);

        let mut single = vec![VariationMetric::new("B", 10.0, 5.0, 90.0)];
        assert_eq!(apply_outlier_policy(&mut single), 0);
        assert_eq!(single[0].confidence, 90.0);
    }
}
