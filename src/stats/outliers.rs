//! IQR Outlier Filter
//!
//! Flags values outside Tukey fences:
//! lower = Q1 - 1.5 * IQR, upper = Q3 + 1.5 * IQR
//!
//! Quartiles are taken by position (`sorted[floor(p * n)]`) without
//! interpolation, matching the numbers shown on the analyzer dashboard.

use serde::{Deserialize, Serialize};

/// Fence multiplier applied to the IQR
const IQR_MULTIPLIER: f64 = 1.5;

/// Quartiles and fences computed for a set of values
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IqrBounds {
    pub q1: f64,
    pub q3: f64,
    pub iqr: f64,
    pub lower: f64,
    pub upper: f64,
}

impl IqrBounds {
    /// Check if a value falls outside the fences
    pub fn is_outlier(&self, value: f64) -> bool {
        value < self.lower || value > self.upper
    }
}

/// Compute quartiles and fences, `None` for empty input
pub fn iqr_bounds(values: &[f64]) -> Option<IqrBounds> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let q1 = sorted[(0.25 * n).floor() as usize];
    let q3 = sorted[(0.75 * n).floor() as usize];
    let iqr = q3 - q1;

    Some(IqrBounds {
        q1,
        q3,
        iqr,
        lower: q1 - IQR_MULTIPLIER * iqr,
        upper: q3 + IQR_MULTIPLIER * iqr,
    })
}

/// Flag each value as outlier (`true`) or not, preserving input order
pub fn detect_outliers(values: &[f64]) -> Vec<bool> {
    match iqr_bounds(values) {
        Some(bounds) => values.iter().map(|&v| bounds.is_outlier(v)).collect(),
        None => Vec::new(),
    }
}
