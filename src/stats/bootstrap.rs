//! Bootstrap Uplift
//!
//! Resamples control and variation revenue with replacement to build an
//! empirical distribution of percentage uplift:
//!
//! uplift = (mean(variation) - mean(control)) / mean(control) * 100
//!
//! The sorted bootstrap diffs give a percentile confidence interval, a
//! 30-bucket histogram anchored at the CI lower bound, and a one-sided
//! p-value (share of resamples with uplift <= 0).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use statrs::statistics::Statistics;

use crate::ports::random::RandomSource;
use crate::stats::error::StatsError;

/// Default number of bootstrap rounds
pub const DEFAULT_ITERATIONS: usize = 1000;
/// Default two-sided confidence level
pub const DEFAULT_CONFIDENCE_LEVEL: f64 = 0.95;
/// Nominal number of histogram buckets across the CI
pub const HISTOGRAM_BUCKETS: f64 = 30.0;

/// Bootstrap configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BootstrapConfig {
    /// Number of resampling rounds
    pub iterations: usize,
    /// Confidence level for the interval (e.g. 0.95)
    pub confidence_level: f64,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            iterations: DEFAULT_ITERATIONS,
            confidence_level: DEFAULT_CONFIDENCE_LEVEL,
        }
    }
}

impl BootstrapConfig {
    pub fn validate(&self) -> Result<(), StatsError> {
        if self.iterations == 0 {
            return Err(StatsError::InvalidInput(
                "iterations must be > 0".to_string(),
            ));
        }
        if !(self.confidence_level > 0.0 && self.confidence_level < 1.0) {
            return Err(StatsError::InvalidInput(format!(
                "confidence level must be in (0, 1), got {}",
                self.confidence_level
            )));
        }
        Ok(())
    }
}

/// One histogram bar of the bootstrap distribution
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpliftBucket {
    /// Bucket index relative to the CI lower bound (may be < 0 or > 30)
    pub index: i64,
    /// Uplift at the bucket's left edge, in percent
    pub uplift_percent: f64,
    /// Share of bootstrap samples in this bucket, in percent
    pub frequency_percent: f64,
}

/// Empirical uplift distribution from one bootstrap run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpliftDistribution {
    /// Sparse histogram ordered by bucket index
    pub buckets: Vec<UpliftBucket>,
    /// Uplift of the observed means, in percent
    pub observed_diff: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
    /// Share of resampled uplifts <= 0
    pub p_value: f64,
}

impl UpliftDistribution {
    /// Check if the one-sided p-value clears `alpha`
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }

    /// Check if the confidence interval straddles zero uplift
    pub fn contains_zero(&self) -> bool {
        self.ci_lower <= 0.0 && self.ci_upper >= 0.0
    }

    /// Sum of all bucket frequencies (100 when nothing is lost)
    pub fn total_frequency(&self) -> f64 {
        self.buckets.iter().map(|b| b.frequency_percent).sum()
    }
}

/// Compute the bootstrap uplift distribution of `variation` over `control`
pub fn calculate_uplift<R: RandomSource + ?Sized>(
    control: &[f64],
    variation: &[f64],
    config: &BootstrapConfig,
    rng: &mut R,
) -> Result<UpliftDistribution, StatsError> {
    if control.is_empty() {
        return Err(StatsError::InvalidInput(
            "control group has no values".to_string(),
        ));
    }
    if variation.is_empty() {
        return Err(StatsError::InvalidInput(
            "variation group has no values".to_string(),
        ));
    }
    config.validate()?;

    if let Some(bad) = control.iter().chain(variation).find(|v| !v.is_finite()) {
        return Err(StatsError::InvalidInput(format!(
            "values must be finite, got {bad}"
        )));
    }

    let control_mean = group_mean(control);
    let variation_mean = group_mean(variation);

    if control_mean == 0.0 {
        return Err(StatsError::DivisionByZero(
            "control mean is zero, uplift is undefined".to_string(),
        ));
    }

    let observed_diff = finite_diff(control_mean, variation_mean)?;

    let iterations = config.iterations;
    let mut control_buf = Vec::with_capacity(control.len());
    let mut variation_buf = Vec::with_capacity(variation.len());
    let mut bootstrap_diffs = Vec::with_capacity(iterations);
    for _ in 0..iterations {
        resample_into(control, &mut control_buf, rng);
        resample_into(variation, &mut variation_buf, rng);
        let control_resample = group_mean(&control_buf);
        let diff = if control_resample == 0.0 {
            0.0
        } else {
            finite_diff(control_resample, group_mean(&variation_buf))?
        };
        bootstrap_diffs.push(diff);
    }
    bootstrap_diffs.sort_by(f64::total_cmp);

    let alpha = (1.0 - config.confidence_level) / 2.0;
    let ci_lower = bootstrap_diffs[percentile_index(alpha, iterations)];
    let ci_upper = bootstrap_diffs[percentile_index(1.0 - alpha, iterations)];

    let buckets = histogram(&bootstrap_diffs, ci_lower, ci_upper);

    let non_positive = bootstrap_diffs.iter().filter(|&&d| d <= 0.0).count();
    let p_value = non_positive as f64 / iterations as f64;

    tracing::debug!(
        "Bootstrap uplift: observed={:.2}% ci=[{:.2}, {:.2}] p={:.4} ({} buckets)",
        observed_diff,
        ci_lower,
        ci_upper,
        p_value,
        buckets.len()
    );

    Ok(UpliftDistribution {
        buckets,
        observed_diff,
        ci_lower,
        ci_upper,
        p_value,
    })
}

/// Running mean shared by the observed groups and every resample
fn group_mean(values: &[f64]) -> f64 {
    values.iter().mean()
}

fn finite_diff(control_mean: f64, variation_mean: f64) -> Result<f64, StatsError> {
    let diff = (variation_mean - control_mean) / control_mean * 100.0;
    if diff.is_finite() {
        Ok(diff)
    } else {
        Err(StatsError::InvalidInput(format!(
            "uplift is not finite ({diff}) for means {variation_mean} vs {control_mean}"
        )))
    }
}

/// Fill `buf` with a same-size resample of `values` drawn with replacement
fn resample_into<R: RandomSource + ?Sized>(values: &[f64], buf: &mut Vec<f64>, rng: &mut R) {
    let n = values.len();
    buf.clear();
    buf.extend((0..n).map(|_| values[rng.next_index(n)]));
}

fn percentile_index(p: f64, len: usize) -> usize {
    ((p * len as f64).floor() as usize).min(len - 1)
}

/// Bucket diffs by `floor((v - ci_lower) / width)` without clamping.
/// A zero-width CI collapses everything into bucket 0.
fn histogram(sorted_diffs: &[f64], ci_lower: f64, ci_upper: f64) -> Vec<UpliftBucket> {
    let total = sorted_diffs.len() as f64;
    let width = (ci_upper - ci_lower) / HISTOGRAM_BUCKETS;

    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for &value in sorted_diffs {
        let index = if width > 0.0 {
            ((value - ci_lower) / width).floor() as i64
        } else {
            0
        };
        *counts.entry(index).or_insert(0) += 1;
    }

    counts
        .into_iter()
        .map(|(index, count)| UpliftBucket {
            index,
            uplift_percent: ci_lower + index as f64 * width,
            frequency_percent: count as f64 / total * 100.0,
        })
        .collect()
}
