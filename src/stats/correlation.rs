//! Pearson Correlation
//!
//! r = (nΣxy - ΣxΣy) / sqrt((nΣx² - (Σx)²)(nΣy² - (Σy)²))
//!
//! Zero variance in either series yields 0 instead of NaN. The
//! sum-of-squares form leaves rounding noise for constants that are not
//! exact in binary (0.1, 33.33), so a variance within `VARIANCE_EPSILON` of
//! its own scale counts as zero.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::stats::error::StatsError;

/// Relative tolerance below which `nΣv² - (Σv)²` is treated as zero
const VARIANCE_EPSILON: f64 = 1e-12;

/// Strength of a linear relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationStrength {
    Strong,
    Moderate,
    Weak,
    Negligible,
}

impl fmt::Display for CorrelationStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationStrength::Strong => write!(f, "strong"),
            CorrelationStrength::Moderate => write!(f, "moderate"),
            CorrelationStrength::Weak => write!(f, "weak"),
            CorrelationStrength::Negligible => write!(f, "negligible"),
        }
    }
}

/// Direction of a linear relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CorrelationDirection {
    Positive,
    Negative,
    None,
}

impl fmt::Display for CorrelationDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CorrelationDirection::Positive => write!(f, "positive"),
            CorrelationDirection::Negative => write!(f, "negative"),
            CorrelationDirection::None => write!(f, "no"),
        }
    }
}

/// Human-readable description of a coefficient
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorrelationDescription {
    pub r: f64,
    pub strength: CorrelationStrength,
    pub direction: CorrelationDirection,
}

impl fmt::Display for CorrelationDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.strength == CorrelationStrength::Negligible {
            write!(f, "no meaningful correlation (r = {:.3})", self.r)
        } else {
            write!(f, "{} {} correlation (r = {:.3})", self.strength, self.direction, self.r)
        }
    }
}

/// Pearson correlation coefficient of two paired series
pub fn pearson_correlation(x: &[f64], y: &[f64]) -> Result<f64, StatsError> {
    if x.len() != y.len() {
        return Err(StatsError::InvalidInput(format!(
            "series lengths differ: {} vs {}",
            x.len(),
            y.len()
        )));
    }

    let n = x.len() as f64;
    let sum_x: f64 = x.iter().sum();
    let sum_y: f64 = y.iter().sum();
    let sum_xy: f64 = x.iter().zip(y).map(|(a, b)| a * b).sum();
    let sum_x2: f64 = x.iter().map(|a| a * a).sum();
    let sum_y2: f64 = y.iter().map(|b| b * b).sum();

    let numerator = n * sum_xy - sum_x * sum_y;
    let var_x = n * sum_x2 - sum_x * sum_x;
    let var_y = n * sum_y2 - sum_y * sum_y;
    if is_zero_variance(var_x, n * sum_x2) || is_zero_variance(var_y, n * sum_y2) {
        return Ok(0.0);
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return Ok(0.0);
    }

    Ok((numerator / denominator).clamp(-1.0, 1.0))
}

fn is_zero_variance(variance: f64, scale: f64) -> bool {
    variance <= VARIANCE_EPSILON * scale
}

/// Classify a coefficient by magnitude and sign
pub fn describe_strength(r: f64) -> CorrelationDescription {
    let magnitude = r.abs();
    let strength = if magnitude >= 0.7 {
        CorrelationStrength::Strong
    } else if magnitude >= 0.4 {
        CorrelationStrength::Moderate
    } else if magnitude >= 0.2 {
        CorrelationStrength::Weak
    } else {
        CorrelationStrength::Negligible
    };

    let direction = if strength == CorrelationStrength::Negligible {
        CorrelationDirection::None
    } else if r > 0.0 {
        CorrelationDirection::Positive
    } else {
        CorrelationDirection::Negative
    };

    CorrelationDescription {
        r,
        strength,
        direction,
    }
}
