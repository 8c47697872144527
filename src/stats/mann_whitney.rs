//! Mann-Whitney Confidence Approximation
//!
//! Rank-based U statistic turned into a confidence percentage through the
//! normal approximation:
//!
//! U = R_variation - n_v(n_v + 1)/2
//! z = |U - n_v*n_c/2| / sqrt(n_v*n_c*(n_v + n_c + 1)/12)
//! confidence = (1 - 2*(1 - Φ(z))) * 100
//!
//! Ranks are positional after a stable sort (variation values first), so
//! ties are NOT averaged. Results match the dashboard's numbers, not a
//! textbook U-test on tied data.

use serde::{Deserialize, Serialize};

use crate::stats::normal::normal_cdf;

/// Intermediate U-test quantities, useful for diagnostics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MannWhitneyU {
    /// Sum of positional ranks of the variation group
    pub rank_sum: f64,
    pub u: f64,
    pub z: f64,
    pub n_variation: usize,
    pub n_control: usize,
}

impl MannWhitneyU {
    /// Two-sided confidence in percent, clamped to [0, 100]
    pub fn confidence(&self) -> f64 {
        ((1.0 - 2.0 * (1.0 - normal_cdf(self.z))) * 100.0).clamp(0.0, 100.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Group {
    Variation,
    Control,
}

/// Compute the U statistic, `None` if either group is empty
pub fn mann_whitney_u(variation: &[f64], control: &[f64]) -> Option<MannWhitneyU> {
    if variation.is_empty() || control.is_empty() {
        return None;
    }

    let mut combined: Vec<(f64, Group)> = variation
        .iter()
        .map(|&v| (v, Group::Variation))
        .chain(control.iter().map(|&v| (v, Group::Control)))
        .collect();
    combined.sort_by(|a, b| a.0.total_cmp(&b.0));

    let rank_sum: f64 = combined
        .iter()
        .enumerate()
        .filter(|(_, (_, group))| *group == Group::Variation)
        .map(|(i, _)| (i + 1) as f64)
        .sum();

    let n_v = variation.len() as f64;
    let n_c = control.len() as f64;

    let u = rank_sum - n_v * (n_v + 1.0) / 2.0;
    let mean = n_v * n_c / 2.0;
    let std = (n_v * n_c * (n_v + n_c + 1.0) / 12.0).sqrt();
    let z = (u - mean).abs() / std;

    Some(MannWhitneyU {
        rank_sum,
        u,
        z,
        n_variation: variation.len(),
        n_control: control.len(),
    })
}

/// Approximate confidence (0-100) that the groups differ; 0 if either is empty
pub fn approximate_confidence(variation: &[f64], control: &[f64]) -> f64 {
    mann_whitney_u(variation, control)
        .map(|result| result.confidence())
        .unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::confidence::ConfidenceTier;
    use approx::assert_relative_eq;
    use statrs::distribution::{ContinuousCDF, Normal};

    #[test]
    fn test_empty_groups_give_zero() {
        assert_eq!(approximate_confidence(&[], &[1.0, 2.0, 3.0]), 0.0);
        assert_eq!(approximate_confidence(&[1.0, 2.0, 3.0], &[]), 0.0);
        assert!(mann_whitney_u(&[], &[]).is_none());
    }

    #[test]
    fn test_u_statistic_fully_separated() {
        // Variation ranks 4,5,6 -> R = 15, U = 15 - 6 = 9
        let result = mann_whitney_u(&[10.0, 11.0, 12.0], &[1.0, 2.0, 3.0]).unwrap();
        assert_eq!(result.rank_sum, 15.0);
        assert_eq!(result.u, 9.0);

        // mean = 4.5, std = sqrt(9 * 7 / 12)
        let expected_z = 4.5 / (63.0_f64 / 12.0).sqrt();
        assert_relative_eq!(result.z, expected_z, epsilon = 1e-12);
    }

    #[test]
    fn test_ties_use_positional_ranks() {
        // All values tie; variation comes first after the stable sort
        let result = mann_whitney_u(&[5.0, 5.0], &[5.0, 5.0]).unwrap();
        assert_eq!(result.rank_sum, 3.0);
        assert_eq!(result.u, 0.0);

        // mean = 2, std = sqrt(20 / 12), z = 2 / std ~ 1.549 -> ~87.87%
        let expected_z = 2.0 / (20.0_f64 / 12.0).sqrt();
        assert_relative_eq!(result.z, expected_z, epsilon = 1e-12);

        let normal = Normal::new(0.0, 1.0).unwrap();
        let expected = (2.0 * normal.cdf(expected_z) - 1.0) * 100.0;
        let confidence = approximate_confidence(&[5.0, 5.0], &[5.0, 5.0]);
        assert_relative_eq!(confidence, expected, epsilon = 1e-4);
        assert!(confidence > 87.8 && confidence < 87.95);
        assert_eq!(ConfidenceTier::from_value(confidence), ConfidenceTier::Trending);
    }

    #[test]
    fn test_interleaved_groups_low_confidence() {
        let variation = [1.0, 4.0, 5.0, 8.0];
        let control = [2.0, 3.0, 6.0, 7.0];
        // Ranks 1,4,5,8 -> R = 18, U = 8 = mean -> z = 0
        let result = mann_whitney_u(&variation, &control).unwrap();
        assert_eq!(result.u, 8.0);
        assert_eq!(result.z, 0.0);
        assert!(approximate_confidence(&variation, &control) < 1e-3);
    }

    #[test]
    fn test_clear_difference_high_confidence() {
        let control: Vec<f64> = (0..30).map(|i| 20.0 + i as f64).collect();
        let variation: Vec<f64> = (0..30).map(|i| 60.0 + i as f64).collect();

        let confidence = approximate_confidence(&variation, &control);
        assert!(confidence > 99.0);
        assert!(confidence <= 100.0);
    }

    #[test]
    fn test_direction_does_not_matter() {
        let a = [3.0, 9.0, 14.0, 20.0, 21.0];
        let b = [1.0, 2.0, 4.0, 6.0, 10.0, 11.0];
        assert_relative_eq!(
            approximate_confidence(&a, &b),
            approximate_confidence(&b, &a),
            epsilon = 1e-9
        );
    }
}
