//! Standard normal CDF
//!
//! Abramowitz and Stegun rational-polynomial approximation (26.2.17).
//! Absolute error is below 7.5e-8, which is plenty for a display percentage.

const P: f64 = 0.2316419;
const INV_SQRT_2PI: f64 = 0.3989423;
const B1: f64 = 0.3193815;
const B2: f64 = -0.3565638;
const B3: f64 = 1.781478;
const B4: f64 = -1.821256;
const B5: f64 = 1.330274;

/// Approximate standard normal CDF
pub fn normal_cdf(x: f64) -> f64 {
    let t = 1.0 / (1.0 + P * x.abs());
    let d = INV_SQRT_2PI * (-x * x / 2.0).exp();
    let p = d * t * (B1 + t * (B2 + t * (B3 + t * (B4 + t * B5))));

    if x > 0.0 {
        1.0 - p
    } else {
        p
    }
}
