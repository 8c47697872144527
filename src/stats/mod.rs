//! Statistics Layer - Revenue and uplift summaries for A/B test analysis
//!
//! Four independent pure computations feed the analyzer report:
//! - `outliers`: IQR fences over per-variation values
//! - `bootstrap`: resampled uplift distribution, CI and one-sided p-value
//! - `mann_whitney`: rank-based confidence approximation
//! - `correlation`: Pearson r between order size and order value
//!
//! Randomness enters only through `ports::random::RandomSource`.

pub mod error;
pub mod normal;
pub mod outliers;
pub mod bootstrap;
pub mod mann_whitney;
pub mod correlation;

pub use error::StatsError;
pub use normal::normal_cdf;
pub use outliers::{detect_outliers, iqr_bounds, IqrBounds};
pub use bootstrap::{calculate_uplift, BootstrapConfig, UpliftBucket, UpliftDistribution};
pub use mann_whitney::{approximate_confidence, mann_whitney_u, MannWhitneyU};
pub use correlation::{
    describe_strength, pearson_correlation, CorrelationDescription, CorrelationDirection,
    CorrelationStrength,
};
