//! Revenue Analyzer
//!
//! Runs every statistic the analyzer dashboard shows for one filtered set
//! of transactions:
//! 1. Filter and group transactions by variation
//! 2. Per variation vs control: bootstrap uplift + Mann-Whitney confidence
//! 3. Outlier policy over per-variation average order values
//! 4. Revenue range, order size and device breakdowns
//!
//! A variation with too little data gets a note instead of failing the run.

use std::collections::BTreeSet;

use thiserror::Error;

use crate::application::breakdown::{device_breakdown, quantity_correlation, revenue_breakdown};
use crate::application::params::{AnalysisConfig, ParamsError};
use crate::application::report::{AnalysisReport, VariationSummary};
use crate::domain::confidence::{ConfidenceResult, MetricDetail};
use crate::domain::metric::{apply_outlier_policy, VariationMetric};
use crate::domain::range::RangeError;
use crate::domain::transaction::{revenues_for, Transaction};
use crate::ports::random::{RandomSource, RngSource};
use crate::stats::bootstrap::calculate_uplift;
use crate::stats::error::StatsError;
use crate::stats::mann_whitney::approximate_confidence;

/// Analysis errors
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Invalid analysis config: {0}")]
    InvalidConfig(#[from] ParamsError),

    #[error("No transactions left after filtering")]
    NoTransactions,

    #[error("Control variation '{0}' has no transactions")]
    MissingControl(String),

    #[error("Statistics failed: {0}")]
    Stats(#[from] StatsError),

    #[error("Revenue ranges failed: {0}")]
    Range(#[from] RangeError),
}

/// Revenue analyzer over in-memory transactions
#[derive(Debug, Clone)]
pub struct RevenueAnalyzer {
    config: AnalysisConfig,
}

impl RevenueAnalyzer {
    /// Create an analyzer, validating the configuration
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyze with a source seeded from the config (entropy when unset)
    pub fn analyze(&self, transactions: &[Transaction]) -> Result<AnalysisReport, AnalysisError> {
        let mut rng = RngSource::from_optional_seed(self.config.seed);
        self.analyze_with(transactions, &mut rng)
    }

    /// Analyze drawing bootstrap indices from `rng`
    pub fn analyze_with<R: RandomSource + ?Sized>(
        &self,
        transactions: &[Transaction],
        rng: &mut R,
    ) -> Result<AnalysisReport, AnalysisError> {
        let filtered = self.config.filter.apply(transactions);
        if filtered.is_empty() {
            return Err(AnalysisError::NoTransactions);
        }

        let control_name = self.config.control_variation.as_str();
        let control = revenues_for(filtered.iter().copied(), control_name);
        if control.is_empty() {
            return Err(AnalysisError::MissingControl(control_name.to_string()));
        }

        let variation_names: BTreeSet<&str> = filtered
            .iter()
            .copied()
            .map(|tx| tx.variation.as_str())
            .filter(|name| *name != control_name)
            .collect();

        tracing::info!(
            "Analyzing {} of {} transactions: control '{}' ({} orders) vs {} variation(s)",
            filtered.len(),
            transactions.len(),
            control_name,
            control.len(),
            variation_names.len()
        );

        let control_detail = MetricDetail::from_revenue(&control);

        let mut summaries = Vec::with_capacity(variation_names.len());
        let mut metrics = vec![VariationMetric::new(control_name, control_detail.rate, 0.0, 0.0)];

        for name in variation_names {
            let values = revenues_for(filtered.iter().copied(), name);
            let summary = self.summarize(name, &values, &control, &control_detail, rng);

            metrics.push(VariationMetric::new(
                name,
                summary.confidence.details.variation.rate,
                summary.uplift.as_ref().map_or(0.0, |u| u.observed_diff),
                summary.confidence.value,
            ));
            summaries.push(summary);
        }

        let flagged = apply_outlier_policy(&mut metrics);
        if flagged > 0 {
            tracing::warn!("{} variation(s) flagged as outliers, uplift and confidence reset", flagged);
        }

        let revenue_ranges = revenue_breakdown(&filtered, self.config.revenue_bucket_count)?;
        let order_size = quantity_correlation(&filtered)?;
        let devices = device_breakdown(&filtered);

        Ok(AnalysisReport {
            control_variation: control_name.to_string(),
            total_transactions: transactions.len(),
            analyzed_transactions: filtered.len(),
            variations: summaries,
            metrics,
            revenue_ranges,
            order_size,
            devices,
        })
    }

    fn summarize<R: RandomSource + ?Sized>(
        &self,
        name: &str,
        values: &[f64],
        control: &[f64],
        control_detail: &MetricDetail,
        rng: &mut R,
    ) -> VariationSummary {
        let confidence = ConfidenceResult::new(
            approximate_confidence(values, control),
            MetricDetail::from_revenue(values),
            control_detail.clone(),
        );

        match calculate_uplift(control, values, &self.config.bootstrap, rng) {
            Ok(uplift) => {
                tracing::debug!(
                    "Variation '{}': uplift {:.2}% [{:.2}, {:.2}], confidence {:.1}",
                    name,
                    uplift.observed_diff,
                    uplift.ci_lower,
                    uplift.ci_upper,
                    confidence.value
                );
                VariationSummary {
                    variation: name.to_string(),
                    confidence,
                    uplift: Some(uplift),
                    note: None,
                }
            }
            Err(e) => {
                tracing::warn!("Variation '{}': not enough data for uplift: {}", name, e);
                VariationSummary {
                    variation: name.to_string(),
                    confidence,
                    uplift: None,
                    note: Some(format!("not enough data: {}", e)),
                }
            }
        }
    }
}

/// Revenue confidence for one variation vs control, as shown in the
/// dashboard's confidence badge
pub fn revenue_confidence(
    transactions: &[Transaction],
    control_variation: &str,
    variation: &str,
) -> ConfidenceResult {
    let control = revenues_for(transactions, control_variation);
    let values = revenues_for(transactions, variation);
    ConfidenceResult::new(
        approximate_confidence(&values, &control),
        MetricDetail::from_revenue(&values),
        MetricDetail::from_revenue(&control),
    )
}
