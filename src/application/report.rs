//! Analysis Report
//!
//! Serializable result of one analyzer run plus a plain-text rendering for
//! the terminal.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::application::breakdown::{DeviceStats, QuantityCorrelation, RangeRow};
use crate::domain::confidence::ConfidenceResult;
use crate::domain::metric::VariationMetric;
use crate::stats::bootstrap::UpliftDistribution;

/// Comparison of one variation against control
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariationSummary {
    pub variation: String,
    pub confidence: ConfidenceResult,
    /// `None` when the bootstrap could not run
    pub uplift: Option<UpliftDistribution>,
    /// Why `uplift` is missing
    pub note: Option<String>,
}

/// Everything the analyzer view displays
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub control_variation: String,
    pub total_transactions: usize,
    pub analyzed_transactions: usize,
    pub variations: Vec<VariationSummary>,
    /// Metric table rows after the outlier policy, control first
    pub metrics: Vec<VariationMetric>,
    pub revenue_ranges: Vec<RangeRow>,
    pub order_size: QuantityCorrelation,
    pub devices: BTreeMap<String, BTreeMap<String, DeviceStats>>,
}

impl AnalysisReport {
    pub fn variation(&self, name: &str) -> Option<&VariationSummary> {
        self.variations.iter().find(|v| v.variation == name)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for AnalysisReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Transactions: {} analyzed of {} (control: {})",
            self.analyzed_transactions, self.total_transactions, self.control_variation
        )?;

        writeln!(f, "\nVariations")?;
        for summary in &self.variations {
            let confidence = &summary.confidence;
            writeln!(
                f,
                "  {:<12} confidence {:>5.1}% [{}]",
                summary.variation, confidence.value, confidence.level.label
            )?;
            writeln!(f, "    variation: {}", confidence.details.variation)?;
            writeln!(f, "    control:   {}", confidence.details.control)?;
            match (&summary.uplift, &summary.note) {
                (Some(uplift), _) => writeln!(
                    f,
                    "    uplift {:+.2}% (CI {:+.2}% .. {:+.2}%, p = {:.3})",
                    uplift.observed_diff, uplift.ci_lower, uplift.ci_upper, uplift.p_value
                )?,
                (None, Some(note)) => writeln!(f, "    uplift: {}", note)?,
                (None, None) => writeln!(f, "    uplift: n/a")?,
            }
        }

        writeln!(f, "\nMetric table")?;
        for metric in &self.metrics {
            let marker = if metric.is_outlier { " (outlier)" } else { "" };
            writeln!(
                f,
                "  {:<12} avg {:>10.2}  uplift {:>+8.2}%  confidence {:>5.1}%{}",
                metric.variation, metric.value, metric.uplift, metric.confidence, marker
            )?;
        }

        writeln!(f, "\nRevenue ranges")?;
        for row in &self.revenue_ranges {
            let split: Vec<String> = row
                .counts
                .iter()
                .map(|(variation, count)| format!("{}={}", variation, count))
                .collect();
            writeln!(f, "  {:<14} {:>6}  {}", row.range.to_string(), row.total, split.join(" "))?;
        }

        writeln!(f, "\nOrder size")?;
        for bucket in &self.order_size.buckets {
            writeln!(
                f,
                "  qty {:<4} {:>6} orders  avg {:>10.2}",
                bucket.label, bucket.orders, bucket.average_order_value
            )?;
        }
        writeln!(f, "  {}", self.order_size.description)?;

        writeln!(f, "\nDevices")?;
        for (device, cells) in &self.devices {
            for (variation, stats) in cells {
                writeln!(
                    f,
                    "  {:<10} {:<12} {:>6} orders  {:>12.2}",
                    device, variation, stats.orders, stats.revenue
                )?;
            }
        }

        Ok(())
    }
}
