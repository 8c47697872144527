//! Revenue range, order size and device breakdowns
//!
//! Tables shown beside the uplift numbers. Each takes already-filtered
//! transactions and groups them; no statistics beyond sums and means.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::range::{locate, partition_ranges, Range, RangeError};
use crate::domain::transaction::Transaction;
use crate::stats::correlation::{describe_strength, pearson_correlation, CorrelationDescription};
use crate::stats::error::StatsError;

/// Order size buckets: (label, min quantity, max quantity, representative).
/// A quantity of 0 (not recorded) counts as a single item.
const QUANTITY_BUCKETS: [(&str, u32, u32, f64); 4] = [
    ("1", 0, 1, 1.0),
    ("2-3", 2, 3, 2.5),
    ("4-5", 4, 5, 4.5),
    ("6+", 6, u32::MAX, 7.0),
];

/// Count values per range; values outside the partition's span are skipped
pub fn count_by_range(values: &[f64], ranges: &[Range]) -> Vec<usize> {
    let mut counts = vec![0; ranges.len()];
    for &value in values {
        if let Some(index) = locate(ranges, value) {
            counts[index] += 1;
        }
    }
    counts
}

/// Transactions in one revenue range, split by variation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RangeRow {
    pub range: Range,
    pub counts: BTreeMap<String, usize>,
    pub total: usize,
}

/// Partition the revenue span into `bucket_count` ranges and count
/// transactions per range and variation
pub fn revenue_breakdown(
    transactions: &[&Transaction],
    bucket_count: usize,
) -> Result<Vec<RangeRow>, RangeError> {
    if transactions.is_empty() {
        return Ok(Vec::new());
    }

    let (min, max) = transactions
        .iter()
        .map(|tx| tx.revenue)
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    let ranges = partition_ranges(min, max, bucket_count)?;

    let mut rows: Vec<RangeRow> = ranges
        .into_iter()
        .map(|range| RangeRow {
            range,
            counts: BTreeMap::new(),
            total: 0,
        })
        .collect();

    let bounds: Vec<Range> = rows.iter().map(|row| row.range).collect();
    for tx in transactions {
        if let Some(index) = locate(&bounds, tx.revenue) {
            let row = &mut rows[index];
            *row.counts.entry(tx.variation.clone()).or_insert(0) += 1;
            row.total += 1;
        }
    }

    Ok(rows)
}

/// Order size bucket with its average order value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityBucket {
    pub label: String,
    /// Quantity used to stand for the bucket in the correlation
    pub representative: f64,
    pub orders: usize,
    pub average_order_value: f64,
}

/// Relationship between order size and order value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuantityCorrelation {
    pub buckets: Vec<QuantityBucket>,
    pub description: CorrelationDescription,
}

/// Pearson r between bucket representatives and per-bucket AOV, over
/// buckets that hold at least one order
pub fn quantity_correlation(transactions: &[&Transaction]) -> Result<QuantityCorrelation, StatsError> {
    let buckets: Vec<QuantityBucket> = QUANTITY_BUCKETS
        .iter()
        .map(|&(label, lo, hi, representative)| {
            let revenues: Vec<f64> = transactions
                .iter()
                .filter(|tx| tx.quantity >= lo && tx.quantity <= hi)
                .map(|tx| tx.revenue)
                .collect();
            let average_order_value = if revenues.is_empty() {
                0.0
            } else {
                revenues.iter().sum::<f64>() / revenues.len() as f64
            };
            QuantityBucket {
                label: label.to_string(),
                representative,
                orders: revenues.len(),
                average_order_value,
            }
        })
        .collect();

    let (x, y): (Vec<f64>, Vec<f64>) = buckets
        .iter()
        .filter(|b| b.orders > 0)
        .map(|b| (b.representative, b.average_order_value))
        .unzip();

    let r = pearson_correlation(&x, &y)?;

    Ok(QuantityCorrelation {
        buckets,
        description: describe_strength(r),
    })
}

/// Orders and revenue for one device/variation cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DeviceStats {
    pub orders: usize,
    pub revenue: f64,
}

/// Per device category, per variation totals
pub fn device_breakdown(
    transactions: &[&Transaction],
) -> BTreeMap<String, BTreeMap<String, DeviceStats>> {
    let mut table: BTreeMap<String, BTreeMap<String, DeviceStats>> = BTreeMap::new();
    for tx in transactions {
        let device = if tx.device_category.is_empty() {
            "unknown".to_string()
        } else {
            tx.device_category.to_lowercase()
        };
        let cell = table
            .entry(device)
            .or_default()
            .entry(tx.variation.clone())
            .or_default();
        cell.orders += 1;
        cell.revenue += tx.revenue;
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::correlation::CorrelationStrength;
    use approx::assert_relative_eq;

    fn tx(id: &str, variation: &str, revenue: f64, quantity: u32, device: &str) -> Transaction {
        Transaction::new(id, variation, revenue, quantity).with_device(device)
    }

    #[test]
    fn test_count_by_range_covers_everything() {
        let values = [0.0, 3.5, 7.2, 10.0, 10.9, 11.0, 19.99, 20.0];
        let ranges = partition_ranges(0.0, 20.0, 2).unwrap();
        let counts = count_by_range(&values, &ranges);
        assert_eq!(counts.iter().sum::<usize>(), values.len());
        assert_eq!(counts, vec![5, 3]);
    }

    #[test]
    fn test_revenue_breakdown_totals() {
        let txs = vec![
            tx("1", "control", 5.0, 1, "desktop"),
            tx("2", "B", 12.5, 2, "mobile"),
            tx("3", "control", 48.0, 1, "desktop"),
            tx("4", "B", 99.0, 6, "mobile"),
            tx("5", "B", 99.4, 6, "tablet"),
        ];
        let refs: Vec<&Transaction> = txs.iter().collect();

        let rows = revenue_breakdown(&refs, 4).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows.iter().map(|r| r.total).sum::<usize>(), txs.len());
        assert_eq!(rows[0].counts.get("control"), Some(&1));
        assert_eq!(rows[3].counts.get("B"), Some(&2));
    }

    #[test]
    fn test_revenue_breakdown_empty() {
        assert!(revenue_breakdown(&[], 5).unwrap().is_empty());
    }

    #[test]
    fn test_quantity_correlation_positive() {
        let txs = vec![
            tx("1", "B", 20.0, 1, "desktop"),
            tx("2", "B", 22.0, 1, "desktop"),
            tx("3", "B", 45.0, 2, "desktop"),
            tx("4", "B", 55.0, 3, "desktop"),
            tx("5", "B", 90.0, 4, "desktop"),
            tx("6", "B", 140.0, 8, "desktop"),
        ];
        let refs: Vec<&Transaction> = txs.iter().collect();

        let result = quantity_correlation(&refs).unwrap();
        assert_eq!(result.buckets.len(), 4);
        assert_eq!(result.buckets[0].orders, 2);
        assert_relative_eq!(result.buckets[0].average_order_value, 21.0);
        assert_relative_eq!(result.buckets[1].average_order_value, 50.0);
        assert_eq!(result.description.strength, CorrelationStrength::Strong);
        assert!(result.description.r > 0.9);
    }

    #[test]
    fn test_quantity_correlation_single_bucket_is_zero() {
        let txs = vec![tx("1", "B", 20.0, 1, "desktop"), tx("2", "B", 30.0, 1, "desktop")];
        let refs: Vec<&Transaction> = txs.iter().collect();

        let result = quantity_correlation(&refs).unwrap();
        assert_eq!(result.description.r, 0.0);
        assert_eq!(result.buckets[3].orders, 0);
    }

    #[test]
    fn test_zero_quantity_counts_as_single_item() {
        let txs = vec![
            tx("1", "B", 20.0, 0, "desktop"),
            tx("2", "B", 30.0, 1, "desktop"),
            tx("3", "B", 60.0, 2, "desktop"),
        ];
        let refs: Vec<&Transaction> = txs.iter().collect();

        let result = quantity_correlation(&refs).unwrap();
        assert_eq!(result.buckets[0].orders, 2);
        assert_relative_eq!(result.buckets[0].average_order_value, 25.0);
        assert_eq!(
            result.buckets.iter().map(|b| b.orders).sum::<usize>(),
            txs.len()
        );
    }

    #[test]
    fn test_revenue_breakdown_rejects_unbounded_span() {
        let txs = vec![
            tx("1", "control", -1e19, 1, "desktop"),
            tx("2", "B", 1e19, 1, "desktop"),
        ];
        let refs: Vec<&Transaction> = txs.iter().collect();

        assert!(matches!(
            revenue_breakdown(&refs, 10),
            Err(RangeError::InvalidSpan { .. })
        ));
    }

    #[test]
    fn test_device_breakdown() {
        let txs = vec![
            tx("1", "control", 10.0, 1, "Desktop"),
            tx("2", "control", 15.0, 1, "desktop"),
            tx("3", "B", 30.0, 1, "mobile"),
            tx("4", "B", 5.0, 1, ""),
        ];
        let refs: Vec<&Transaction> = txs.iter().collect();

        let table = device_breakdown(&refs);
        assert_eq!(table.len(), 3);
        let desktop = &table["desktop"]["control"];
        assert_eq!(desktop.orders, 2);
        assert_relative_eq!(desktop.revenue, 25.0);
        assert_eq!(table["unknown"]["B"].orders, 1);
    }
}
