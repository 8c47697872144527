//! Transaction record
//!
//! One purchase attributed to an experiment variation. Records are
//! immutable once loaded and held in memory for a single analysis.

use serde::{Deserialize, Serialize};

/// A single A/B test transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub transaction_id: String,
    /// Variation the visitor was bucketed into (e.g. "control", "B")
    pub variation: String,
    /// "desktop", "mobile", "tablet", ...
    pub device_category: String,
    pub revenue: f64,
    pub quantity: u32,
    /// Product category used by the dashboard's category filter
    #[serde(default)]
    pub item_category2: String,
}

impl Transaction {
    pub fn new(
        transaction_id: impl Into<String>,
        variation: impl Into<String>,
        revenue: f64,
        quantity: u32,
    ) -> Self {
        Self {
            transaction_id: transaction_id.into(),
            variation: variation.into(),
            device_category: String::new(),
            revenue,
            quantity,
            item_category2: String::new(),
        }
    }

    pub fn with_device(mut self, device: impl Into<String>) -> Self {
        self.device_category = device.into();
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.item_category2 = category.into();
        self
    }

    /// Check if the record can take part in revenue statistics
    pub fn is_valid(&self) -> bool {
        !self.variation.is_empty() && self.revenue.is_finite()
    }
}

/// Dashboard filter applied before any statistics are computed
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionFilter {
    pub device_category: Option<String>,
    pub item_category2: Option<String>,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        let device_ok = self
            .device_category
            .as_deref()
            .map_or(true, |d| tx.device_category.eq_ignore_ascii_case(d));
        let category_ok = self
            .item_category2
            .as_deref()
            .map_or(true, |c| tx.item_category2 == c);
        device_ok && category_ok
    }

    pub fn is_empty(&self) -> bool {
        self.device_category.is_none() && self.item_category2.is_none()
    }

    /// Keep matching, valid transactions
    pub fn apply<'a>(&self, transactions: &'a [Transaction]) -> Vec<&'a Transaction> {
        transactions
            .iter()
            .filter(|tx| tx.is_valid() && self.matches(tx))
            .collect()
    }
}

/// Revenue values of one variation, in input order
pub fn revenues_for<'a, I>(transactions: I, variation: &str) -> Vec<f64>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .filter(|tx| tx.variation == variation)
        .map(|tx| tx.revenue)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Transaction> {
        vec![
            Transaction::new("t1", "control", 20.0, 1).with_device("desktop").with_category("Shoes"),
            Transaction::new("t2", "B", 35.0, 2).with_device("mobile").with_category("Shoes"),
            Transaction::new("t3", "control", 15.0, 1).with_device("Mobile").with_category("Hats"),
            Transaction::new("t4", "B", f64::NAN, 1).with_device("mobile"),
        ]
    }

    #[test]
    fn test_deserialize_without_category() {
        let json = r#"{
            "transaction_id": "abc",
            "variation": "control",
            "device_category": "desktop",
            "revenue": 49.5,
            "quantity": 3
        }"#;
        let tx: Transaction = serde_json::from_str(json).unwrap();
        assert_eq!(tx.quantity, 3);
        assert_eq!(tx.item_category2, "");
    }

    #[test]
    fn test_empty_filter_drops_only_invalid() {
        let txs = sample();
        let filter = TransactionFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&txs).len(), 3);
    }

    #[test]
    fn test_device_filter_case_insensitive() {
        let txs = sample();
        let filter = TransactionFilter {
            device_category: Some("mobile".to_string()),
            item_category2: None,
        };
        let ids: Vec<&str> = filter.apply(&txs).iter().map(|t| t.transaction_id.as_str()).collect();
        assert_eq!(ids, vec!["t2", "t3"]);
    }

    #[test]
    fn test_combined_filter() {
        let txs = sample();
        let filter = TransactionFilter {
            device_category: Some("mobile".to_string()),
            item_category2: Some("Shoes".to_string()),
        };
        assert_eq!(filter.apply(&txs).len(), 1);
    }

    #[test]
    fn test_revenues_for() {
        let txs = sample();
        assert_eq!(revenues_for(&txs, "control"), vec![20.0, 15.0]);
        assert!(revenues_for(&txs, "missing").is_empty());
    }
}
