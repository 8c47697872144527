//! Domain Layer - Core types for A/B test revenue analysis
//!
//! Pure data types with no I/O:
//! - `transaction`: purchase records and the dashboard filter
//! - `range`: contiguous numeric buckets
//! - `confidence`: confidence value, tier and per-group details
//! - `metric`: metric table rows and the outlier policy

pub mod transaction;
pub mod range;
pub mod confidence;
pub mod metric;

pub use transaction::{revenues_for, Transaction, TransactionFilter};
pub use range::{locate, partition_ranges, validate_partition, Range, RangeError};
pub use confidence::{
    ConfidenceDetails, ConfidenceLevel, ConfidenceResult, ConfidenceTier, MetricDetail, MetricUnit,
};
pub use metric::{apply_outlier_policy, VariationMetric};
