//! Application Layer - Analyzer use case
//!
//! Composes domain filtering, the statistics layer and the breakdown tables
//! into a single report.

pub mod params;
pub mod breakdown;
pub mod analyzer;
pub mod report;

pub use params::{AnalysisConfig, ParamsError};
pub use analyzer::{revenue_confidence, AnalysisError, RevenueAnalyzer};
pub use report::{AnalysisReport, VariationSummary};
