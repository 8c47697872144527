//! Uplift Analyzer - A/B test revenue statistics library
//!
//! Summarizes experiment transactions into the numbers an analyzer
//! dashboard shows: revenue uplift with bootstrap confidence intervals,
//! rank-based confidence, outlier flags and order-size correlation.
//!
//! # Modules
//!
//! - `domain`: Core types (Transaction, Range, ConfidenceResult, VariationMetric)
//! - `ports`: Trait abstractions (RandomSource)
//! - `stats`: Pure statistics (outliers, bootstrap, Mann-Whitney, correlation)
//! - `adapters`: External implementations (JSON dataset, CLI)
//! - `config`: Configuration loading and validation
//! - `application`: Analyzer use case and report

pub mod domain;
pub mod ports;
pub mod stats;
pub mod adapters;
pub mod config;
pub mod application;
