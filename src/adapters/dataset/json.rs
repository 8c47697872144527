//! JSON transaction dataset
//!
//! Reads the transaction array exported by the analyzer's data fetch:
//! `[{"transaction_id": ..., "variation": ..., "revenue": ..., ...}, ...]`.
//! The `{ "data": [...] }` envelope returned by the aggregation endpoint is
//! accepted too.

use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::domain::transaction::Transaction;

/// Dataset errors
#[derive(Debug, Error)]
pub enum DatasetError {
    #[error("Failed to read dataset: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse dataset JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DatasetShape {
    Array(Vec<Transaction>),
    Envelope { data: Vec<Transaction> },
}

/// Parse transactions from JSON text
pub fn parse_transactions(content: &str) -> Result<Vec<Transaction>, DatasetError> {
    let shape: DatasetShape = serde_json::from_str(content)?;
    let transactions = match shape {
        DatasetShape::Array(txs) => txs,
        DatasetShape::Envelope { data } => data,
    };
    tracing::debug!("Parsed {} transactions", transactions.len());
    Ok(transactions)
}

/// Load transactions from a JSON file
pub fn load_transactions<P: AsRef<Path>>(path: P) -> Result<Vec<Transaction>, DatasetError> {
    let content = std::fs::read_to_string(path)?;
    parse_transactions(&content)
}
