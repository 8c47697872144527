//! Dataset Adapter
//!
//! Loads transaction records from files on disk.

mod json;

pub use json::{load_transactions, parse_transactions, DatasetError};
