//! Adapters Layer - Edges of the analyzer
//!
//! - `dataset`: transaction files on disk
//! - `cli`: command-line front end

pub mod dataset;
pub mod cli;
