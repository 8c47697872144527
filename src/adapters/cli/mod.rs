//! CLI Adapter
//!
//! Command-line interface for the uplift analyzer.
//! Uses clap derive macros for argument parsing.

mod commands;

pub use commands::{
    execute, expand_path, AnalyzeCmd, CliApp, Command, CompareCmd, CorrelateCmd, OutliersCmd,
    OutputFormat,
};
