//! CLI Command Handlers
//!
//! Implementation of all CLI commands for the uplift analyzer.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};

use crate::adapters::dataset::load_transactions;
use crate::application::{AnalysisConfig, RevenueAnalyzer};
use crate::config::Config;
use crate::domain::confidence::{ConfidenceResult, MetricDetail};
use crate::ports::random::RngSource;
use crate::stats::bootstrap::{calculate_uplift, BootstrapConfig};
use crate::stats::correlation::{describe_strength, pearson_correlation};
use crate::stats::mann_whitney::approximate_confidence;
use crate::stats::outliers::{detect_outliers, iqr_bounds};

/// Uplift Analyzer - A/B test revenue statistics
#[derive(Parser, Debug)]
#[command(
    name = "uplift-analyzer",
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = "A/B test revenue analyzer",
    long_about = "Computes bootstrap uplift intervals, Mann-Whitney confidence, IQR outlier \
                  flags and order-size correlation for A/B test transactions."
)]
pub struct CliApp {
    /// The command to execute
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Analyze a transaction export
    Analyze(AnalyzeCmd),

    /// Compare two lists of values directly
    Compare(CompareCmd),

    /// Flag IQR outliers in a list of values
    Outliers(OutliersCmd),

    /// Pearson correlation of two paired series
    Correlate(CorrelateCmd),
}

impl Command {
    /// Config file referenced by the command, if any
    pub fn config_path(&self) -> Option<&Path> {
        match self {
            Command::Analyze(cmd) => cmd.config.as_deref(),
            _ => None,
        }
    }
}

/// Report output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Analyze a transaction export
#[derive(Parser, Debug)]
pub struct AnalyzeCmd {
    /// JSON file with the transaction array
    #[arg(value_name = "TRANSACTIONS")]
    pub transactions: PathBuf,

    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Override control variation name
    #[arg(long, value_name = "NAME")]
    pub control: Option<String>,

    /// Seed for reproducible bootstrap output
    #[arg(long, value_name = "N")]
    pub seed: Option<u64>,

    /// Bootstrap iterations
    #[arg(long, value_name = "N")]
    pub iterations: Option<usize>,

    /// Confidence level for bootstrap intervals (e.g. 0.95)
    #[arg(long, value_name = "LEVEL")]
    pub confidence_level: Option<f64>,

    /// Number of revenue ranges
    #[arg(long, value_name = "N")]
    pub buckets: Option<usize>,

    /// Only include this device category
    #[arg(long, value_name = "DEVICE")]
    pub device: Option<String>,

    /// Only include this item category
    #[arg(long, value_name = "CATEGORY")]
    pub category: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Compare two value lists
#[derive(Parser, Debug)]
pub struct CompareCmd {
    /// Variation values, comma separated
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    pub variation: Vec<f64>,

    /// Control values, comma separated
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    pub control: Vec<f64>,

    /// Bootstrap iterations
    #[arg(long, default_value = "1000")]
    pub iterations: usize,

    /// Seed for reproducible bootstrap output
    #[arg(long)]
    pub seed: Option<u64>,
}

/// Flag outliers
#[derive(Parser, Debug)]
pub struct OutliersCmd {
    /// Values to check
    #[arg(value_name = "VALUES", required = true, allow_hyphen_values = true)]
    pub values: Vec<f64>,
}

/// Correlate two series
#[derive(Parser, Debug)]
pub struct CorrelateCmd {
    /// X series, comma separated
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    pub x: Vec<f64>,

    /// Y series, comma separated
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    pub y: Vec<f64>,
}

/// Execute a parsed command
pub fn execute(command: Command, config: Option<Config>) -> Result<()> {
    match command {
        Command::Analyze(cmd) => analyze_command(cmd, config),
        Command::Compare(cmd) => compare_command(cmd),
        Command::Outliers(cmd) => outliers_command(cmd),
        Command::Correlate(cmd) => correlate_command(cmd),
    }
}

/// Expand `~` in user-supplied paths
pub fn expand_path(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

/// Merge file config and command-line overrides
fn build_analysis_config(cmd: &AnalyzeCmd, config: Option<&Config>) -> AnalysisConfig {
    let mut analysis = config.map(AnalysisConfig::from).unwrap_or_default();

    if let Some(control) = &cmd.control {
        analysis = analysis.with_control(control.clone());
    }
    if let Some(seed) = cmd.seed {
        analysis = analysis.with_seed(seed);
    }
    if let Some(iterations) = cmd.iterations {
        analysis = analysis.with_iterations(iterations);
    }
    if let Some(level) = cmd.confidence_level {
        analysis = analysis.with_confidence_level(level);
    }
    if let Some(buckets) = cmd.buckets {
        analysis = analysis.with_bucket_count(buckets);
    }
    if cmd.device.is_some() {
        analysis.filter.device_category = cmd.device.clone();
    }
    if cmd.category.is_some() {
        analysis.filter.item_category2 = cmd.category.clone();
    }
    analysis
}

fn analyze_command(cmd: AnalyzeCmd, config: Option<Config>) -> Result<()> {
    let analysis = build_analysis_config(&cmd, config.as_ref());
    let analyzer = RevenueAnalyzer::new(analysis).context("Invalid analysis parameters")?;

    let path = expand_path(&cmd.transactions);
    let transactions = load_transactions(&path)
        .with_context(|| format!("Failed to load transactions from {}", path.display()))?;
    tracing::info!("Loaded {} transactions from {}", transactions.len(), path.display());

    let report = analyzer.analyze(&transactions).context("Analysis failed")?;

    match cmd.format {
        OutputFormat::Text => print!("{}", report),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}

fn compare_command(cmd: CompareCmd) -> Result<()> {
    let confidence = ConfidenceResult::new(
        approximate_confidence(&cmd.variation, &cmd.control),
        MetricDetail::from_revenue(&cmd.variation),
        MetricDetail::from_revenue(&cmd.control),
    );
    println!(
        "Confidence: {:.1}% [{}]",
        confidence.value, confidence.level.label
    );

    let config = BootstrapConfig {
        iterations: cmd.iterations,
        ..Default::default()
    };
    let mut rng = RngSource::from_optional_seed(cmd.seed);
    match calculate_uplift(&cmd.control, &cmd.variation, &config, &mut rng) {
        Ok(uplift) => println!(
            "Uplift: {:+.2}% (CI {:+.2}% .. {:+.2}%, p = {:.3})",
            uplift.observed_diff, uplift.ci_lower, uplift.ci_upper, uplift.p_value
        ),
        Err(e) => println!("Uplift: not enough data ({})", e),
    }
    Ok(())
}

fn outliers_command(cmd: OutliersCmd) -> Result<()> {
    let flags = detect_outliers(&cmd.values);
    if let Some(bounds) = iqr_bounds(&cmd.values) {
        println!(
            "Q1 {:.2}  Q3 {:.2}  IQR {:.2}  fences [{:.2}, {:.2}]",
            bounds.q1, bounds.q3, bounds.iqr, bounds.lower, bounds.upper
        );
    }
    for (value, is_outlier) in cmd.values.iter().zip(flags) {
        println!("{:>12.2}  {}", value, if is_outlier { "outlier" } else { "ok" });
    }
    Ok(())
}

fn correlate_command(cmd: CorrelateCmd) -> Result<()> {
    let r = pearson_correlation(&cmd.x, &cmd.y).context("Cannot correlate series")?;
    println!("{}", describe_strength(r));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::parse_config;

    #[test]
    fn test_parse_analyze_command() {
        let app = CliApp::parse_from([
            "uplift-analyzer",
            "analyze",
            "data.json",
            "--seed",
            "9",
            "--device",
            "mobile",
            "--format",
            "json",
        ]);
        match app.command {
            Command::Analyze(cmd) => {
                assert_eq!(cmd.transactions, PathBuf::from("data.json"));
                assert_eq!(cmd.seed, Some(9));
                assert_eq!(cmd.device.as_deref(), Some("mobile"));
                assert_eq!(cmd.format, OutputFormat::Json);
                assert!(cmd.config.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_value_lists() {
        let app = CliApp::parse_from(["uplift-analyzer", "correlate", "--x", "1,2,3", "--y", "-1,0,4.5"]);
        match app.command {
            Command::Correlate(cmd) => {
                assert_eq!(cmd.x, vec![1.0, 2.0, 3.0]);
                assert_eq!(cmd.y, vec![-1.0, 0.0, 4.5]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_overrides_win_over_config() {
        let config = parse_config(
            r#"
[analysis]
control_variation = "A"
iterations = 500
confidence_level = 0.9

[ranges]
revenue_bucket_count = 4

[logging]
level = "info"
"#,
        )
        .unwrap();

        let app = CliApp::parse_from([
            "uplift-analyzer",
            "analyze",
            "data.json",
            "--control",
            "baseline",
            "--buckets",
            "12",
        ]);
        let Command::Analyze(cmd) = app.command else {
            panic!("expected analyze");
        };

        let analysis = build_analysis_config(&cmd, Some(&config));
        assert_eq!(analysis.control_variation, "baseline");
        assert_eq!(analysis.bootstrap.iterations, 500);
        assert_eq!(analysis.bootstrap.confidence_level, 0.9);
        assert_eq!(analysis.revenue_bucket_count, 12);
    }

    #[test]
    fn test_defaults_without_config() {
        let app = CliApp::parse_from(["uplift-analyzer", "analyze", "data.json"]);
        let Command::Analyze(cmd) = app.command else {
            panic!("expected analyze");
        };
        let analysis = build_analysis_config(&cmd, None);
        assert_eq!(analysis, AnalysisConfig::default());
    }

    #[test]
    fn test_expand_plain_path_unchanged() {
        assert_eq!(expand_path(Path::new("data/tx.json")), PathBuf::from("data/tx.json"));
    }
}
