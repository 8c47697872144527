//! Uplift Analyzer - A/B test revenue statistics
//!
//! Command-line front end over the analyzer library.

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use uplift_analyzer::adapters::cli::{self, CliApp};
use uplift_analyzer::config::load_config;

fn main() -> Result<()> {
    let app = CliApp::parse();

    let config = match app.command.config_path() {
        Some(path) => {
            let path = cli::expand_path(path);
            Some(
                load_config(&path)
                    .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
            )
        }
        None => None,
    };

    let config_level = config.as_ref().map(|c| c.logging.level.as_str());
    init_logging(app.verbose, app.debug, config_level)?;

    cli::execute(app.command, config)
}

fn init_logging(verbose: bool, debug: bool, config_level: Option<&str>) -> Result<()> {
    let filter = if debug {
        EnvFilter::new("debug")
    } else if verbose {
        EnvFilter::new("info")
    } else if let Some(level) = config_level {
        EnvFilter::new(level.to_lowercase())
    } else {
        EnvFilter::new("warn")
    };

    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
    Ok(())
}
