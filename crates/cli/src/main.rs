//! Health Risk Predictor CLI
//!
//! Collects patient measurements, runs them through a pre-trained binary
//! classifier, and shows a risk verdict with its probability.

mod commands;
mod config;
mod output;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use commands::{fields, info, interactive, predict, Session};
use risk_lib::{init_tracing, ArtifactStore, LogFormat, StructuredLogger};
use std::path::PathBuf;
use tracing::debug;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Health Risk Predictor CLI
#[derive(Parser)]
#[command(name = "hrp")]
#[command(author, version, about = "Health Risk Predictor: estimate high metabolic risk from patient measurements", long_about = None)]
pub struct Cli {
    /// Classifier artifact (.onnx or .json); overrides config and HRP_MODEL_PATH
    #[arg(long)]
    pub model: Option<PathBuf>,

    /// Model metadata descriptor; overrides config and HRP_METADATA_PATH
    #[arg(long)]
    pub metadata: Option<PathBuf>,

    /// Configuration file (defaults to ~/.config/hrp/config.json)
    #[arg(long, env = "HRP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(long, short, default_value = "table")]
    pub format: output::OutputFormat,

    /// Enable verbose output
    #[arg(long, short)]
    pub verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the input form fields with ranges and defaults
    Fields,

    /// Show usage guidance and the model summary
    Info,

    /// Predict risk from default values overridden by --set
    Predict {
        /// Field value as FEATURE=VALUE (repeatable)
        #[arg(long = "set", short = 's', value_name = "FEATURE=VALUE", value_parser = predict::parse_assignment)]
        values: Vec<(String, f64)>,

        #[command(flatten)]
        details: DetailArgs,
    },

    /// Fill in the form interactively and predict
    Interactive {
        #[command(flatten)]
        details: DetailArgs,
    },
}

#[derive(clap::Args)]
pub struct DetailArgs {
    /// Show raw probability and threshold
    #[arg(long, conflicts_with = "no_details")]
    pub details: bool,

    /// Hide raw probability and threshold
    #[arg(long)]
    pub no_details: bool,
}

impl DetailArgs {
    fn resolve(&self, configured: bool) -> bool {
        if self.details {
            true
        } else if self.no_details {
            false
        } else {
            configured
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    let log_format = if cli.log_json { LogFormat::Json } else { LogFormat::Text };
    init_tracing(level, log_format);

    // Load configuration
    let mut config = config::Config::load(cli.config.as_deref())?;
    if let Some(model) = cli.model {
        config.model_path = model;
    }
    if let Some(metadata) = cli.metadata {
        config.metadata_path = metadata;
    }

    let logger = StructuredLogger::new(format!("pid-{}", std::process::id()));

    // Artifacts load once here; nothing is rendered if this fails
    let store = ArtifactStore::new(config.artifact_paths());
    let artifacts = match store.load() {
        Ok(artifacts) => artifacts,
        Err(e) => {
            logger.log_startup_failure(&e.to_string());
            return Err(e).context("Cannot start without model artifacts");
        }
    };
    logger.log_startup(VERSION, artifacts.metadata());

    let session = Session::new(artifacts, logger.clone(), cli.format);

    match cli.command {
        Commands::Fields => {
            println!("{}", fields::render_fields(&session));
        }
        Commands::Info => {
            println!("{}", info::render_info(&session)?);
        }
        Commands::Predict { values, details } => {
            let show_details = details.resolve(config.show_details);
            println!("{}", predict::run_predict(&session, &values, show_details)?);
            logger.log_shutdown(1);
        }
        Commands::Interactive { details } => {
            let show_details = details.resolve(config.show_details);
            let stdin = std::io::stdin();
            let count = interactive::run_interactive(&session, stdin.lock(), std::io::stdout(), show_details)?;
            logger.log_shutdown(count);
        }
    }

    if let Some(stats) = artifacts.classifier().stats() {
        debug!(
            total_inferences = stats.total_inferences,
            slow_inferences = stats.slow_inferences,
            "Inference statistics"
        );
    }

    Ok(())
}
