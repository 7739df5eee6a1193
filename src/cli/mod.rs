//! Command-line interface wiring for mammo-lingua.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

use crate::config::Settings;

pub mod analyze;
pub mod batch;
pub mod labels;
pub mod save;

/// Top-level CLI definition.
#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Radiology report entity recognition and BI-RADS classification",
    long_about = None
)]
pub struct Cli {
    /// Override the NER pipeline location.
    #[arg(long, global = true)]
    ner_model: Option<PathBuf>,
    /// Override the BI-RADS classification pipeline location.
    #[arg(long, global = true)]
    birads_model: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    /// Parse CLI arguments from the environment.
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Dispatch the selected sub-command.
    pub async fn dispatch(self, settings: Settings) -> Result<()> {
        let settings = settings.with_model_overrides(self.ner_model, self.birads_model);
        match self.command {
            Commands::Analyze(args) => analyze::run(args, settings).await,
            Commands::Save(args) => save::run(args, settings).await,
            Commands::Batch(args) => batch::run(args, settings).await,
            Commands::Labels => labels::run(),
        }
    }
}

/// Supported sub-commands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Extract entities and predict the BI-RADS category of one report.
    Analyze(analyze::Args),
    /// Analyse one report and save the results as JSON.
    Save(save::Args),
    /// Analyse and save every `.txt` report under a directory.
    Batch(batch::Args),
    /// List the entity labels and their highlight colours.
    Labels,
}

/// Output rendering for analysis results.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum OutputFormat {
    /// Labelled result boxes.
    Text,
    /// The saved JSON document.
    Json,
}
