//! CLI entry-point for analysing a report and saving the results.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{config::Settings, nlp, store, workflow::Workflow};

/// Args for the `save` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Plain-text report file.
    pub report: PathBuf,
    /// Destination JSON file; defaults to `<OUTPUTS_DIR>/<patient id>.json`.
    #[arg(long)]
    pub out: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let pipelines = nlp::load_pipelines(&settings)
        .await
        .context("loading pretrained pipelines")?;
    let mut workflow = Workflow::new(pipelines);
    workflow.load_file(&args.report)?;
    let results = workflow.show_results()?;

    let destination = match args.out {
        Some(path) => path,
        None => store::default_output_path(settings.ensure_outputs_dir()?, &results.record),
    };
    let saved = workflow.save_results(&destination)?;
    println!("Successfully saved results at {}", saved.display());
    Ok(())
}
