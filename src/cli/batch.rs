//! CLI entry-point for analysing a directory of reports.

use std::{
    collections::HashSet,
    path::{Path, PathBuf},
};

use anyhow::{bail, Context, Result};
use clap::Args as ClapArgs;
use tracing::{info, instrument, warn};
use walkdir::WalkDir;

use crate::{
    config::Settings,
    nlp::{self, Pipelines},
    store,
    workflow::Workflow,
};

/// Args for the `batch` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Directory searched recursively for `.txt` reports.
    pub dir: PathBuf,
    /// Destination directory; defaults to `OUTPUTS_DIR`.
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let pipelines = nlp::load_pipelines(&settings)
        .await
        .context("loading pretrained pipelines")?;
    let out_dir = match args.out_dir {
        Some(dir) => {
            std::fs::create_dir_all(&dir)
                .with_context(|| format!("creating {}", dir.display()))?;
            dir
        }
        None => settings.ensure_outputs_dir()?.to_path_buf(),
    };

    let reports = collect_reports(&args.dir);
    info!(count = reports.len(), dir = %args.dir.display(), "found reports");

    let mut written = HashSet::new();
    let mut saved = 0usize;
    let mut failed = 0usize;
    for report in &reports {
        match process(&pipelines, report, &out_dir, &mut written) {
            Ok(path) => {
                saved += 1;
                println!("{} -> {}", report.display(), path.display());
            }
            Err(err) => {
                failed += 1;
                warn!(path = %report.display(), error = %err, "skipping report");
            }
        }
    }

    println!("Saved {saved} of {} reports ({failed} failed)", reports.len());
    Ok(())
}

/// `.txt` files under `dir`, in file-name order.
pub fn collect_reports(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                warn!(error = %err, "unreadable directory entry");
                None
            }
        })
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|path| path.extension().and_then(|ext| ext.to_str()) == Some("txt"))
        .collect()
}

/// Analyse and save one report. Reports sharing a patient id would land on
/// the same file, so only the first of them is saved in a run.
fn process(
    pipelines: &Pipelines,
    report: &Path,
    out_dir: &Path,
    written: &mut HashSet<PathBuf>,
) -> Result<PathBuf> {
    let mut workflow = Workflow::new(pipelines.clone());
    workflow.load_file(report)?;
    let destination = store::default_output_path(out_dir, &workflow.show_results()?.record);
    if written.contains(&destination) {
        bail!(
            "{} was already written by another report in this batch",
            destination.display()
        );
    }
    workflow.save_results(&destination)?;
    written.insert(destination.clone());
    Ok(destination)
}
