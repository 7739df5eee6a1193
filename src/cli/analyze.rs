//! CLI entry-point for analysing a single report.

use std::{fmt::Write as _, io::Write as _, path::PathBuf};

use anyhow::{Context, Result};
use clap::Args as ClapArgs;
use tracing::instrument;

use crate::{
    cli::OutputFormat,
    config::Settings,
    nlp,
    store,
    workflow::{Results, Workflow},
};

/// Args for the `analyze` command.
#[derive(Debug, Clone, ClapArgs)]
pub struct Args {
    /// Plain-text report file.
    pub report: PathBuf,
    /// Output rendering.
    #[arg(long, default_value = "text", value_enum)]
    pub format: OutputFormat,
    /// List every extracted span with its offsets and label.
    #[arg(long)]
    pub spans: bool,
    /// Show the score of every BI-RADS category.
    #[arg(long)]
    pub scores: bool,
}

#[instrument(skip(settings))]
pub async fn run(args: Args, settings: Settings) -> Result<()> {
    let pipelines = nlp::load_pipelines(&settings)
        .await
        .context("loading pretrained pipelines")?;
    let mut workflow = Workflow::new(pipelines);
    workflow.load_file(&args.report)?;
    let results = workflow.show_results()?;

    let mut stdout = std::io::stdout().lock();
    match args.format {
        OutputFormat::Text => {
            stdout.write_all(render_text(results, args.spans, args.scores).as_bytes())?
        }
        OutputFormat::Json => {
            stdout.write_all(&store::render_json(&results.record)?)?;
            writeln!(stdout)?;
        }
    }
    Ok(())
}

/// Render results the way the result boxes lay them out.
pub fn render_text(results: &Results, spans: bool, scores: bool) -> String {
    let record = &results.record;
    let mut out = String::new();
    let boxes: [(&str, String); 6] = [
        ("Patient ID", record.patient_id().to_string()),
        ("ANATOMY", record.anatomy().join(", ")),
        ("OBSERVATION-PRESENT", record.observations_present().join(", ")),
        ("OBSERVATION-ABSENT", record.observations_absent().join(", ")),
        ("OBS-UNCERTAIN", record.observations_uncertain().join(", ")),
        ("PREDICTED BIRADS", record.birads_category().to_string()),
    ];
    for (title, value) in boxes {
        let _ = writeln!(out, "{title:<20} {value}");
    }

    if spans {
        let _ = writeln!(out, "\nEntities:");
        for span in &results.analysis.spans {
            let _ = writeln!(
                out,
                "  {:>5}..{:<5} {:<14} {}",
                span.start, span.end, span.label, span.text
            );
        }
    }

    if scores {
        let _ = writeln!(out, "\nBI-RADS scores:");
        for (label, score) in results.analysis.scores.ranked() {
            let _ = writeln!(out, "  {label:<6} {score:.4}");
        }
    }
    out
}
