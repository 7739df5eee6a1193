//! Error types for pipeline loading and the report workflow.

use std::{io, path::PathBuf};

use thiserror::Error;

/// Failure to load a pretrained pipeline artefact. Fatal at startup.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("pipeline artefact not found at {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read pipeline artefact {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse pipeline artefact {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("expected a {expected} pipeline but {} holds a {found} pipeline", path.display())]
    KindMismatch {
        path: PathBuf,
        expected: &'static str,
        found: &'static str,
    },

    #[error("unknown entity label `{0}` in NER pipeline")]
    UnknownLabel(String),

    #[error("invalid pattern for label {label}: {source}")]
    Pattern {
        label: String,
        #[source]
        source: regex::Error,
    },

    #[error("classifier pipeline declares no labels")]
    EmptyLabels,

    #[error("weights for `{term}` have {found} entries, expected {expected}")]
    Shape {
        term: String,
        expected: usize,
        found: usize,
    },

    #[error("weights list `{0}` more than once; terms are matched case-insensitively")]
    DuplicateTerm(String),
}

/// Errors surfaced by the load / show / save workflow.
#[derive(Debug, Error)]
pub enum WorkflowError {
    #[error("no report loaded; load a file first")]
    NoReportLoaded,

    #[error("no results to save; show the results first")]
    NoResults,

    #[error("failed to read report {}: {source}", path.display())]
    ReadReport {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write results to {}: {source}", path.display())]
    WriteResults {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read results {}: {source}", path.display())]
    ReadResults {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialise results: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to deserialise results: {0}")]
    Deserialize(#[source] serde_json::Error),
}

impl WorkflowError {
    /// True when the action was rejected because an earlier step is missing.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::NoReportLoaded | Self::NoResults)
    }
}

pub type WorkflowResult<T> = Result<T, WorkflowError>;
