//! Serialized pipeline artefacts loaded from disk.
//!
//! An artefact is either a JSON file or a directory holding `model.json`.
//! The `kind` tag decides whether it describes an entity recogniser or a
//! text classifier.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use tracing::debug;

use crate::error::PipelineError;

const MODEL_FILE: &str = "model.json";

/// Descriptive metadata carried by every artefact.
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineMeta {
    pub name: String,
    pub version: String,
    #[serde(default)]
    pub lang: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A deserialized pipeline artefact.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PipelineArtifact {
    Ner(NerArtifact),
    Textcat(TextcatArtifact),
}

impl PipelineArtifact {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ner(_) => "ner",
            Self::Textcat(_) => "textcat",
        }
    }

    pub fn meta(&self) -> &PipelineMeta {
        match self {
            Self::Ner(artifact) => &artifact.meta,
            Self::Textcat(artifact) => &artifact.meta,
        }
    }

    pub fn into_ner(self, path: &Path) -> Result<NerArtifact, PipelineError> {
        match self {
            Self::Ner(artifact) => Ok(artifact),
            other => Err(PipelineError::KindMismatch {
                path: path.to_path_buf(),
                expected: "ner",
                found: other.kind(),
            }),
        }
    }

    pub fn into_textcat(self, path: &Path) -> Result<TextcatArtifact, PipelineError> {
        match self {
            Self::Textcat(artifact) => Ok(artifact),
            other => Err(PipelineError::KindMismatch {
                path: path.to_path_buf(),
                expected: "textcat",
                found: other.kind(),
            }),
        }
    }
}

/// Gazetteer and pattern rules for entity recognition.
#[derive(Debug, Clone, Deserialize)]
pub struct NerArtifact {
    pub meta: PipelineMeta,
    #[serde(default)]
    pub terms: Vec<TermGroup>,
    #[serde(default)]
    pub observations: Option<ObservationRules>,
    #[serde(default)]
    pub patterns: Vec<PatternRule>,
}

/// Phrases that always receive the same label.
#[derive(Debug, Clone, Deserialize)]
pub struct TermGroup {
    pub label: String,
    pub phrases: Vec<String>,
}

/// Observation phrases whose polarity depends on preceding cue words.
#[derive(Debug, Clone, Deserialize)]
pub struct ObservationRules {
    pub phrases: Vec<String>,
    #[serde(default)]
    pub negation_cues: Vec<String>,
    #[serde(default)]
    pub uncertainty_cues: Vec<String>,
    /// Number of words before the phrase searched for cues.
    #[serde(default = "default_cue_window")]
    pub window: usize,
}

/// Regex rule; capture group 1 is the span when present.
#[derive(Debug, Clone, Deserialize)]
pub struct PatternRule {
    pub label: String,
    pub regex: String,
}

fn default_cue_window() -> usize {
    5
}

/// Linear bag-of-ngrams text classifier weights.
#[derive(Debug, Clone, Deserialize)]
pub struct TextcatArtifact {
    pub meta: PipelineMeta,
    pub labels: Vec<String>,
    #[serde(default)]
    pub bias: Vec<f64>,
    /// Unigram or space-joined bigram → one weight per label.
    #[serde(default)]
    pub weights: IndexMap<String, Vec<f64>>,
    /// Mutually exclusive labels use a softmax, otherwise independent sigmoids.
    #[serde(default = "default_exclusive")]
    pub exclusive: bool,
}

fn default_exclusive() -> bool {
    true
}

/// Resolve the JSON document backing an artefact path.
pub fn artifact_file(path: &Path) -> PathBuf {
    if path.is_dir() {
        path.join(MODEL_FILE)
    } else {
        path.to_path_buf()
    }
}

/// Read and parse a pipeline artefact.
pub async fn load_pipeline(path: &Path) -> Result<PipelineArtifact, PipelineError> {
    let file = artifact_file(path);
    if !file.exists() {
        return Err(PipelineError::NotFound { path: file });
    }
    let raw = tokio::fs::read_to_string(&file)
        .await
        .map_err(|source| PipelineError::Read {
            path: file.clone(),
            source,
        })?;
    let artifact = parse_pipeline(&raw).map_err(|source| PipelineError::Parse {
        path: file.clone(),
        source,
    })?;
    let meta = artifact.meta();
    debug!(
        path = %file.display(),
        kind = artifact.kind(),
        name = %meta.name,
        version = %meta.version,
        "parsed pipeline artefact"
    );
    Ok(artifact)
}

/// Parse an artefact from its JSON text.
pub fn parse_pipeline(raw: &str) -> Result<PipelineArtifact, serde_json::Error> {
    serde_json::from_str(raw)
}
