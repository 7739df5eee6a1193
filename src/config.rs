//! Runtime configuration utilities for mammo-lingua.

use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::Context;

/// Application configuration resolved from `.env` and defaults.
///
/// `MODELS_DIR` only seeds the default model paths; it is not kept.
#[derive(Debug, Clone)]
pub struct Settings {
    /// NER pipeline artefact (directory with `model.json`, or the file itself).
    pub ner_model_path: PathBuf,
    /// BI-RADS text classification pipeline artefact.
    pub birads_model_path: PathBuf,
    /// Default destination for saved results.
    pub outputs_dir: PathBuf,
}

impl Settings {
    /// Load configuration from environment with reasonable defaults.
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        let models_dir = env::var("MODELS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data/nlp_models"));
        let ner_model_path = env::var("NER_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| models_dir.join("ner_model"));
        let birads_model_path = env::var("BIRADS_MODEL_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| models_dir.join("classification_model"));
        let outputs_dir = env::var("OUTPUTS_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./outputs"));

        Ok(Self {
            ner_model_path,
            birads_model_path,
            outputs_dir,
        })
    }

    /// Apply command-line overrides for the pipeline locations.
    pub fn with_model_overrides(
        mut self,
        ner_model: Option<PathBuf>,
        birads_model: Option<PathBuf>,
    ) -> Self {
        if let Some(path) = ner_model {
            self.ner_model_path = path;
        }
        if let Some(path) = birads_model {
            self.birads_model_path = path;
        }
        self
    }

    /// Create the outputs folder on first use.
    pub fn ensure_outputs_dir(&self) -> anyhow::Result<&Path> {
        std::fs::create_dir_all(&self.outputs_dir).context("creating outputs dir")?;
        Ok(&self.outputs_dir)
    }
}
