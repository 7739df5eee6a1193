//! Natural language processing orchestration layer.

pub mod features;
pub mod ner;
pub mod pipeline;
pub mod textcat;

use std::sync::Arc;

use tracing::{debug, info};

use crate::{config::Settings, error::PipelineError};

use self::{
    ner::{Ner, Span},
    textcat::{CategoryScores, TextClassifier},
};

/// The two pretrained pipelines, loaded once and shared read-only.
#[derive(Clone)]
pub struct Pipelines {
    ner: Arc<dyn Ner>,
    classifier: Arc<dyn TextClassifier>,
}

/// Raw pipeline output for one report.
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub spans: Vec<Span>,
    pub scores: CategoryScores,
    pub category: String,
}

impl Pipelines {
    pub fn new(ner: Arc<dyn Ner>, classifier: Arc<dyn TextClassifier>) -> Self {
        Self { ner, classifier }
    }

    /// Run entity extraction and classification independently over `text`.
    pub fn analyse(&self, text: &str) -> Analysis {
        let spans = self.ner.extract(text);
        let scores = self.classifier.scores(text);
        let category = scores.top_label().unwrap_or_default().to_string();
        debug!(spans = spans.len(), %category, "analysed report");
        Analysis {
            spans,
            scores,
            category,
        }
    }
}

/// Load both pipelines from the configured locations.
pub async fn load_pipelines(settings: &Settings) -> Result<Pipelines, PipelineError> {
    info!(path = %settings.ner_model_path.display(), "NER pipeline loading");
    let ner = ner::load_model(&settings.ner_model_path).await?;
    info!(path = %settings.birads_model_path.display(), "BIRADS pipeline loading");
    let classifier = textcat::load_model(&settings.birads_model_path).await?;
    Ok(Pipelines::new(ner, classifier))
}
