//! BI-RADS category classification.

use std::{cmp::Ordering, path::Path, sync::Arc};

use indexmap::IndexMap;
use ndarray::{Array1, Array2};
use tracing::info;

use crate::{
    error::PipelineError,
    nlp::{
        features,
        pipeline::{self, TextcatArtifact},
    },
};

/// Label → confidence mapping in the order the pipeline declares its labels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryScores(IndexMap<String, f64>);

impl CategoryScores {
    pub fn get(&self, label: &str) -> Option<f64> {
        self.0.get(label).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(label, score)| (label.as_str(), *score))
    }

    /// Labels sorted by descending score. The sort is stable, so equal
    /// scores keep the pipeline's label order.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self.iter().collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        ranked
    }

    /// Highest scoring label; ties go to the first label in pipeline order.
    pub fn top_label(&self) -> Option<&str> {
        self.ranked().first().map(|(label, _)| *label)
    }
}

impl FromIterator<(String, f64)> for CategoryScores {
    fn from_iter<I: IntoIterator<Item = (String, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Trait for text classifier implementations.
pub trait TextClassifier: Send + Sync {
    fn scores(&self, text: &str) -> CategoryScores;

    /// Top label for `text`. Empty only for a classifier without labels,
    /// which loaded pipelines reject.
    fn classify(&self, text: &str) -> String {
        self.scores(text)
            .top_label()
            .map(str::to_string)
            .unwrap_or_default()
    }
}

/// Linear bag-of-ngrams model: one weight row per known ngram.
pub struct LinearTextcat {
    labels: Vec<String>,
    bias: Array1<f64>,
    vocab: IndexMap<String, usize>,
    weights: Array2<f64>,
    exclusive: bool,
}

impl LinearTextcat {
    pub fn from_artifact(artifact: TextcatArtifact) -> Result<Self, PipelineError> {
        let width = artifact.labels.len();
        if width == 0 {
            return Err(PipelineError::EmptyLabels);
        }

        let bias = if artifact.bias.is_empty() {
            Array1::zeros(width)
        } else if artifact.bias.len() == width {
            Array1::from(artifact.bias)
        } else {
            return Err(PipelineError::Shape {
                term: "bias".to_string(),
                expected: width,
                found: artifact.bias.len(),
            });
        };

        let mut vocab = IndexMap::with_capacity(artifact.weights.len());
        let mut weights = Array2::zeros((artifact.weights.len(), width));
        for (row, (term, values)) in artifact.weights.into_iter().enumerate() {
            if values.len() != width {
                return Err(PipelineError::Shape {
                    term,
                    expected: width,
                    found: values.len(),
                });
            }
            let key = term.to_lowercase();
            if vocab.contains_key(&key) {
                return Err(PipelineError::DuplicateTerm(term));
            }
            weights.row_mut(row).assign(&Array1::from(values));
            vocab.insert(key, row);
        }

        Ok(Self {
            labels: artifact.labels,
            bias,
            vocab,
            weights,
            exclusive: artifact.exclusive,
        })
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    fn logits(&self, text: &str) -> Array1<f64> {
        let mut logits = self.bias.clone();
        for gram in features::ngrams(text) {
            if let Some(&row) = self.vocab.get(&gram) {
                logits += &self.weights.row(row);
            }
        }
        logits
    }
}

impl TextClassifier for LinearTextcat {
    fn scores(&self, text: &str) -> CategoryScores {
        let logits = self.logits(text);
        let probabilities = if self.exclusive {
            softmax(&logits)
        } else {
            logits.mapv(sigmoid)
        };
        self.labels
            .iter()
            .cloned()
            .zip(probabilities.iter().copied())
            .collect()
    }
}

fn softmax(logits: &Array1<f64>) -> Array1<f64> {
    let max = logits.fold(f64::NEG_INFINITY, |acc, &value| acc.max(value));
    let exp = logits.mapv(|value| (value - max).exp());
    let total = exp.sum();
    exp / total
}

fn sigmoid(value: f64) -> f64 {
    1.0 / (1.0 + (-value).exp())
}

/// Load the BI-RADS classification pipeline from an artefact path.
pub async fn load_model(path: &Path) -> Result<Arc<dyn TextClassifier>, PipelineError> {
    let artifact = pipeline::load_pipeline(path).await?.into_textcat(path)?;
    info!(
        name = %artifact.meta.name,
        version = %artifact.meta.version,
        labels = artifact.labels.len(),
        "BIRADS pipeline loaded"
    );
    Ok(Arc::new(LinearTextcat::from_artifact(artifact)?) as Arc<dyn TextClassifier>)
}
