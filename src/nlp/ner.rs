//! Rule-backed entity recognition over radiology report text.

use std::{fmt, path::Path, sync::Arc};

use regex::Regex;
use tracing::info;

use crate::{
    error::PipelineError,
    nlp::{
        features,
        pipeline::{self, NerArtifact},
    },
};

/// Entity labels understood by the results record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityLabel {
    Anatomy,
    ObservationPresent,
    ObservationAbsent,
    ObservationUncertain,
    Impression,
}

impl EntityLabel {
    pub const ALL: [EntityLabel; 5] = [
        Self::Anatomy,
        Self::ObservationPresent,
        Self::ObservationAbsent,
        Self::ObservationUncertain,
        Self::Impression,
    ];

    /// Tag emitted by the pipeline.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Anatomy => "ANAT",
            Self::ObservationPresent => "OBS-PRESENT",
            Self::ObservationAbsent => "OBS-ABSENT",
            Self::ObservationUncertain => "OBS-UNCERTAIN",
            Self::Impression => "IMPRESSION",
        }
    }

    /// Long-form name, also accepted by [`EntityLabel::from_tag`].
    pub fn name(self) -> &'static str {
        match self {
            Self::Anatomy => "ANATOMY",
            Self::ObservationPresent => "OBSERVATION_PRESENT",
            Self::ObservationAbsent => "OBSERVATION_ABSENT",
            Self::ObservationUncertain => "OBSERVATION_UNCERTAIN",
            Self::Impression => "IMPRESSION",
        }
    }

    /// Exact match against the short tag or the long-form name.
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|label| label.tag() == tag || label.name() == tag)
    }

    /// Highlight colour used when annotated reports are displayed.
    pub fn color(self) -> &'static str {
        match self {
            Self::Anatomy => "#A020F0",
            Self::ObservationPresent => "#30D5C8",
            Self::ObservationAbsent => "#FFFF00",
            Self::ObservationUncertain => "#808080",
            Self::Impression => "#FF0000",
        }
    }
}

impl fmt::Display for EntityLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.tag())
    }
}

/// Extracted entity span with byte offsets relative to the source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub label: String,
    pub text: String,
}

impl Span {
    pub fn new(start: usize, end: usize, label: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            start,
            end,
            label: label.into(),
            text: text.into(),
        }
    }

    /// Known label for this span, if any.
    pub fn entity_label(&self) -> Option<EntityLabel> {
        EntityLabel::from_tag(&self.label)
    }
}

/// Trait for NER implementations.
pub trait Ner: Send + Sync {
    fn extract(&self, text: &str) -> Vec<Span>;
}

struct TermMatcher {
    label: EntityLabel,
    regex: Regex,
}

struct ObservationMatcher {
    regex: Regex,
    negation_cues: Vec<Vec<String>>,
    uncertainty_cues: Vec<Vec<String>>,
    window: usize,
}

impl ObservationMatcher {
    fn polarity(&self, text: &str, start: usize) -> EntityLabel {
        let sentence = features::sentence_start(text, start);
        let preceding = features::tokens(&text[sentence..start]);
        let window = &preceding[preceding.len().saturating_sub(self.window)..];
        let has_cue = |cues: &[Vec<String>]| {
            cues.iter()
                .any(|cue| features::contains_sequence(window, cue))
        };
        if has_cue(&self.negation_cues) {
            EntityLabel::ObservationAbsent
        } else if has_cue(&self.uncertainty_cues) {
            EntityLabel::ObservationUncertain
        } else {
            EntityLabel::ObservationPresent
        }
    }
}

struct Candidate {
    start: usize,
    end: usize,
    label: EntityLabel,
}

/// Gazetteer, cue-polarity and regex rules compiled from a pipeline artefact.
pub struct RuleNer {
    terms: Vec<TermMatcher>,
    observations: Option<ObservationMatcher>,
    patterns: Vec<TermMatcher>,
}

impl RuleNer {
    pub fn from_artifact(artifact: NerArtifact) -> Result<Self, PipelineError> {
        let mut terms = Vec::new();
        for group in artifact.terms {
            let label = known_label(&group.label)?;
            let regex = features::phrase_regex(&group.phrases).map_err(|source| {
                PipelineError::Pattern {
                    label: group.label.clone(),
                    source,
                }
            })?;
            if let Some(regex) = regex {
                terms.push(TermMatcher { label, regex });
            }
        }

        let observations = match artifact.observations {
            Some(rules) => features::phrase_regex(&rules.phrases)
                .map_err(|source| PipelineError::Pattern {
                    label: "observation".to_string(),
                    source,
                })?
                .map(|regex| ObservationMatcher {
                    regex,
                    negation_cues: tokenise_cues(&rules.negation_cues),
                    uncertainty_cues: tokenise_cues(&rules.uncertainty_cues),
                    window: rules.window,
                }),
            None => None,
        };

        let mut patterns = Vec::new();
        for rule in artifact.patterns {
            let label = known_label(&rule.label)?;
            let regex = Regex::new(&rule.regex).map_err(|source| PipelineError::Pattern {
                label: rule.label.clone(),
                source,
            })?;
            patterns.push(TermMatcher { label, regex });
        }

        Ok(Self {
            terms,
            observations,
            patterns,
        })
    }
}

impl Ner for RuleNer {
    fn extract(&self, text: &str) -> Vec<Span> {
        let mut candidates = Vec::new();
        for matcher in &self.terms {
            candidates.extend(matcher.regex.find_iter(text).map(|m| Candidate {
                start: m.start(),
                end: m.end(),
                label: matcher.label,
            }));
        }
        if let Some(observations) = &self.observations {
            candidates.extend(observations.regex.find_iter(text).map(|m| Candidate {
                start: m.start(),
                end: m.end(),
                label: observations.polarity(text, m.start()),
            }));
        }
        for matcher in &self.patterns {
            for caps in matcher.regex.captures_iter(text) {
                let Some(m) = caps.get(1).or_else(|| caps.get(0)) else {
                    continue;
                };
                if m.is_empty() {
                    continue;
                }
                candidates.push(Candidate {
                    start: m.start(),
                    end: m.end(),
                    label: matcher.label,
                });
            }
        }
        resolve_overlaps(text, candidates)
    }
}

/// Keep the leftmost, then longest, of any overlapping candidates.
fn resolve_overlaps(text: &str, mut candidates: Vec<Candidate>) -> Vec<Span> {
    candidates.sort_by(|a, b| a.start.cmp(&b.start).then(b.end.cmp(&a.end)));
    let mut spans = Vec::with_capacity(candidates.len());
    let mut covered = 0;
    for candidate in candidates {
        if candidate.start < covered {
            continue;
        }
        covered = candidate.end;
        spans.push(Span::new(
            candidate.start,
            candidate.end,
            candidate.label.tag(),
            &text[candidate.start..candidate.end],
        ));
    }
    spans
}

fn known_label(tag: &str) -> Result<EntityLabel, PipelineError> {
    EntityLabel::from_tag(tag).ok_or_else(|| PipelineError::UnknownLabel(tag.to_string()))
}

fn tokenise_cues(cues: &[String]) -> Vec<Vec<String>> {
    cues.iter()
        .map(|cue| features::tokens(cue))
        .filter(|cue| !cue.is_empty())
        .collect()
}

/// Load the rule-backed NER pipeline from an artefact path.
pub async fn load_model(path: &Path) -> Result<Arc<dyn Ner>, PipelineError> {
    let artifact = pipeline::load_pipeline(path).await?.into_ner(path)?;
    info!(name = %artifact.meta.name, version = %artifact.meta.version, "NER pipeline loaded");
    Ok(Arc::new(RuleNer::from_artifact(artifact)?) as Arc<dyn Ner>)
}
