//! Case record aggregation and its saved JSON shape.

use serde::{Deserialize, Serialize};

use crate::nlp::ner::{EntityLabel, Span};

/// Combined NER and BI-RADS results for one report. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CaseRecord {
    patient_id: String,
    source_reference: String,
    anatomy: Vec<String>,
    observations_present: Vec<String>,
    observations_absent: Vec<String>,
    observations_uncertain: Vec<String>,
    birads_category: String,
}

impl CaseRecord {
    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn source_reference(&self) -> &str {
        &self.source_reference
    }

    pub fn anatomy(&self) -> &[String] {
        &self.anatomy
    }

    pub fn observations_present(&self) -> &[String] {
        &self.observations_present
    }

    pub fn observations_absent(&self) -> &[String] {
        &self.observations_absent
    }

    pub fn observations_uncertain(&self) -> &[String] {
        &self.observations_uncertain
    }

    pub fn birads_category(&self) -> &str {
        &self.birads_category
    }
}

/// Bucket entity spans by label and build the record.
///
/// Spans keep their relative order within a bucket. Labels outside the four
/// buckets, `IMPRESSION` included, are dropped. No validation is applied:
/// empty identifiers and categories are legal.
pub fn aggregate(
    patient_id: &str,
    source_reference: &str,
    spans: &[Span],
    category: &str,
) -> CaseRecord {
    let mut record = CaseRecord {
        patient_id: patient_id.to_string(),
        source_reference: source_reference.to_string(),
        anatomy: Vec::new(),
        observations_present: Vec::new(),
        observations_absent: Vec::new(),
        observations_uncertain: Vec::new(),
        birads_category: category.to_string(),
    };
    for span in spans {
        let bucket = match span.entity_label() {
            Some(EntityLabel::Anatomy) => &mut record.anatomy,
            Some(EntityLabel::ObservationPresent) => &mut record.observations_present,
            Some(EntityLabel::ObservationAbsent) => &mut record.observations_absent,
            Some(EntityLabel::ObservationUncertain) => &mut record.observations_uncertain,
            Some(EntityLabel::Impression) | None => continue,
        };
        bucket.push(span.text.clone());
    }
    record
}

/// On-disk results document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultsDocument {
    pub patient_id: String,
    #[serde(default)]
    pub source_reference: String,
    pub ner_results: NerResults,
    pub birads_result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NerResults {
    pub anatomy: Vec<String>,
    pub observation_present: Vec<String>,
    pub observation_absent: Vec<String>,
    pub observation_uncertain: Vec<String>,
}

impl From<&CaseRecord> for ResultsDocument {
    fn from(record: &CaseRecord) -> Self {
        ResultsDocument {
            patient_id: record.patient_id.clone(),
            source_reference: record.source_reference.clone(),
            ner_results: NerResults {
                anatomy: record.anatomy.clone(),
                observation_present: record.observations_present.clone(),
                observation_absent: record.observations_absent.clone(),
                observation_uncertain: record.observations_uncertain.clone(),
            },
            birads_result: record.birads_category.clone(),
        }
    }
}

impl From<ResultsDocument> for CaseRecord {
    fn from(document: ResultsDocument) -> Self {
        CaseRecord {
            patient_id: document.patient_id,
            source_reference: document.source_reference,
            anatomy: document.ner_results.anatomy,
            observations_present: document.ner_results.observation_present,
            observations_absent: document.ner_results.observation_absent,
            observations_uncertain: document.ner_results.observation_uncertain,
            birads_category: document.birads_result,
        }
    }
}
