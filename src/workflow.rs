//! Load / show / save workflow as an explicit state machine.
//!
//! ```text
//! Idle ──load──▶ FileLoaded ──show──▶ ResultsShown ──save──▶ Saved
//! ```
//!
//! Loading is accepted from any state and discards earlier results. Showing
//! needs a loaded report, saving needs shown results. A rejected or failed
//! action leaves the session untouched.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::{
    error::{WorkflowError, WorkflowResult},
    nlp::{Analysis, Pipelines},
    record::{self, CaseRecord},
    report::{self, Report},
    store,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Idle,
    FileLoaded,
    ResultsShown,
    Saved,
}

/// Record plus the raw pipeline output it was built from.
#[derive(Debug, Clone, PartialEq)]
pub struct Results {
    pub record: CaseRecord,
    pub analysis: Analysis,
}

#[derive(Debug, Default)]
struct Session {
    state: SessionState,
    report: Option<Report>,
    results: Option<Results>,
    saved_to: Option<PathBuf>,
}

/// Drives one report at a time through the pipelines.
pub struct Workflow {
    pipelines: Pipelines,
    session: Session,
}

impl Workflow {
    pub fn new(pipelines: Pipelines) -> Self {
        Self {
            pipelines,
            session: Session::default(),
        }
    }

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    pub fn report(&self) -> Option<&Report> {
        self.session.report.as_ref()
    }

    pub fn results(&self) -> Option<&Results> {
        self.session.results.as_ref()
    }

    pub fn saved_to(&self) -> Option<&Path> {
        self.session.saved_to.as_deref()
    }

    /// Read a report, replacing whatever the session held.
    pub fn load_file(&mut self, path: &Path) -> WorkflowResult<&Report> {
        let report = report::read_report(path)?;
        info!(
            path = %path.display(),
            patient_id = report.patient_id(),
            "report loaded"
        );
        self.session = Session {
            state: SessionState::FileLoaded,
            report: None,
            results: None,
            saved_to: None,
        };
        Ok(&*self.session.report.insert(report))
    }

    /// Run both pipelines over the loaded report and build the record.
    pub fn show_results(&mut self) -> WorkflowResult<&Results> {
        let Some(report) = self.session.report.as_ref() else {
            warn!("show requested before a report was loaded");
            return Err(WorkflowError::NoReportLoaded);
        };
        let analysis = self.pipelines.analyse(report.content());
        let record = record::aggregate(
            report.patient_id(),
            report.file_name(),
            &analysis.spans,
            &analysis.category,
        );
        info!(
            path = %report.path().display(),
            patient_id = record.patient_id(),
            birads = record.birads_category(),
            entities = analysis.spans.len(),
            "results shown"
        );
        self.session.state = SessionState::ResultsShown;
        self.session.saved_to = None;
        Ok(&*self.session.results.insert(Results { record, analysis }))
    }

    /// Persist the current record to `path`.
    pub fn save_results(&mut self, path: &Path) -> WorkflowResult<&Path> {
        let Some(results) = self.session.results.as_ref() else {
            warn!("save requested before results were shown");
            return Err(WorkflowError::NoResults);
        };
        store::save_record(&results.record, path)?;
        self.session.state = SessionState::Saved;
        Ok(self.session.saved_to.insert(path.to_path_buf()).as_path())
    }
}
