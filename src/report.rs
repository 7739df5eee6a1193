//! Report file input and patient identifier derivation.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{WorkflowError, WorkflowResult};

/// A report read from disk, ready for analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    path: PathBuf,
    file_name: String,
    patient_id: String,
    content: String,
}

impl Report {
    pub fn new(path: impl Into<PathBuf>, raw: &str) -> Self {
        let path = path.into();
        Self {
            file_name: file_name(&path),
            patient_id: patient_id_from_path(&path),
            content: normalise_content(raw),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Read a UTF-8 report file whole.
pub fn read_report(path: &Path) -> WorkflowResult<Report> {
    let raw = std::fs::read_to_string(path).map_err(|source| WorkflowError::ReadReport {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(path = %path.display(), bytes = raw.len(), "read report");
    Ok(Report::new(path, &raw))
}

/// Replace the literal two-character sequence `\n` with a space.
///
/// Reports exported from the upstream system carry escaped newlines; real
/// newline characters are left alone.
pub fn normalise_content(raw: &str) -> String {
    raw.replace(r"\n", " ")
}

/// Base file name with everything from the first `.` removed.
pub fn patient_id_from_path(path: impl AsRef<Path>) -> String {
    file_name(path.as_ref())
        .split('.')
        .next()
        .unwrap_or_default()
        .to_string()
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
