//! Persistence of case records as pretty-printed JSON documents.

use std::{
    io::Write,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::info;

use crate::{
    error::{WorkflowError, WorkflowResult},
    record::{CaseRecord, ResultsDocument},
};

const INDENT: &[u8] = b"    ";

/// Serialise a record with four-space indentation. Non-ASCII text is kept
/// literally.
pub fn render_json(record: &CaseRecord) -> WorkflowResult<Vec<u8>> {
    let document = ResultsDocument::from(record);
    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    document
        .serialize(&mut serializer)
        .map_err(WorkflowError::Serialize)?;
    Ok(buffer)
}

/// Write `record` to `path`. The document goes to a temporary file beside
/// the destination and is renamed into place, so a failed save never leaves
/// a partial file.
pub fn save_record(record: &CaseRecord, path: &Path) -> WorkflowResult<()> {
    let bytes = render_json(record)?;
    let write_error = |source| WorkflowError::WriteResults {
        path: path.to_path_buf(),
        source,
    };
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut temp = tempfile::Builder::new()
        .prefix(".results")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(write_error)?;
    temp.write_all(&bytes).map_err(write_error)?;
    temp.as_file().sync_all().map_err(write_error)?;
    temp.persist(path).map_err(|err| write_error(err.error))?;
    info!(path = %path.display(), patient_id = record.patient_id(), "saved results");
    Ok(())
}

/// `<outputs_dir>/<patient_id>.json`; a record without a patient id falls
/// back to `report.json` rather than a hidden `.json` file.
pub fn default_output_path(outputs_dir: &Path, record: &CaseRecord) -> PathBuf {
    let stem = match record.patient_id() {
        "" => "report",
        id => id,
    };
    outputs_dir.join(format!("{stem}.json"))
}

/// Read a previously saved results document.
pub fn load_record(path: &Path) -> WorkflowResult<CaseRecord> {
    let raw = std::fs::read_to_string(path).map_err(|source| WorkflowError::ReadResults {
        path: path.to_path_buf(),
        source,
    })?;
    let document: ResultsDocument =
        serde_json::from_str(&raw).map_err(WorkflowError::Deserialize)?;
    Ok(document.into())
}
