//! Reading consultation records and writing discharge notes.

use std::path::{Path, PathBuf};

use tracing::{debug, instrument};

use vetdischarge_shared::{ConsultationRecord, DischargeError, DischargeNote, Result};

/// Suffix replaced in the input file name to form the output file name.
const INPUT_SUFFIX: &str = ".json";

/// Replacement for [`INPUT_SUFFIX`].
const OUTPUT_SUFFIX: &str = "_output.json";

/// Read and parse a consultation record.
///
/// A missing or unreadable file is a [`DischargeError::FileAccess`]; content
/// that is not JSON, or lacks `patient`/`consultation`, is a
/// [`DischargeError::Format`].
#[instrument(skip_all, fields(path = %path.display()))]
pub fn load_record(path: &Path) -> Result<ConsultationRecord> {
    let content =
        std::fs::read_to_string(path).map_err(|e| DischargeError::file_access(path, e))?;

    let record: ConsultationRecord =
        serde_json::from_str(&content).map_err(|e| DischargeError::format(path, e.to_string()))?;

    debug!(
        patient = %record.patient.name,
        notes = record.consultation.clinical_notes.len(),
        procedures = record.consultation.treatment_items.procedures.len(),
        "record loaded"
    );
    Ok(record)
}

/// Write `note` as pretty-printed JSON (2-space indent), replacing any existing file.
///
/// The parent directory is not created.
#[instrument(skip_all, fields(path = %path.display()))]
pub fn save_note(path: &Path, note: &DischargeNote) -> Result<()> {
    let json = serde_json::to_string_pretty(note)
        .map_err(|e| DischargeError::format(path, e.to_string()))?;

    std::fs::write(path, json).map_err(|e| DischargeError::file_access(path, e))?;
    debug!(chars = note.discharge_note.len(), "discharge note written");
    Ok(())
}

/// Derive the output path: `<output_dir>/<input base name, ".json" → "_output.json">`.
pub fn output_path_for(input: &Path, output_dir: &Path) -> Result<PathBuf> {
    let base_name = input
        .file_name()
        .ok_or_else(|| {
            let e = std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "input path has no file name",
            );
            DischargeError::file_access(input, e)
        })?
        .to_string_lossy();

    Ok(output_dir.join(base_name.replace(INPUT_SUFFIX, OUTPUT_SUFFIX)))
}
