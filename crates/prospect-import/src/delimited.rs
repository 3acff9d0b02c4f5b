//! CSV and TXT readers.

use crate::{FileFormat, ImportBatch};
use prospect_core::ProspectError;
use std::path::Path;

/// Read a CSV file into rows of cells.
///
/// No header row is assumed and record widths may vary — exports in the
/// wild pad rows unevenly, and narrow rows are filtered later by the
/// column-width check.
pub(crate) fn csv_rows(path: &Path) -> Result<Vec<Vec<String>>, ProspectError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| ProspectError::Parse(format!("failed to open CSV: {e}")))?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ProspectError::Parse(format!("bad CSV record: {e}")))?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}

/// Read a TXT file: every trimmed non-blank line is one candidate.
pub(crate) fn txt_batch(path: &Path) -> Result<ImportBatch, ProspectError> {
    let text = std::fs::read_to_string(path)?;
    let mut rows_scanned = 0;
    let mut candidates = Vec::new();
    for line in text.lines() {
        rows_scanned += 1;
        let line = line.trim();
        if !line.is_empty() {
            candidates.push(line.to_string());
        }
    }
    Ok(ImportBatch {
        format: FileFormat::Txt,
        rows_scanned,
        pairs_extracted: 0,
        candidates,
    })
}
