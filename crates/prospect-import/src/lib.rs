//! # prospect-import
//!
//! Converts one user-supplied file into a deduplicated list of canonical
//! phone numbers, or fails with a descriptive reason.
//!
//! Spreadsheet and CSV files follow a fixed column convention: column A
//! (index 0) is a de-duplication key — the company's CNPJ — and column T
//! (index 19) is the phone value. TXT files carry one candidate per line
//! with no key column.

mod delimited;
mod sheet;

use prospect_core::{phone, ProspectError};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// De-duplication key column (column A).
pub const KEY_COLUMN_INDEX: usize = 0;

/// Phone value column (column T).
pub const PHONE_COLUMN_INDEX: usize = 19;

/// Recognized input formats, dispatched on file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    /// `.xlsx` / `.xls` workbooks.
    Spreadsheet,
    /// `.csv`, comma-separated, no header convention.
    Csv,
    /// `.txt`, one candidate per line.
    Txt,
}

impl FileFormat {
    /// Detect the format from the file name. Case-insensitive.
    pub fn detect(path: &Path) -> Result<Self, ProspectError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "xlsx" | "xls" => Ok(Self::Spreadsheet),
            "csv" => Ok(Self::Csv),
            "txt" => Ok(Self::Txt),
            _ => Err(ProspectError::UnsupportedFormat),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Self::Spreadsheet => "Excel",
            Self::Csv => "CSV",
            Self::Txt => "TXT",
        }
    }
}

/// Transient result of parsing one file, consumed straight into the
/// normalization step.
#[derive(Debug)]
pub struct ImportBatch {
    pub format: FileFormat,
    /// Raw rows (or lines) scanned.
    pub rows_scanned: usize,
    /// Qualifying non-empty key/phone pairs (spreadsheet/CSV only).
    pub pairs_extracted: usize,
    pub candidates: Vec<String>,
}

impl ImportBatch {
    /// Fail with a format-specific message when the file yielded nothing.
    fn ensure_data(&self) -> Result<(), ProspectError> {
        let empty = match self.format {
            FileFormat::Spreadsheet | FileFormat::Csv => {
                self.pairs_extracted == 0 && self.candidates.is_empty()
            }
            FileFormat::Txt => self.candidates.is_empty(),
        };
        if !empty {
            return Ok(());
        }
        let msg = match self.format {
            FileFormat::Spreadsheet | FileFormat::Csv => format!(
                "no CNPJ/phone pair found in columns A and T of the {} file; \
                 check that the columns are right and the data is present",
                self.format.label()
            ),
            FileFormat::Txt => {
                "no phone number found in the TXT file; \
                 make sure there is one number per line"
                    .to_string()
            }
        };
        Err(ProspectError::NoDataFound(msg))
    }
}

/// Terminal report of one import run.
#[derive(Debug)]
pub struct ImportOutcome {
    /// New canonical numbers, in first-seen order, not yet in the active list.
    pub added: Vec<String>,
    /// Candidates that survived normalization and the viability filter.
    pub valid: usize,
}

impl ImportOutcome {
    /// Valid numbers were found but every one was already on the list.
    pub fn nothing_new(&self) -> bool {
        self.added.is_empty() && self.valid > 0
    }
}

/// Parse a file into raw candidates without normalizing them.
pub fn parse_file(path: &Path) -> Result<ImportBatch, ProspectError> {
    let format = FileFormat::detect(path)?;
    let batch = match format {
        FileFormat::Spreadsheet => collect_pairs(format, sheet::rows(path)?),
        FileFormat::Csv => collect_pairs(format, delimited::csv_rows(path)?),
        FileFormat::Txt => delimited::txt_batch(path)?,
    };
    debug!(
        "parsed {:?}: {} rows, {} pairs, {} candidates",
        format, batch.rows_scanned, batch.pairs_extracted, batch.candidates.len()
    );
    Ok(batch)
}

/// Walk spreadsheet/CSV rows, extracting the key/phone pair per row.
///
/// A row qualifies only when it is wide enough to hold both columns and
/// neither trimmed cell is empty. The first phone per key wins; later
/// rows with an already-seen key are skipped.
fn collect_pairs(format: FileFormat, rows: Vec<Vec<String>>) -> ImportBatch {
    let widest = KEY_COLUMN_INDEX.max(PHONE_COLUMN_INDEX);
    let mut seen_keys: HashSet<String> = HashSet::new();
    let mut pairs_extracted = 0;
    let mut candidates = Vec::new();
    let rows_scanned = rows.len();

    for row in rows {
        if row.len() <= widest {
            continue;
        }
        let key = row[KEY_COLUMN_INDEX].trim();
        let phone = row[PHONE_COLUMN_INDEX].trim();
        if key.is_empty() || phone.is_empty() {
            continue;
        }
        pairs_extracted += 1;
        if seen_keys.insert(key.to_string()) {
            candidates.push(phone.to_string());
        }
    }

    ImportBatch {
        format,
        rows_scanned,
        pairs_extracted,
        candidates,
    }
}

/// Normalize candidates and select the ones not already on the list.
///
/// Every candidate is canonicalized, filtered through the viability
/// threshold, deduplicated against the other candidates and against
/// `existing`, preserving first-seen order. Fails with `NoValidPhones`
/// when nothing survives normalization.
pub fn select_new(candidates: &[String], existing: &[String]) -> Result<ImportOutcome, ProspectError> {
    let viable: Vec<String> = candidates
        .iter()
        .map(|c| phone::canonicalize(c))
        .filter(|c| phone::is_viable(c))
        .collect();

    if viable.is_empty() {
        return Err(ProspectError::NoValidPhones);
    }

    let mut known: HashSet<String> = existing.iter().cloned().collect();
    let mut added = Vec::new();
    let valid = viable.len();
    for number in viable {
        if known.insert(number.clone()) {
            added.push(number);
        }
    }

    Ok(ImportOutcome { added, valid })
}

/// Run the whole pipeline: parse, check for data, normalize, dedup.
pub fn import_file(path: &Path, existing: &[String]) -> Result<ImportOutcome, ProspectError> {
    let batch = parse_file(path)?;
    batch.ensure_data()?;
    select_new(&batch.candidates, existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    /// A CSV row with `phone` in column T and `key` in column A.
    fn wide_row(key: &str, phone: &str) -> String {
        let mut cols = vec![String::new(); PHONE_COLUMN_INDEX + 1];
        cols[KEY_COLUMN_INDEX] = key.to_string();
        cols[PHONE_COLUMN_INDEX] = phone.to_string();
        cols.join(",")
    }

    fn csv_file(rows: &[String]) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
        for row in rows {
            writeln!(file, "{row}").unwrap();
        }
        file.flush().unwrap();
        file
    }

    fn txt_file(lines: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        write!(file, "{lines}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_detect_formats() {
        assert_eq!(
            FileFormat::detect(Path::new("a.XLSX")).unwrap(),
            FileFormat::Spreadsheet
        );
        assert_eq!(
            FileFormat::detect(Path::new("a.xls")).unwrap(),
            FileFormat::Spreadsheet
        );
        assert_eq!(FileFormat::detect(Path::new("a.csv")).unwrap(), FileFormat::Csv);
        assert_eq!(FileFormat::detect(Path::new("a.txt")).unwrap(), FileFormat::Txt);
        assert!(matches!(
            FileFormat::detect(Path::new("a.pdf")),
            Err(ProspectError::UnsupportedFormat)
        ));
        assert!(matches!(
            FileFormat::detect(Path::new("noext")),
            Err(ProspectError::UnsupportedFormat)
        ));
    }

    #[test]
    fn test_csv_first_phone_per_key_wins() {
        let file = csv_file(&[
            wide_row("12.345.678/0001-00", "11987654321"),
            wide_row("12.345.678/0001-00", "11900000000"),
            wide_row("98.765.432/0001-00", "1133334444"),
        ]);
        let outcome = import_file(file.path(), &[]).unwrap();
        assert_eq!(outcome.added, vec!["+5511987654321", "+551133334444"]);
        assert_eq!(outcome.valid, 2);
    }

    #[test]
    fn test_csv_narrow_and_empty_rows_skipped() {
        let file = csv_file(&[
            "just,two".to_string(),
            wide_row("", "11987654321"),
            wide_row("key-1", ""),
            wide_row("key-2", "11987654321"),
        ]);
        let outcome = import_file(file.path(), &[]).unwrap();
        assert_eq!(outcome.added, vec!["+5511987654321"]);
    }

    #[test]
    fn test_csv_without_pairs_is_no_data_found() {
        let file = csv_file(&["a,b,c".to_string(), "short,row".to_string()]);
        let err = import_file(file.path(), &[]).unwrap_err();
        assert!(matches!(err, ProspectError::NoDataFound(_)));
    }

    #[test]
    fn test_txt_one_candidate_per_line() {
        let file = txt_file("11987654321\n\n  1133334444  \n");
        let outcome = import_file(file.path(), &[]).unwrap();
        assert_eq!(outcome.added, vec!["+5511987654321", "+551133334444"]);
    }

    #[test]
    fn test_txt_blank_is_no_data_found() {
        let file = txt_file("\n   \n\n");
        let err = import_file(file.path(), &[]).unwrap_err();
        assert!(matches!(err, ProspectError::NoDataFound(_)));
    }

    #[test]
    fn test_unsupported_extension() {
        let err = import_file(Path::new("numbers.pdf"), &[]).unwrap_err();
        assert!(matches!(err, ProspectError::UnsupportedFormat));
    }

    #[test]
    fn test_existing_numbers_are_not_re_added() {
        let file = txt_file("11987654321\n1133334444\n");
        let existing = vec!["+5511987654321".to_string()];
        let outcome = import_file(file.path(), &existing).unwrap();
        assert_eq!(outcome.added, vec!["+551133334444"]);
        assert_eq!(outcome.valid, 2);
        assert!(!outcome.nothing_new());
    }

    #[test]
    fn test_all_duplicates_is_neutral_nothing_new() {
        let file = txt_file("11987654321\n");
        let existing = vec!["+5511987654321".to_string()];
        let outcome = import_file(file.path(), &existing).unwrap();
        assert!(outcome.nothing_new());
        assert!(outcome.added.is_empty());
    }

    #[test]
    fn test_only_garbage_is_no_valid_phones() {
        let file = txt_file("123\nabc\n99\n");
        let err = import_file(file.path(), &[]).unwrap_err();
        assert!(matches!(err, ProspectError::NoValidPhones));
    }

    #[test]
    fn test_two_keys_sharing_a_number_collapse_at_list_level() {
        let file = csv_file(&[
            wide_row("key-1", "11987654321"),
            wide_row("key-2", "+5511987654321"),
        ]);
        let outcome = import_file(file.path(), &[]).unwrap();
        // Both pairs qualify, but they normalize to the same number.
        assert_eq!(outcome.added, vec!["+5511987654321"]);
        assert_eq!(outcome.valid, 2);
    }

    #[test]
    fn test_comma_note_in_txt_keeps_first_number() {
        let file = txt_file("11987654321,alternate-note\n");
        let outcome = import_file(file.path(), &[]).unwrap();
        assert_eq!(outcome.added, vec!["+5511987654321"]);
    }
}
