//! Excel workbook reader.

use calamine::{open_workbook_auto, Data, Reader};
use prospect_core::ProspectError;
use std::path::Path;

/// Read the first worksheet into rows of stringified cells.
///
/// `open_workbook_auto` sniffs the container, so `.xls` and `.xlsx`
/// both land here regardless of which extension they carry.
pub(crate) fn rows(path: &Path) -> Result<Vec<Vec<String>>, ProspectError> {
    let mut workbook = open_workbook_auto(path)
        .map_err(|e| ProspectError::Parse(format!("failed to open workbook: {e}")))?;

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ProspectError::Parse("workbook has no worksheets".to_string()))?
        .map_err(|e| ProspectError::Parse(format!("failed to read worksheet: {e}")))?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_to_string).collect())
        .collect())
}

/// Render a cell the way it reads in the sheet.
///
/// Integral floats drop the `.0` — phone and CNPJ columns are numeric
/// cells more often than not.
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integral_float_renders_without_decimal() {
        assert_eq!(cell_to_string(&Data::Float(11987654321.0)), "11987654321");
    }

    #[test]
    fn test_fractional_float_renders_as_is() {
        assert_eq!(cell_to_string(&Data::Float(1.5)), "1.5");
    }

    #[test]
    fn test_empty_cell_is_empty_string() {
        assert_eq!(cell_to_string(&Data::Empty), "");
    }

    #[test]
    fn test_string_cell_passes_through() {
        assert_eq!(
            cell_to_string(&Data::String("11 98765-4321".into())),
            "11 98765-4321"
        );
    }
}
