// Excel import via calamine (xlsx, xls, xlsb, ods)

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};

use bomrec_engine::{CellValue, SourceTable};

/// Maximum number of cells to import (prevents runaway memory on
/// pathological files).
const MAX_CELLS: usize = 5_000_000;

/// Import the first worksheet of an Excel file. The first row of the used
/// range becomes the headers.
pub fn import(path: &Path) -> Result<SourceTable, String> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file {}: {}", path.display(), e))?;

    let sheet_names = workbook.sheet_names().to_vec();
    let first = sheet_names
        .first()
        .ok_or_else(|| format!("{}: Excel file contains no sheets", path.display()))?;

    let range = workbook
        .worksheet_range(first)
        .map_err(|e| format!("Failed to read sheet '{}': {}", first, e))?;

    let (height, width) = range.get_size();
    if height == 0 || width == 0 {
        return Err(format!("{}: sheet '{}' is empty", path.display(), first));
    }
    if height * width > MAX_CELLS {
        return Err(format!(
            "{}: sheet '{}' has {} cells (limit {})",
            path.display(),
            first,
            height * width,
            MAX_CELLS
        ));
    }

    let mut rows_iter = range.rows();
    let headers: Vec<String> = match rows_iter.next() {
        Some(row) => row.iter().map(|c| convert_cell(c).display_string()).collect(),
        None => return Err(format!("{}: sheet '{}' is empty", path.display(), first)),
    };

    let rows: Vec<Vec<CellValue>> = rows_iter
        .map(|row| row.iter().map(convert_cell).collect())
        .collect();

    Ok(SourceTable::new(headers, rows))
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => {
            if s.trim().is_empty() {
                CellValue::Empty
            } else {
                CellValue::Text(s.clone())
            }
        }
        Data::Float(n) => CellValue::Number(*n),
        Data::Int(n) => CellValue::Number(*n as f64),
        Data::Bool(b) => CellValue::Bool(*b),
        // Error cells (#DIV/0! and friends) carry no usable value
        Data::Error(_) => CellValue::Empty,
        // Date cells surface as their serial number
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
