// File I/O operations

pub mod csv;
pub mod report;
pub mod xlsx;

use std::path::Path;

use bomrec_engine::SourceTable;

/// Load a source table, dispatching on the file extension. Delimited-text
/// extensions go through the sniffing CSV reader; everything else is
/// handed to calamine.
pub fn load_table(path: &Path) -> Result<SourceTable, String> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match ext.as_str() {
        "csv" | "tsv" | "txt" => csv::import(path),
        _ => xlsx::import(path),
    }
}
