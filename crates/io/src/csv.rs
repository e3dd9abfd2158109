// CSV/TSV import: delimiter sniffing + legacy encoding fallback

use std::io::Read;
use std::path::Path;

use bomrec_engine::{CellValue, SourceTable};

/// Import a delimited text file. The first record becomes the header row;
/// every following record becomes a data row.
pub fn import(path: &Path) -> Result<SourceTable, String> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    import_from_string(&content, delimiter)
}

/// Detect the most likely field delimiter by checking consistency across the
/// first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line.
/// The delimiter that produces the most consistent field count (>1 field)
/// wins; higher field counts break ties.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let lines: Vec<&str> = content.lines().take(10).collect();

    if lines.is_empty() {
        return b',';
    }

    let field_count = |line: &str, delim: u8| -> usize {
        csv::ReaderBuilder::new()
            .delimiter(delim)
            .has_headers(false)
            .flexible(true)
            .from_reader(line.as_bytes())
            .records()
            .next()
            .and_then(|r| r.ok())
            .map(|r| r.len())
            .unwrap_or(1)
    };

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let target = field_count(lines[0], delim);
        // Must split the header line to be viable
        if target <= 1 {
            continue;
        }
        let consistent = lines
            .iter()
            .filter(|line| field_count(line, delim) == target)
            .count() as u64;
        let score = consistent * target as u64;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read a file and convert to UTF-8 if needed (handles the Windows-1252
/// encoding Excel uses for exported CSVs).
fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file =
        std::fs::File::open(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| format!("{}: {}", path.display(), e))?;

    // Try UTF-8 first; on failure, recover the buffer from the error
    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn import_from_string(content: &str, delimiter: u8) -> Result<SourceTable, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();
    let headers: Vec<String> = match records.next() {
        Some(first) => first
            .map_err(|e| e.to_string())?
            .iter()
            .map(|field| field.to_string())
            .collect(),
        None => return Err("input contains no header row".to_string()),
    };

    let mut rows: Vec<Vec<CellValue>> = Vec::new();
    for result in records {
        let record = result.map_err(|e| e.to_string())?;
        rows.push(
            record
                .iter()
                .map(|field| {
                    if field.trim().is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::Text(field.to_string())
                    }
                })
                .collect(),
        );
    }

    Ok(SourceTable::new(headers, rows))
}
