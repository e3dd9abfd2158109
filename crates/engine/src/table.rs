use std::collections::{HashMap, HashSet};

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// A single raw cell as decoded from a source file.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Empty,
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Canonical string form. Whole floats print without a decimal point so
    /// `7`, `7.0`, and `"7"` agree when used as key components.
    pub fn display_string(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

/// Format a numeric cell: integers without decimals.
pub fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

// ---------------------------------------------------------------------------
// Tables
// ---------------------------------------------------------------------------

/// One decoded input table: normalized headers plus row-major cells.
///
/// Rows may be ragged; reading past the end of a short row yields `Empty`.
#[derive(Debug, Clone, Default)]
pub struct SourceTable {
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl SourceTable {
    /// Build a table, normalizing headers: surrounding whitespace is
    /// trimmed, blank names are replaced by the spreadsheet column letter,
    /// and duplicates keep the first occurrence unchanged while later ones
    /// get their occurrence index ("Material", "Material.2", ...).
    pub fn new(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            headers: normalize_headers(headers),
            rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Case-insensitive header lookup. The candidate is trimmed first;
    /// stored headers already are.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        let want = name.trim();
        self.headers
            .iter()
            .position(|h| h.eq_ignore_ascii_case(want))
    }

    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }
}

fn normalize_headers(raw: Vec<String>) -> Vec<String> {
    // Assigned names and occurrence counts, keyed case-insensitively, since
    // lookup is too.
    let mut taken: HashSet<String> = HashSet::new();
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut out = Vec::with_capacity(raw.len());

    for (i, h) in raw.into_iter().enumerate() {
        let trimmed = h.trim();
        let base = if trimmed.is_empty() {
            column_letter(i)
        } else {
            trimmed.to_string()
        };
        let key = base.to_lowercase();
        if taken.insert(key.clone()) {
            out.push(base);
        } else {
            // Suffix with the occurrence index, skipping past suffixed
            // names the input uses as literal headers ("Material.2").
            let count = counts.entry(key).or_insert(1);
            let name = loop {
                *count += 1;
                let candidate = format!("{}.{}", base, count);
                if taken.insert(candidate.to_lowercase()) {
                    break candidate;
                }
            };
            out.push(name);
        }
    }

    out
}

/// Convert column index to spreadsheet column letter (0 = A, 25 = Z, 26 = AA).
pub fn column_letter(col: usize) -> String {
    let mut result = String::new();
    let mut n = col;
    loop {
        result.insert(0, (b'A' + (n % 26) as u8) as char);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    #[test]
    fn headers_trimmed() {
        let t = SourceTable::new(
            vec!["  Material ".into(), "Vendor Ref".into()],
            vec![],
        );
        assert_eq!(t.headers(), &["Material", "Vendor Ref"]);
    }

    #[test]
    fn duplicate_headers_suffixed() {
        let t = SourceTable::new(
            vec!["Material".into(), "Qty".into(), "material".into(), "Material".into()],
            vec![],
        );
        assert_eq!(t.headers(), &["Material", "Qty", "material.2", "Material.3"]);
    }

    #[test]
    fn duplicate_suffix_never_collides_with_literal_headers() {
        // A generated "material.2" must not collide with a literal
        // "Material.2" column, whichever comes first.
        let t = SourceTable::new(
            vec!["Material".into(), "material".into(), "Material.2".into()],
            vec![],
        );
        assert_eq!(t.headers(), &["Material", "material.2", "Material.2.2"]);

        let t = SourceTable::new(
            vec!["Material.2".into(), "Material".into(), "material".into()],
            vec![],
        );
        assert_eq!(t.headers(), &["Material.2", "Material", "material.3"]);
    }

    #[test]
    fn blank_header_becomes_column_letter() {
        let t = SourceTable::new(vec!["A col".into(), "   ".into()], vec![]);
        assert_eq!(t.headers()[1], "B");
    }

    #[test]
    fn column_lookup_is_case_insensitive() {
        let t = SourceTable::new(vec!["Material".into(), "Comp.Qty".into()], vec![]);
        assert_eq!(t.column_index("material"), Some(0));
        assert_eq!(t.column_index(" COMP.QTY "), Some(1));
        assert_eq!(t.column_index("Base Qty"), None);
    }

    #[test]
    fn ragged_rows_read_as_empty() {
        let t = SourceTable::new(
            vec!["A".into(), "B".into(), "C".into()],
            vec![vec![text("x")]],
        );
        assert_eq!(t.cell(0, 0), &text("x"));
        assert_eq!(t.cell(0, 2), &CellValue::Empty);
        assert_eq!(t.cell(5, 0), &CellValue::Empty);
    }

    #[test]
    fn display_string_formats_whole_floats_as_integers() {
        assert_eq!(CellValue::Number(7.0).display_string(), "7");
        assert_eq!(CellValue::Number(7.5).display_string(), "7.5");
        assert_eq!(CellValue::Number(-3.0).display_string(), "-3");
        assert_eq!(text("abc").display_string(), "abc");
        assert_eq!(CellValue::Bool(true).display_string(), "TRUE");
        assert_eq!(CellValue::Empty.display_string(), "");
    }

    #[test]
    fn column_letters() {
        assert_eq!(column_letter(0), "A");
        assert_eq!(column_letter(25), "Z");
        assert_eq!(column_letter(26), "AA");
        assert_eq!(column_letter(27), "AB");
    }
}
