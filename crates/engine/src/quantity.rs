use crate::table::CellValue;

/// Parse a quantity cell as a decimal.
///
/// Accepts numeric cells and numeric strings, tolerating surrounding
/// whitespace and thousands-separator commas. Returns `None` for anything
/// else; malformed input degrades to absent, never to an error.
pub fn parse_decimal(value: &CellValue) -> Option<f64> {
    match value {
        CellValue::Number(n) if n.is_finite() => Some(*n),
        CellValue::Number(_) => None,
        CellValue::Text(s) => parse_decimal_str(s),
        CellValue::Bool(_) | CellValue::Empty => None,
    }
}

pub fn parse_decimal_str(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut cleaned = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        match c {
            ',' => continue, // thousands separator
            c if c.is_whitespace() => continue,
            c => cleaned.push(c),
        }
    }

    // Plain signed decimals only; exponents and units are not quantities
    // this tool should guess at.
    let mut chars = cleaned.chars();
    match chars.next() {
        Some('+') | Some('-') => {}
        Some(c) if c.is_ascii_digit() || c == '.' => {}
        _ => return None,
    }
    if !cleaned.chars().skip(1).all(|c| c.is_ascii_digit() || c == '.') {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Round to a fixed number of fractional digits, half away from zero.
pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    let scaled = value * factor;
    // A magnitude that overflows the scaling has no fractional digits left
    // to round.
    if !scaled.is_finite() {
        return value;
    }
    scaled.round() / factor
}

/// Ratio rule: component quantity over base quantity, rounded.
///
/// Absent when either side fails to parse or the base is zero; a malformed
/// denominator reads as "no consumption", never as zero or infinity.
pub fn ratio_consumption(component: &CellValue, base: &CellValue, precision: u32) -> Option<f64> {
    let comp = parse_decimal(component)?;
    let base = parse_decimal(base)?;
    if base == 0.0 {
        return None;
    }
    let ratio = comp / base;
    if !ratio.is_finite() {
        return None;
    }
    Some(round_to(ratio, precision))
}

/// Direct rule: the cell already holds a consumption decimal.
///
/// Unparseable (or empty) cells are absent by default; with
/// `invalid_as_zero` they become 0.0 instead.
pub fn direct_consumption(value: &CellValue, invalid_as_zero: bool) -> Option<f64> {
    match parse_decimal(value) {
        Some(v) => Some(v),
        None if invalid_as_zero => Some(0.0),
        None => None,
    }
}
