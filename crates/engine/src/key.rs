use std::fmt;

use serde::Serialize;

use crate::table::CellValue;

/// Ordered tuple of normalized key components, one per configured join field.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct JoinKey(pub Vec<String>);

impl fmt::Display for JoinKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" / "))
    }
}

/// Canonicalize one raw key field.
///
/// String form of the cell, trimmed and uppercased; optionally with leading
/// zeros stripped from all-digit values. Idempotent. Absent input maps to
/// the empty string, which is a valid (if low-information) component.
pub fn normalize_component(value: &CellValue, strip_leading_zeros: bool) -> String {
    let s = value.display_string();
    let trimmed = s.trim();
    if strip_leading_zeros && is_all_digits(trimmed) {
        return strip_zeros(trimmed).to_uppercase();
    }
    trimmed.to_uppercase()
}

fn is_all_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

/// Strip leading zeros, keeping at least one digit ("000" stays "0").
fn strip_zeros(s: &str) -> &str {
    let stripped = s.trim_start_matches('0');
    if stripped.is_empty() {
        "0"
    } else {
        stripped
    }
}
