use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::key::JoinKey;

// ---------------------------------------------------------------------------
// Sides
// ---------------------------------------------------------------------------

/// Which source system a table (or a column resolution) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Sap,
    Plm,
}

impl Side {
    /// Lowercase name of this side's config table (`[sap]` / `[plm]`).
    pub fn config_key(&self) -> &'static str {
        match self {
            Self::Sap => "sap",
            Self::Plm => "plm",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sap => write!(f, "SAP"),
            Self::Plm => write!(f, "PLM"),
        }
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Match,
    SapHigher,
    PlmHigher,
    MissingInPlm,
    MissingInSap,
    Ok,
}

impl Status {
    /// Human label as it appears in the report artifact.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Match => "MATCH",
            Self::SapHigher => "SAP Higher",
            Self::PlmHigher => "PLM Higher",
            Self::MissingInPlm => "Missing in PLM",
            Self::MissingInSap => "Missing in SAP",
            Self::Ok => "OK",
        }
    }

    /// True for statuses that should fail a scripted run.
    pub fn is_discrepancy(&self) -> bool {
        !matches!(self, Self::Match | Self::Ok)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// The source row behind one side of a reconciled record.
#[derive(Debug, Clone, Serialize)]
pub struct SideRecord {
    /// 1-based data row in the source table (header excluded).
    pub row: usize,
    /// Raw non-empty cells, keyed by normalized header.
    pub fields: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconciledRecord {
    pub key: JoinKey,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sap: Option<SideRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plm: Option<SideRecord>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sap_consumption: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plm_consumption: Option<f64>,
    /// `sap - plm`, rounded to the configured precision.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference: Option<f64>,
    /// `difference / plm * 100`; absent when `plm` is absent or zero.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent_difference: Option<f64>,
    pub status: Status,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct ReconSummary {
    pub total_records: usize,
    pub matched: usize,
    pub sap_higher: usize,
    pub plm_higher: usize,
    pub missing_in_plm: usize,
    pub missing_in_sap: usize,
    pub ok: usize,
    /// Counts keyed by human status label, deterministically ordered.
    pub status_counts: BTreeMap<String, usize>,
}

impl ReconSummary {
    pub fn discrepancies(&self) -> usize {
        self.sap_higher + self.plm_higher + self.missing_in_plm + self.missing_in_sap
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    /// Join field names, in key-component order.
    pub join_fields: Vec<String>,
    /// Resolved column name per logical field, per side.
    pub sap_columns: BTreeMap<String, String>,
    pub plm_columns: BTreeMap<String, String>,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub records: Vec<ReconciledRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels() {
        assert_eq!(Status::Match.label(), "MATCH");
        assert_eq!(Status::SapHigher.label(), "SAP Higher");
        assert_eq!(Status::PlmHigher.label(), "PLM Higher");
        assert_eq!(Status::MissingInPlm.label(), "Missing in PLM");
        assert_eq!(Status::MissingInSap.label(), "Missing in SAP");
        assert_eq!(Status::Ok.label(), "OK");
    }

    #[test]
    fn discrepancy_statuses() {
        assert!(!Status::Match.is_discrepancy());
        assert!(!Status::Ok.is_discrepancy());
        assert!(Status::SapHigher.is_discrepancy());
        assert!(Status::PlmHigher.is_discrepancy());
        assert!(Status::MissingInPlm.is_discrepancy());
        assert!(Status::MissingInSap.is_discrepancy());
    }
}
