//! `bomrec-engine` implements SAP/PLM consumption reconciliation:
//! key normalization, per-side quantity rules, the join, tolerance
//! classification, and summary tallies.
//!
//! Pure engine crate: it receives pre-loaded tables plus a validated
//! config and returns classified results. No CLI or file IO here.

pub mod classify;
pub mod config;
pub mod engine;
pub mod error;
pub mod key;
pub mod model;
pub mod quantity;
pub mod summary;
pub mod table;

pub use config::{JoinType, QuantityRule, ReconConfig, Tolerance, ToleranceMode};
pub use engine::run;
pub use error::{MissingColumn, ReconError};
pub use key::JoinKey;
pub use model::{
    ReconMeta, ReconResult, ReconSummary, ReconciledRecord, Side, SideRecord, Status,
};
pub use table::{CellValue, SourceTable};
