use std::collections::BTreeMap;

use crate::model::{ReconSummary, ReconciledRecord, Status};

/// Tally classification counts over a reconciled record set.
pub fn compute_summary(records: &[ReconciledRecord]) -> ReconSummary {
    let mut status_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut matched = 0;
    let mut sap_higher = 0;
    let mut plm_higher = 0;
    let mut missing_in_plm = 0;
    let mut missing_in_sap = 0;
    let mut ok = 0;

    for record in records {
        *status_counts
            .entry(record.status.label().to_string())
            .or_insert(0) += 1;
        match record.status {
            Status::Match => matched += 1,
            Status::SapHigher => sap_higher += 1,
            Status::PlmHigher => plm_higher += 1,
            Status::MissingInPlm => missing_in_plm += 1,
            Status::MissingInSap => missing_in_sap += 1,
            Status::Ok => ok += 1,
        }
    }

    ReconSummary {
        total_records: records.len(),
        matched,
        sap_higher,
        plm_higher,
        missing_in_plm,
        missing_in_sap,
        ok,
        status_counts,
    }
}
