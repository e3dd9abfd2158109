use crate::config::{Tolerance, ToleranceMode};
use crate::model::Status;
use crate::quantity::round_to;

/// Outcome of comparing one SAP/PLM consumption pair.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Comparison {
    /// round(sap - plm, precision). Absent when either side is absent.
    pub difference: Option<f64>,
    /// difference / plm * 100. Absent when plm is zero or either side is absent.
    pub percent_difference: Option<f64>,
    pub status: Status,
}

/// Classify a consumption pair.
///
/// Precedence: both absent, PLM absent, SAP absent, within tolerance, then
/// sign of the difference. Classification reads the rounded difference, so
/// the status always agrees with the numbers a report shows.
pub fn compare(sap: Option<f64>, plm: Option<f64>, tolerance: &Tolerance, precision: u32) -> Comparison {
    let (sap, plm) = match (sap, plm) {
        (None, None) => {
            return Comparison {
                difference: None,
                percent_difference: None,
                status: Status::Ok,
            }
        }
        (Some(sap), Some(plm)) => (sap, plm),
        (_, None) => {
            return Comparison {
                difference: None,
                percent_difference: None,
                status: Status::MissingInPlm,
            }
        }
        (None, _) => {
            return Comparison {
                difference: None,
                percent_difference: None,
                status: Status::MissingInSap,
            }
        }
    };

    let difference = round_to(sap - plm, precision);
    let percent_difference = if plm != 0.0 {
        Some(difference / plm * 100.0)
    } else {
        None
    };

    let within = match tolerance.mode {
        ToleranceMode::Absolute => within_limit(difference.abs(), tolerance.value),
        ToleranceMode::Percentage => match percent_difference {
            Some(pct) => within_limit(pct.abs(), tolerance.value),
            // No percentage against a zero PLM base; fall back to one unit
            // in the last stored decimal place.
            None => within_limit(difference.abs(), 10f64.powi(-(precision as i32))),
        },
    };

    let status = if within {
        Status::Match
    } else if difference > 0.0 {
        Status::SapHigher
    } else {
        Status::PlmHigher
    };

    Comparison {
        difference: Some(difference),
        percent_difference,
        status,
    }
}

/// Inclusive limit check. A measure whose decimal value equals the limit
/// must classify as within it even when IEEE-754 rounding nudges either
/// side, so the threshold is padded by a few ulps at the working scale.
fn within_limit(measure: f64, limit: f64) -> bool {
    // An overflowed difference is never within a finite tolerance.
    if !measure.is_finite() {
        return false;
    }
    let scale = 1.0_f64.max(measure).max(limit);
    let eps = f64::EPSILON * 16.0 * scale;
    measure <= limit + eps
}
