use std::collections::hash_map::Entry;
use std::collections::{BTreeMap, HashMap};

use crate::classify::compare;
use crate::config::{JoinType, QuantityRule, ReconConfig};
use crate::error::{MissingColumn, ReconError};
use crate::key::{normalize_component, JoinKey};
use crate::model::{ReconMeta, ReconResult, ReconciledRecord, Side, SideRecord};
use crate::quantity::{direct_consumption, ratio_consumption};
use crate::summary::compute_summary;
use crate::table::SourceTable;

/// Resolved column layout for one side's table.
struct SideLayout {
    /// Column index per join field, in join-field order.
    key_cols: Vec<usize>,
    quantity: QuantityColumns,
    /// Logical field name to the actual header that matched.
    resolved: BTreeMap<String, String>,
}

enum QuantityColumns {
    Ratio { component: usize, base: usize },
    Direct { consumption: usize },
}

/// One normalized input row, ready to join.
struct SideRow {
    key: JoinKey,
    consumption: Option<f64>,
    record: SideRecord,
}

/// Reconcile two pre-loaded tables under a validated config.
///
/// Schema problems surface for a whole side at once, before any cell is
/// normalized. Malformed quantity cells never abort the run; they degrade
/// to absent values and classify through the missing-side statuses.
pub fn run(
    config: &ReconConfig,
    sap: &SourceTable,
    plm: &SourceTable,
) -> Result<ReconResult, ReconError> {
    let sap_layout = resolve_layout(config, Side::Sap, sap)?;
    let plm_layout = resolve_layout(config, Side::Plm, plm)?;

    let sap_rows = normalize_rows(config, Side::Sap, sap, &sap_layout);
    let plm_rows = normalize_rows(config, Side::Plm, plm, &plm_layout);

    let records = join(config, &sap_rows, &plm_rows);
    let summary = compute_summary(&records);

    Ok(ReconResult {
        meta: ReconMeta {
            config_name: config.name.clone(),
            join_fields: config.join.fields.clone(),
            sap_columns: sap_layout.resolved,
            plm_columns: plm_layout.resolved,
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        records,
    })
}

fn resolve_field(
    config: &ReconConfig,
    side: Side,
    table: &SourceTable,
    field: &str,
    resolved: &mut BTreeMap<String, String>,
    missing: &mut Vec<MissingColumn>,
) -> Option<usize> {
    let aliases = config.aliases(side, field);
    for alias in &aliases {
        if let Some(idx) = table.column_index(alias) {
            resolved.insert(field.to_string(), table.headers()[idx].clone());
            return Some(idx);
        }
    }
    missing.push(MissingColumn {
        field: field.to_string(),
        aliases,
    });
    None
}

/// Resolve every required column for one side, collecting all misses so the
/// error names the complete repair list rather than the first gap.
fn resolve_layout(
    config: &ReconConfig,
    side: Side,
    table: &SourceTable,
) -> Result<SideLayout, ReconError> {
    let mut missing = Vec::new();
    let mut resolved = BTreeMap::new();

    let mut key_cols = Vec::with_capacity(config.join.fields.len());
    for field in &config.join.fields {
        if let Some(idx) = resolve_field(config, side, table, field, &mut resolved, &mut missing) {
            key_cols.push(idx);
        }
    }

    let quantity = match config.rule(side) {
        QuantityRule::Ratio => {
            let component =
                resolve_field(config, side, table, "component_qty", &mut resolved, &mut missing);
            let base = resolve_field(config, side, table, "base_qty", &mut resolved, &mut missing);
            component.zip(base).map(|(component, base)| QuantityColumns::Ratio { component, base })
        }
        QuantityRule::Direct => {
            resolve_field(config, side, table, "consumption", &mut resolved, &mut missing)
                .map(|consumption| QuantityColumns::Direct { consumption })
        }
    };

    match quantity {
        Some(quantity) if missing.is_empty() => Ok(SideLayout {
            key_cols,
            quantity,
            resolved,
        }),
        _ => Err(ReconError::Schema { side, missing }),
    }
}

fn normalize_rows(
    config: &ReconConfig,
    side: Side,
    table: &SourceTable,
    layout: &SideLayout,
) -> Vec<SideRow> {
    let strip = config.keys.strip_leading_zeros;
    let invalid_as_zero = config.source(side).invalid_as_zero;
    let mut rows = Vec::with_capacity(table.row_count());

    for i in 0..table.row_count() {
        let key = JoinKey(
            layout
                .key_cols
                .iter()
                .map(|&col| normalize_component(table.cell(i, col), strip))
                .collect(),
        );

        let consumption = match layout.quantity {
            QuantityColumns::Ratio { component, base } => {
                ratio_consumption(table.cell(i, component), table.cell(i, base), config.precision)
            }
            QuantityColumns::Direct { consumption } => {
                direct_consumption(table.cell(i, consumption), invalid_as_zero)
            }
        };

        let mut fields = BTreeMap::new();
        for (col, header) in table.headers().iter().enumerate() {
            let cell = table.cell(i, col);
            if !cell.is_empty() {
                fields.insert(header.clone(), cell.display_string());
            }
        }

        rows.push(SideRow {
            key,
            consumption,
            record: SideRecord { row: i + 1, fields },
        });
    }

    rows
}

/// Group both sides by key and pair every SAP row with every PLM row that
/// shares it: duplicate keys multiply into the full cross product, never a
/// silent first-wins pick. Output order is first-seen key order, SAP input
/// first, then (outer join only) PLM-only keys in PLM input order.
fn join(config: &ReconConfig, sap_rows: &[SideRow], plm_rows: &[SideRow]) -> Vec<ReconciledRecord> {
    let mut key_order: Vec<&JoinKey> = Vec::new();

    let mut sap_groups: HashMap<&JoinKey, Vec<&SideRow>> = HashMap::new();
    for row in sap_rows {
        match sap_groups.entry(&row.key) {
            Entry::Occupied(mut e) => e.get_mut().push(row),
            Entry::Vacant(e) => {
                key_order.push(&row.key);
                e.insert(vec![row]);
            }
        }
    }

    let mut plm_groups: HashMap<&JoinKey, Vec<&SideRow>> = HashMap::new();
    for row in plm_rows {
        match plm_groups.entry(&row.key) {
            Entry::Occupied(mut e) => e.get_mut().push(row),
            Entry::Vacant(e) => {
                if config.join.how == JoinType::Outer && !sap_groups.contains_key(&row.key) {
                    key_order.push(&row.key);
                }
                e.insert(vec![row]);
            }
        }
    }

    let mut records = Vec::new();
    for key in key_order {
        let sap_group: &[&SideRow] = sap_groups.get(key).map(Vec::as_slice).unwrap_or(&[]);
        let plm_group: &[&SideRow] = plm_groups.get(key).map(Vec::as_slice).unwrap_or(&[]);

        if plm_group.is_empty() {
            for sap in sap_group {
                records.push(build_record(config, key, Some(sap), None));
            }
        } else if sap_group.is_empty() {
            for plm in plm_group {
                records.push(build_record(config, key, None, Some(plm)));
            }
        } else {
            for sap in sap_group {
                for plm in plm_group {
                    records.push(build_record(config, key, Some(sap), Some(plm)));
                }
            }
        }
    }

    records
}

fn build_record(
    config: &ReconConfig,
    key: &JoinKey,
    sap: Option<&SideRow>,
    plm: Option<&SideRow>,
) -> ReconciledRecord {
    let sap_consumption = sap.and_then(|r| r.consumption);
    let plm_consumption = plm.and_then(|r| r.consumption);
    let cmp = compare(sap_consumption, plm_consumption, &config.tolerance, config.precision);

    ReconciledRecord {
        key: key.clone(),
        sap: sap.map(|r| r.record.clone()),
        plm: plm.map(|r| r.record.clone()),
        sap_consumption,
        plm_consumption,
        difference: cmp.difference,
        percent_difference: cmp.percent_difference,
        status: cmp.status,
    }
}
