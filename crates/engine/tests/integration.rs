// End-to-end engine tests: config TOML in, classified records out.

use bomrec_engine::{run, CellValue, ReconConfig, SourceTable, Status};

fn table(headers: &[&str], rows: &[&[&str]]) -> SourceTable {
    SourceTable::new(
        headers.iter().map(|h| h.to_string()).collect(),
        rows.iter()
            .map(|row| {
                row.iter()
                    .map(|raw| {
                        if raw.is_empty() {
                            CellValue::Empty
                        } else {
                            CellValue::Text(raw.to_string())
                        }
                    })
                    .collect()
            })
            .collect(),
    )
}

fn sap_headers() -> Vec<&'static str> {
    vec!["Material", "Vendor Reference", "Comp.Qty", "Base quantity"]
}

fn plm_headers() -> Vec<&'static str> {
    vec!["Material", "Vendor Ref", "Consumption"]
}

#[test]
fn mixed_statuses_end_to_end() {
    let config = ReconConfig::from_toml(
        r#"
name = "mixed"

[tolerance]
mode = "absolute"
value = 0.01
"#,
    )
    .unwrap();

    let sap = table(
        &sap_headers(),
        &[
            &["M1", "V1", "10", "4"],     // 2.5, matches
            &["M2", "V2", "9", "3"],      // 3.0 vs 2.0, SAP higher
            &["M3", "V3", "1", "2"],      // 0.5 vs 0.8, PLM higher
            &["M4", "V4", "5", "5"],      // 1.0, PLM side missing
            &["M6", "V6", "7", "0"],      // zero base, both absent
        ],
    );
    let plm = table(
        &plm_headers(),
        &[
            &["M1", "V1", "2.5"],
            &["M2", "V2", "2.0"],
            &["M3", "V3", "0.8"],
            &["M5", "V5", "1.5"], // SAP side missing
            &["M6", "V6", ""],    // empty consumption, both absent
        ],
    );

    let result = run(&config, &sap, &plm).unwrap();

    assert_eq!(result.summary.total_records, 6);
    assert_eq!(result.summary.matched, 1);
    assert_eq!(result.summary.sap_higher, 1);
    assert_eq!(result.summary.plm_higher, 1);
    assert_eq!(result.summary.missing_in_plm, 1);
    assert_eq!(result.summary.missing_in_sap, 1);
    assert_eq!(result.summary.ok, 1);
    assert_eq!(result.summary.discrepancies(), 4);

    let statuses: Vec<(String, Status)> = result
        .records
        .iter()
        .map(|r| (r.key.0[0].clone(), r.status))
        .collect();
    assert_eq!(
        statuses,
        vec![
            ("M1".to_string(), Status::Match),
            ("M2".to_string(), Status::SapHigher),
            ("M3".to_string(), Status::PlmHigher),
            ("M4".to_string(), Status::MissingInPlm),
            ("M6".to_string(), Status::Ok),
            ("M5".to_string(), Status::MissingInSap),
        ]
    );

    let m2 = &result.records[1];
    assert_eq!(m2.sap_consumption, Some(3.0));
    assert_eq!(m2.plm_consumption, Some(2.0));
    assert_eq!(m2.difference, Some(1.0));
    assert_eq!(m2.percent_difference, Some(50.0));
}

#[test]
fn percentage_tolerance_boundary() {
    let config = ReconConfig::from_toml(
        r#"
name = "pct"

[tolerance]
mode = "percentage"
value = 5.0

[sap]
rule = "direct"
"#,
    )
    .unwrap();

    let sap = table(
        &["Material", "Vendor Reference", "Consumption"],
        &[&["M1", "V1", "100"], &["M2", "V2", "100"]],
    );
    let plm = table(
        &plm_headers(),
        &[&["M1", "V1", "95"], &["M2", "V2", "95.5"]],
    );

    let result = run(&config, &sap, &plm).unwrap();
    // 5/95 = 5.26% breaches, 4.5/95.5 = 4.71% does not.
    assert_eq!(result.records[0].status, Status::SapHigher);
    assert_eq!(result.records[1].status, Status::Match);
}

#[test]
fn leading_zero_materials_join_when_enabled() {
    let config = ReconConfig::from_toml(
        r#"
name = "zeros"

[keys]
strip_leading_zeros = true
"#,
    )
    .unwrap();

    let sap = table(&sap_headers(), &[&["007", "V1", "10", "4"]]);
    let plm = table(&plm_headers(), &[&["7", "V1", "2.5"]]);

    let result = run(&config, &sap, &plm).unwrap();
    assert_eq!(result.summary.total_records, 1);
    assert_eq!(result.records[0].status, Status::Match);
    assert_eq!(result.records[0].key.0, vec!["7", "V1"]);

    // Same inputs without stripping: two orphans.
    let strict = ReconConfig::from_toml("name = \"zeros\"").unwrap();
    let result = run(&strict, &sap, &plm).unwrap();
    assert_eq!(result.summary.total_records, 2);
    assert_eq!(result.summary.missing_in_plm, 1);
    assert_eq!(result.summary.missing_in_sap, 1);
}

#[test]
fn three_field_join_separates_sizes() {
    let config = ReconConfig::from_toml(
        r#"
name = "sized"

[join]
fields = ["material", "vendor_ref", "size"]
"#,
    )
    .unwrap();

    let sap = table(
        &["Material", "Vendor Reference", "Comp.Qty", "Base quantity", "Garment Size"],
        &[
            &["M1", "V1", "10", "4", "S"],
            &["M1", "V1", "12", "4", "M"],
        ],
    );
    let plm = table(
        &["Material", "Vendor Ref", "Consumption", "Garment Size"],
        &[
            &["M1", "V1", "2.5", "s"],
            &["M1", "V1", "3.5", "L"],
        ],
    );

    let result = run(&config, &sap, &plm).unwrap();

    // Same material and vendor throughout: the size component alone keeps
    // the three keys apart, so nothing cross-products.
    assert_eq!(result.summary.total_records, 3);
    assert_eq!(result.meta.join_fields, vec!["material", "vendor_ref", "size"]);

    assert_eq!(result.records[0].key.0, vec!["M1", "V1", "S"]);
    assert_eq!(result.records[0].status, Status::Match);
    assert_eq!(result.records[0].sap_consumption, Some(2.5));
    assert_eq!(result.records[0].plm_consumption, Some(2.5));

    assert_eq!(result.records[1].key.0, vec!["M1", "V1", "M"]);
    assert_eq!(result.records[1].status, Status::MissingInPlm);

    assert_eq!(result.records[2].key.0, vec!["M1", "V1", "L"]);
    assert_eq!(result.records[2].status, Status::MissingInSap);
}

#[test]
fn invalid_as_zero_turns_junk_into_zero() {
    let config = ReconConfig::from_toml(
        r#"
name = "zero-fill"

[plm]
invalid_as_zero = true
"#,
    )
    .unwrap();

    let sap = table(&sap_headers(), &[&["M1", "V1", "10", "4"]]);
    let plm = table(&plm_headers(), &[&["M1", "V1", "tbd"]]);

    let result = run(&config, &sap, &plm).unwrap();
    let record = &result.records[0];
    // 2.5 against a zero-filled PLM value is a plain discrepancy, not a
    // missing side.
    assert_eq!(record.plm_consumption, Some(0.0));
    assert_eq!(record.status, Status::SapHigher);
    assert_eq!(record.difference, Some(2.5));
}

#[test]
fn column_alias_overrides_resolve() {
    let config = ReconConfig::from_toml(
        r#"
name = "aliases"

[sap.columns]
material = ["Matl No"]
component_qty = ["Qty Used"]
base_qty = ["Per Units"]
"#,
    )
    .unwrap();

    let sap = table(
        &["Matl No", "Vendor Reference", "Qty Used", "Per Units"],
        &[&["M1", "V1", "10", "4"]],
    );
    let plm = table(&plm_headers(), &[&["M1", "V1", "2.5"]]);

    let result = run(&config, &sap, &plm).unwrap();
    assert_eq!(result.summary.matched, 1);
    assert_eq!(
        result.meta.sap_columns.get("material").map(String::as_str),
        Some("Matl No")
    );
}

#[test]
fn aliases_resolve_in_declared_order() {
    // Both candidate headers exist; the earlier alias wins.
    let config = ReconConfig::from_toml("name = \"order\"").unwrap();
    let sap = table(
        &["Material", "Vendor Reference", "Comp.Qty", "Component Qty", "Base quantity"],
        &[&["M1", "V1", "10", "999", "4"]],
    );
    let plm = table(&plm_headers(), &[&["M1", "V1", "2.5"]]);

    let result = run(&config, &sap, &plm).unwrap();
    assert_eq!(
        result.meta.sap_columns.get("component_qty").map(String::as_str),
        Some("Comp.Qty")
    );
    assert_eq!(result.records[0].sap_consumption, Some(2.5));
}

#[test]
fn schema_error_message_names_fields_and_aliases() {
    let config = ReconConfig::from_toml("name = \"schema\"").unwrap();
    let sap = table(&["Material", "Vendor Reference"], &[]);
    let plm = table(&plm_headers(), &[]);

    let err = run(&config, &sap, &plm).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("SAP table"), "{msg}");
    assert!(msg.contains("component_qty"), "{msg}");
    assert!(msg.contains("base_qty"), "{msg}");
    assert!(msg.contains("\"Comp.Qty\""), "{msg}");
    assert!(msg.contains("\"Base quantity\""), "{msg}");
}

#[test]
fn result_serializes_with_snake_case_statuses() {
    let config = ReconConfig::from_toml("name = \"json\"").unwrap();
    let sap = table(&sap_headers(), &[&["M1", "V1", "10", "4"]]);
    let plm = table(&plm_headers(), &[&["M2", "V2", "2.5"]]);

    let result = run(&config, &sap, &plm).unwrap();
    let value = serde_json::to_value(&result).unwrap();

    assert_eq!(value["meta"]["config_name"], "json");
    assert_eq!(value["meta"]["join_fields"][0], "material");
    assert_eq!(value["summary"]["total_records"], 2);
    assert_eq!(value["records"][0]["status"], "missing_in_plm");
    assert_eq!(value["records"][1]["status"], "missing_in_sap");
    // Absent values are omitted, not null.
    assert!(value["records"][0].get("plm_consumption").is_none());
    assert!(value["records"][0].get("plm").is_none());
    assert_eq!(value["records"][0]["sap"]["row"], 1);
    assert_eq!(value["records"][0]["sap"]["fields"]["Material"], "M1");
}

#[test]
fn ratio_rule_on_plm_side_via_config() {
    let config = ReconConfig::from_toml(
        r#"
name = "swapped"

[plm]
rule = "ratio"
"#,
    )
    .unwrap();

    let sap = table(&sap_headers(), &[&["M1", "V1", "10", "4"]]);
    let plm = table(
        &["Material", "Vendor Ref", "Comp.Qty", "Base quantity"],
        &[&["M1", "V1", "5", "2"]],
    );

    let result = run(&config, &sap, &plm).unwrap();
    assert_eq!(result.records[0].plm_consumption, Some(2.5));
    assert_eq!(result.records[0].status, Status::Match);
}

#[test]
fn ratio_rounds_to_configured_precision() {
    let config = ReconConfig::from_toml("name = \"precision\"\nprecision = 2\n").unwrap();
    let sap = table(&sap_headers(), &[&["M1", "V1", "10", "3"]]);
    let plm = table(&plm_headers(), &[&["M1", "V1", "3.33"]]);

    let result = run(&config, &sap, &plm).unwrap();
    // 10/3 rounds to 3.33 at precision 2 and matches exactly.
    assert_eq!(result.records[0].sap_consumption, Some(3.33));
    assert_eq!(result.records[0].status, Status::Match);
}
