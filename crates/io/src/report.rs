// Styled reconciliation report export via rust_xlsxwriter

use std::path::Path;

use rust_xlsxwriter::{Color, Format, Workbook as XlsxWorkbook, XlsxError};

use bomrec_engine::{ReconResult, Status};

// Fill colors of the long-standing manual review convention.
const GREEN: u32 = 0xC6EFCE; // MATCH
const RED: u32 = 0xFFC7CE; // SAP Higher
const ORANGE: u32 = 0xFFD580; // PLM Higher
const YELLOW: u32 = 0xFFEB9C; // Missing in either side

/// Render the reconciliation workbook: a record sheet with one colored row
/// per classified record plus a summary tally sheet.
pub fn export(result: &ReconResult, path: &Path) -> Result<(), String> {
    let mut workbook = XlsxWorkbook::new();
    write_recon_sheet(&mut workbook, result)?;
    write_summary_sheet(&mut workbook, result)?;
    workbook
        .save(path)
        .map_err(|e| format!("Failed to save report {}: {}", path.display(), e))?;
    Ok(())
}

fn write_err(e: XlsxError) -> String {
    format!("Failed to write report cell: {}", e)
}

fn status_format(status: Status) -> Option<Format> {
    let color = match status {
        Status::Match => GREEN,
        Status::SapHigher => RED,
        Status::PlmHigher => ORANGE,
        Status::MissingInPlm | Status::MissingInSap => YELLOW,
        Status::Ok => return None,
    };
    Some(Format::new().set_background_color(Color::RGB(color)))
}

/// Display label for a logical join field.
fn field_label(field: &str) -> String {
    match field {
        "material" => "Material".to_string(),
        "vendor_ref" => "Vendor Ref".to_string(),
        "size" => "Garment Size".to_string(),
        // Title-case snake_case: "color_code" -> "Color Code"
        _ => field
            .split('_')
            .filter(|part| !part.is_empty())
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn write_recon_sheet(workbook: &mut XlsxWorkbook, result: &ReconResult) -> Result<(), String> {
    let worksheet = workbook
        .add_worksheet()
        .set_name("Reconciliation")
        .map_err(|e| format!("Failed to create sheet: {}", e))?;

    // Raw SAP quantity columns appear only when the SAP side resolved them
    // (the ratio rule); under a direct rule there is nothing to show.
    let raw_sap_columns: Vec<&String> = ["component_qty", "base_qty"]
        .iter()
        .filter_map(|field| result.meta.sap_columns.get(*field))
        .collect();

    let mut labels: Vec<String> = result
        .meta
        .join_fields
        .iter()
        .map(|field| field_label(field))
        .collect();
    labels.extend(raw_sap_columns.iter().map(|header| (*header).clone()));
    for fixed in [
        "SAP Consumption",
        "PLM Consumption",
        "Difference",
        "Difference %",
        "Status",
    ] {
        labels.push(fixed.to_string());
    }

    let header_format = Format::new().set_bold();
    for (col, label) in labels.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, label, &header_format)
            .map_err(write_err)?;
    }

    for (i, record) in result.records.iter().enumerate() {
        let row = (i + 1) as u32;
        let mut col: u16 = 0;

        for component in &record.key.0 {
            worksheet
                .write_string(row, col, component)
                .map_err(write_err)?;
            col += 1;
        }

        for header in &raw_sap_columns {
            if let Some(value) = record.sap.as_ref().and_then(|r| r.fields.get(*header)) {
                worksheet.write_string(row, col, value).map_err(write_err)?;
            }
            col += 1;
        }

        for value in [
            record.sap_consumption,
            record.plm_consumption,
            record.difference,
            record.percent_difference,
        ] {
            if let Some(n) = value {
                worksheet.write_number(row, col, n).map_err(write_err)?;
            }
            col += 1;
        }

        match status_format(record.status) {
            Some(format) => {
                worksheet
                    .write_string_with_format(row, col, record.status.label(), &format)
                    .map_err(write_err)?;
            }
            None => {
                worksheet
                    .write_string(row, col, record.status.label())
                    .map_err(write_err)?;
            }
        }
    }

    worksheet.autofit();
    Ok(())
}

fn write_summary_sheet(workbook: &mut XlsxWorkbook, result: &ReconResult) -> Result<(), String> {
    let worksheet = workbook
        .add_worksheet()
        .set_name("Summary")
        .map_err(|e| format!("Failed to create sheet: {}", e))?;

    let bold = Format::new().set_bold();
    worksheet
        .write_string_with_format(0, 0, &result.meta.config_name, &bold)
        .map_err(write_err)?;
    worksheet.write_string(1, 0, "Run at").map_err(write_err)?;
    worksheet
        .write_string(1, 1, &result.meta.run_at)
        .map_err(write_err)?;

    worksheet
        .write_string_with_format(3, 0, "Status", &bold)
        .map_err(write_err)?;
    worksheet
        .write_string_with_format(3, 1, "Count", &bold)
        .map_err(write_err)?;

    let mut row: u32 = 4;
    for (label, count) in &result.summary.status_counts {
        worksheet.write_string(row, 0, label).map_err(write_err)?;
        worksheet
            .write_number(row, 1, *count as f64)
            .map_err(write_err)?;
        row += 1;
    }

    worksheet
        .write_string_with_format(row, 0, "Total", &bold)
        .map_err(write_err)?;
    worksheet
        .write_number_with_format(row, 1, result.summary.total_records as f64, &bold)
        .map_err(write_err)?;

    worksheet.autofit();
    Ok(())
}
