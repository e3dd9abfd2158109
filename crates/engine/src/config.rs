use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::model::Side;

/// Reconciliation run configuration, loaded from TOML.
#[derive(Debug, Clone, Deserialize)]
pub struct ReconConfig {
    /// Human-readable name for reports and logs.
    pub name: String,
    #[serde(default)]
    pub join: JoinConfig,
    #[serde(default)]
    pub tolerance: Tolerance,
    /// Decimal places for derived consumptions and differences.
    #[serde(default = "default_precision")]
    pub precision: u32,
    #[serde(default)]
    pub keys: KeyConfig,
    #[serde(default)]
    pub sap: SourceConfig,
    #[serde(default)]
    pub plm: SourceConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct JoinConfig {
    /// Logical fields forming the join key, in order.
    #[serde(default = "default_join_fields")]
    pub fields: Vec<String>,
    #[serde(default)]
    pub how: JoinType,
}

impl Default for JoinConfig {
    fn default() -> Self {
        Self {
            fields: default_join_fields(),
            how: JoinType::default(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinType {
    /// Keep keys present on either side.
    #[default]
    Outer,
    /// Keep only keys present on the SAP side.
    Left,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Tolerance {
    #[serde(default)]
    pub mode: ToleranceMode,
    #[serde(default)]
    pub value: f64,
}

impl Default for Tolerance {
    fn default() -> Self {
        Self {
            mode: ToleranceMode::Absolute,
            value: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToleranceMode {
    /// `|difference| <= value` is within tolerance.
    #[default]
    Absolute,
    /// `|difference| / plm * 100 <= value` is within tolerance.
    Percentage,
}

#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct KeyConfig {
    /// Strip leading zeros from all-digit key components ("007" joins "7").
    #[serde(default)]
    pub strip_leading_zeros: bool,
}

/// How a side derives its consumption value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantityRule {
    /// component_qty / base_qty, rounded to `precision`.
    Ratio,
    /// The consumption column, parsed as-is.
    Direct,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourceConfig {
    /// Input path, relative to the config file unless absolute.
    #[serde(default)]
    pub file: Option<String>,
    /// Unset means the side default: ratio for SAP, direct for PLM.
    #[serde(default)]
    pub rule: Option<QuantityRule>,
    /// Treat unparseable consumption cells as 0.0 instead of absent.
    #[serde(default)]
    pub invalid_as_zero: bool,
    /// Alias overrides: logical field name to candidate column headers,
    /// tried in order. Replaces the built-in list for that field.
    #[serde(default)]
    pub columns: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    /// Styled xlsx report path.
    #[serde(default)]
    pub report: Option<String>,
    /// Full JSON result path.
    #[serde(default)]
    pub json: Option<String>,
}

fn default_join_fields() -> Vec<String> {
    vec!["material".to_string(), "vendor_ref".to_string()]
}

fn default_precision() -> u32 {
    5
}

/// Built-in column aliases per side and logical field, tried in order.
pub fn default_aliases(side: Side, field: &str) -> &'static [&'static str] {
    match (side, field) {
        (Side::Sap, "material") => &["Material"],
        (Side::Sap, "vendor_ref") => &["Vendor Reference", "Vendor Ref"],
        (Side::Sap, "component_qty") => &["Comp.Qty", "Comp.Qty.", "Component Qty"],
        (Side::Sap, "base_qty") => &["Base quantity", "Base Qty"],
        (Side::Sap, "consumption") => &["Consumption"],
        (Side::Sap, "component") => &["Component"],
        (Side::Sap, "color") => &["FG Color Description"],
        (Side::Sap, "size") => &["Garment Size"],
        (Side::Plm, "material") => &["Material"],
        (Side::Plm, "vendor_ref") => &["Vendor Ref", "Vendor Reference"],
        (Side::Plm, "consumption") => &["Consumption"],
        (Side::Plm, "component_qty") => &["Comp.Qty", "Component Qty"],
        (Side::Plm, "base_qty") => &["Base quantity", "Base Qty"],
        (Side::Plm, "color") => &["Color Name"],
        (Side::Plm, "size") => &["Garment Size"],
        _ => &[],
    }
}

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        if self.name.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "name must not be empty".to_string(),
            ));
        }
        if self.join.fields.is_empty() {
            return Err(ReconError::ConfigValidation(
                "join.fields must not be empty".to_string(),
            ));
        }
        if !self.tolerance.value.is_finite() || self.tolerance.value < 0.0 {
            return Err(ReconError::ConfigValidation(format!(
                "tolerance value must be a non-negative number, got {}",
                self.tolerance.value
            )));
        }
        if self.precision > 10 {
            return Err(ReconError::ConfigValidation(format!(
                "precision must be between 0 and 10, got {}",
                self.precision
            )));
        }
        for side in [Side::Sap, Side::Plm] {
            let mut required: Vec<&str> = self.join.fields.iter().map(String::as_str).collect();
            required.extend(self.quantity_fields(side));
            for field in required {
                if self.aliases(side, field).is_empty() {
                    return Err(ReconError::ConfigValidation(format!(
                        "field '{}' has no column aliases on the {} side; add {} = [...] under [{}.columns]",
                        field,
                        side,
                        field,
                        side.config_key()
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn source(&self, side: Side) -> &SourceConfig {
        match side {
            Side::Sap => &self.sap,
            Side::Plm => &self.plm,
        }
    }

    /// Quantity rule for one side, falling back to the side default.
    pub fn rule(&self, side: Side) -> QuantityRule {
        match side {
            Side::Sap => self.sap.rule.unwrap_or(QuantityRule::Ratio),
            Side::Plm => self.plm.rule.unwrap_or(QuantityRule::Direct),
        }
    }

    /// Logical fields the side's quantity rule reads.
    pub fn quantity_fields(&self, side: Side) -> &'static [&'static str] {
        match self.rule(side) {
            QuantityRule::Ratio => &["component_qty", "base_qty"],
            QuantityRule::Direct => &["consumption"],
        }
    }

    /// Candidate column headers for a logical field on one side: the config
    /// override when present, else the built-in list.
    pub fn aliases(&self, side: Side, field: &str) -> Vec<String> {
        if let Some(list) = self.source(side).columns.get(field) {
            return list.clone();
        }
        default_aliases(side, field)
            .iter()
            .map(|s| s.to_string())
            .collect()
    }
}
