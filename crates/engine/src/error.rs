use std::fmt;

use crate::model::Side;

/// A required logical field that could not be resolved to a column.
#[derive(Debug, Clone)]
pub struct MissingColumn {
    pub field: String,
    /// Column names that were tried, in order.
    pub aliases: Vec<String>,
}

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (bad tolerance, unresolvable join field, etc.).
    ConfigValidation(String),
    /// Required columns missing from an input table. Fatal; detected before
    /// any normalization is attempted.
    Schema { side: Side, missing: Vec<MissingColumn> },
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Schema { side, missing } => {
                write!(f, "{side} table: missing required column(s): ")?;
                for (i, m) in missing.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{} (looked for ", m.field)?;
                    for (j, alias) in m.aliases.iter().enumerate() {
                        if j > 0 {
                            write!(f, ", ")?;
                        }
                        write!(f, "\"{alias}\"")?;
                    }
                    write!(f, ")")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ReconError {}
