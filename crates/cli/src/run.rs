//! `bomrec run` and `bomrec validate`.
//!
//! Orchestrates the full pipeline: load the config, load both input
//! tables, reconcile, then emit whatever outputs the run asked for.

use std::path::{Path, PathBuf};

use bomrec_engine::{JoinType, ReconConfig, ReconError, Side, SourceTable, ToleranceMode};
use bomrec_io::{load_table, report};

use crate::exit_codes::EXIT_DISCREPANCIES;
use crate::CliError;

#[allow(clippy::too_many_arguments)]
pub fn cmd_run(
    config_path: PathBuf,
    sap_file: Option<PathBuf>,
    plm_file: Option<PathBuf>,
    report_file: Option<PathBuf>,
    json_stdout: bool,
    output_file: Option<PathBuf>,
    quiet: bool,
) -> Result<(), CliError> {
    let config = load_config(&config_path)?;

    // Paths in the config resolve relative to the config file's directory.
    let base_dir = config_path.parent().unwrap_or_else(|| Path::new("."));

    let sap_path = input_path(&config, Side::Sap, sap_file, base_dir)?;
    let plm_path = input_path(&config, Side::Plm, plm_file, base_dir)?;

    let sap = load_input(&sap_path)?;
    let plm = load_input(&plm_path)?;

    let result = match bomrec_engine::run(&config, &sap, &plm) {
        Ok(result) => result,
        Err(err) => return Err(engine_error(err, &sap, &plm)),
    };

    let json = serde_json::to_string_pretty(&result)
        .map_err(|e| CliError::io(format!("cannot serialize result: {}", e)))?;

    let json_path = resolve_output(output_file, config.output.json.as_deref(), base_dir);
    if let Some(path) = &json_path {
        std::fs::write(path, &json)
            .map_err(|e| CliError::io(format!("cannot write {}: {}", path.display(), e)))?;
        eprintln!("wrote {}", path.display());
    }

    let report_path = resolve_output(report_file, config.output.report.as_deref(), base_dir);
    if let Some(path) = &report_path {
        report::export(&result, path).map_err(CliError::io)?;
        eprintln!("wrote {}", path.display());
    }

    if json_stdout {
        println!("{}", json);
    }

    if !quiet {
        let s = &result.summary;
        eprintln!(
            "{}: {} records, {} matched, {} SAP higher, {} PLM higher, {} missing in PLM, {} missing in SAP",
            result.meta.config_name,
            s.total_records,
            s.matched,
            s.sap_higher,
            s.plm_higher,
            s.missing_in_plm,
            s.missing_in_sap,
        );
    }

    if result.summary.discrepancies() > 0 {
        return Err(CliError {
            code: EXIT_DISCREPANCIES,
            message: "discrepancies found".to_string(),
            hint: None,
        });
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;

    let join = match config.join.how {
        JoinType::Outer => "outer",
        JoinType::Left => "left",
    };
    let tolerance = match config.tolerance.mode {
        ToleranceMode::Absolute => format!("{}", config.tolerance.value),
        ToleranceMode::Percentage => format!("{}%", config.tolerance.value),
    };
    eprintln!(
        "valid: '{}' joins on [{}] ({}), tolerance {}, precision {}",
        config.name,
        config.join.fields.join(", "),
        join,
        tolerance,
        config.precision,
    );
    Ok(())
}

fn load_config(path: &Path) -> Result<ReconConfig, CliError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read {}: {}", path.display(), e)))?;
    ReconConfig::from_toml(&text).map_err(|e| CliError::config(e.to_string()))
}

/// A `--sap`/`--plm` flag wins over the config; flag paths are taken as
/// given while config paths resolve against the config's directory.
fn input_path(
    config: &ReconConfig,
    side: Side,
    flag: Option<PathBuf>,
    base_dir: &Path,
) -> Result<PathBuf, CliError> {
    if let Some(path) = flag {
        return Ok(path);
    }
    match &config.source(side).file {
        Some(file) => Ok(base_dir.join(file)),
        None => Err(CliError::usage(format!("no {} input file", side)).with_hint(format!(
            "pass --{key} FILE or set `file` under [{key}] in the config",
            key = side.config_key()
        ))),
    }
}

fn load_input(path: &Path) -> Result<SourceTable, CliError> {
    if let Err(e) = std::fs::metadata(path) {
        return Err(CliError::io(format!("cannot read {}: {}", path.display(), e)));
    }
    load_table(path).map_err(CliError::parse)
}

fn resolve_output(flag: Option<PathBuf>, config: Option<&str>, base_dir: &Path) -> Option<PathBuf> {
    flag.or_else(|| config.map(|p| base_dir.join(p)))
}

/// Schema errors get a hint listing what the offending table actually
/// contains, so the fix is a column alias away.
fn engine_error(err: ReconError, sap: &SourceTable, plm: &SourceTable) -> CliError {
    match &err {
        ReconError::Schema { side, .. } => {
            let table = match side {
                Side::Sap => sap,
                Side::Plm => plm,
            };
            CliError::schema(err.to_string())
                .with_hint(format!("columns present: {}", table.headers().join(", ")))
        }
        _ => CliError::config(err.to_string()),
    }
}
