// bomrec CLI - SAP vs PLM consumption reconciliation

mod exit_codes;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{EXIT_CONFIG, EXIT_IO, EXIT_PARSE, EXIT_SCHEMA, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "bomrec")]
#[command(about = "Reconcile SAP and PLM material consumption tables")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a reconciliation described by a TOML config file
    #[command(after_help = "\
Examples:
  bomrec run recon.toml
  bomrec run recon.toml --sap sap_export.xlsx --plm plm_export.csv
  bomrec run recon.toml --report out/report.xlsx --quiet
  bomrec run recon.toml --json | jq .summary")]
    Run {
        /// Path to the reconciliation config (TOML)
        config: PathBuf,

        /// SAP input file; overrides `file` under [sap] in the config
        #[arg(long, value_name = "FILE")]
        sap: Option<PathBuf>,

        /// PLM input file; overrides `file` under [plm] in the config
        #[arg(long, value_name = "FILE")]
        plm: Option<PathBuf>,

        /// Write the styled Excel report here; overrides `report` under [output]
        #[arg(long, value_name = "FILE")]
        report: Option<PathBuf>,

        /// Print the full result as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON result here; overrides `json` under [output]
        #[arg(long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Suppress the summary line on stderr
        #[arg(short, long, env = "BOMREC_QUIET")]
        quiet: bool,
    },

    /// Parse and validate a config file without running
    #[command(after_help = "\
Examples:
  bomrec validate recon.toml")]
    Validate {
        /// Path to the reconciliation config (TOML)
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config, sap, plm, report, json, output, quiet } => {
            run::cmd_run(config, sap, plm, report, json, output, quiet)
        }
        Commands::Validate { config } => run::cmd_validate(config),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn usage(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self { code: EXIT_CONFIG, message: msg.into(), hint: None }
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self { code: EXIT_SCHEMA, message: msg.into(), hint: None }
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
