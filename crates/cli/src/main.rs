// loadcheck CLI - headless before/after spreadsheet reconciliation

mod compare;
mod exit_codes;
mod suggest;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};

use exit_codes::{
    EXIT_DUPLICATE_KEY, EXIT_INVALID_CONFIG, EXIT_IO, EXIT_MISSING_KEY, EXIT_PARSE, EXIT_SUCCESS,
    EXIT_USAGE,
};

#[derive(Parser)]
#[command(name = "loadcheck")]
#[command(about = "Reconcile before/after snapshots of tabular data")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List sheet names in a workbook
    #[command(after_help = "\
Examples:
  loadcheck sheets preload.xlsx")]
    Sheets {
        /// Excel workbook
        file: PathBuf,
    },

    /// List column names of one sheet
    #[command(after_help = "\
Examples:
  loadcheck columns preload.xlsx
  loadcheck columns preload.xlsx --sheet Sheet4
  loadcheck columns preload.csv")]
    Columns {
        /// Excel workbook or CSV file
        file: PathBuf,

        /// Sheet name (first sheet when omitted; CSV files have none)
        #[arg(long)]
        sheet: Option<String>,
    },

    /// Suggest column mappings between two files (phase 1 of a comparison)
    #[command(after_help = "\
Examples:
  loadcheck suggest --before preload.xlsx --after postload.xlsx
  loadcheck suggest --before preload.xlsx --after postload.xlsx --after-sheet Suppliers
  loadcheck suggest --before pre.csv --after post.csv --threshold 0.8 --json")]
    Suggest {
        /// "before" workbook or CSV file
        #[arg(long)]
        before: PathBuf,

        /// "after" workbook or CSV file
        #[arg(long)]
        after: PathBuf,

        /// Sheet of the "before" workbook (first sheet when omitted)
        #[arg(long)]
        before_sheet: Option<String>,

        /// Sheet of the "after" workbook (first sheet when omitted)
        #[arg(long)]
        after_sheet: Option<String>,

        /// Acceptance threshold for similarity proposals (0..=1)
        #[arg(long, default_value_t = loadcheck_recon::columns::DEFAULT_SIMILARITY_THRESHOLD)]
        threshold: f64,

        /// Output JSON instead of the human-readable listing
        #[arg(long)]
        json: bool,
    },

    /// Run a comparison and write the annotated workbook (phase 2)
    #[command(after_help = "\
Examples:
  loadcheck compare suppliers.compare.toml
  loadcheck compare --before pre.xlsx --after post.xlsx --key ALTKN
  loadcheck compare --before pre.xlsx --after post.xlsx --key ALTKN \\
      --map 'VENDOR_NAME1=Vendor Name 1' --output result.xlsx --report report.json")]
    Compare(compare::CompareArgs),

    /// Validate a comparison config without running it
    #[command(after_help = "\
Examples:
  loadcheck validate suppliers.compare.toml")]
    Validate {
        /// TOML comparison config
        config: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Sheets { file } => suggest::cmd_sheets(&file),
        Commands::Columns { file, sheet } => suggest::cmd_columns(&file, sheet.as_deref()),
        Commands::Suggest {
            before,
            after,
            before_sheet,
            after_sheet,
            threshold,
            json,
        } => suggest::cmd_suggest(
            &before,
            &after,
            before_sheet.as_deref(),
            after_sheet.as_deref(),
            threshold,
            json,
        ),
        Commands::Compare(args) => compare::cmd_compare(args),
        Commands::Validate { config } => compare::cmd_validate(&config),
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

    pub fn parse(msg: impl Into<String>) -> Self {
        Self { code: EXIT_PARSE, message: msg.into(), hint: None }
    }

    /// Map an engine error onto the exit-code registry.
    pub fn engine(err: loadcheck_recon::ReconcileError) -> Self {
        use loadcheck_recon::ReconcileError as E;
        let code = match &err {
            E::MissingKeyColumn { .. } => EXIT_MISSING_KEY,
            E::DuplicateKey { .. } => EXIT_DUPLICATE_KEY,
            E::MalformedInput(_) => EXIT_PARSE,
            E::ConfigParse(_) | E::ConfigValidation(_) => EXIT_INVALID_CONFIG,
            E::Io(_) => EXIT_IO,
        };
        let hint = match &err {
            E::DuplicateKey { .. } => {
                Some("rerun without --strict-duplicates to keep the last row per key".to_string())
            }
            _ => None,
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
