//! `loadcheck compare` / `validate` — run comparisons, write the annotated
//! workbook.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use clap::Args;

use loadcheck_io::annotate::{write_annotated, AnnotatedSheet};
use loadcheck_recon::columns::similar_mapping;
use loadcheck_recon::config::{
    CompareConfig, MatchingConfig, OutputConfig, PairConfig, SourceConfig,
};
use loadcheck_recon::engine::{compare_tables, CompareOptions};
use loadcheck_recon::index::DuplicatePolicy;
use loadcheck_recon::model::{CompareReport, Table};

use crate::exit_codes::EXIT_DIFFS;
use crate::suggest::read_table;
use crate::CliError;

#[derive(Args)]
pub struct CompareArgs {
    /// TOML comparison config; omit when using --before/--after/--key
    pub config: Option<PathBuf>,

    /// "before" workbook or CSV file
    #[arg(long)]
    pub before: Option<PathBuf>,

    /// "after" workbook or CSV file
    #[arg(long)]
    pub after: Option<PathBuf>,

    /// Key column correlating before rows with after rows
    #[arg(long)]
    pub key: Option<String>,

    /// Sheet of the "before" workbook (first sheet when omitted)
    #[arg(long)]
    pub before_sheet: Option<String>,

    /// Sheet of the "after" workbook (first sheet when omitted)
    #[arg(long)]
    pub after_sheet: Option<String>,

    /// Column override AFTER=BEFORE, replacing the automatic match; repeatable
    #[arg(long, value_name = "AFTER=BEFORE")]
    pub map: Vec<String>,

    /// Annotated workbook path
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,

    /// Write the JSON report to a file
    #[arg(long)]
    pub report: Option<PathBuf>,

    /// Fail on duplicate keys in the before dataset
    #[arg(long)]
    pub strict_duplicates: bool,

    /// Print the JSON report to stdout
    #[arg(long)]
    pub json: bool,
}

pub fn cmd_compare(args: CompareArgs) -> Result<(), CliError> {
    let (config, base_dir) = load_or_build_config(&args)?;
    run_config(&config, &base_dir, &args)
}

pub fn cmd_validate(config_path: &Path) -> Result<(), CliError> {
    let config_str = std::fs::read_to_string(config_path)
        .map_err(|e| CliError::io(format!("cannot read config: {e}")))?;
    let config = CompareConfig::from_toml(&config_str).map_err(CliError::engine)?;
    eprintln!(
        "valid: '{}' with {} sheet pair(s)",
        config.name,
        config.pairs.len(),
    );
    Ok(())
}

fn load_or_build_config(args: &CompareArgs) -> Result<(CompareConfig, PathBuf), CliError> {
    let inline_flags = args.before.is_some()
        || args.after.is_some()
        || args.key.is_some()
        || args.before_sheet.is_some()
        || args.after_sheet.is_some()
        || !args.map.is_empty();

    let (mut config, base_dir) = match &args.config {
        Some(config_path) => {
            if inline_flags {
                return Err(CliError::usage(
                    "pass either a config file or --before/--after/--key, not both",
                ));
            }
            let config_str = std::fs::read_to_string(config_path)
                .map_err(|e| CliError::io(format!("cannot read config: {e}")))?;
            let config = CompareConfig::from_toml(&config_str).map_err(CliError::engine)?;
            let base_dir = config_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf();
            (config, base_dir)
        }
        None => {
            let (before, after, key) = match (&args.before, &args.after, &args.key) {
                (Some(before), Some(after), Some(key)) => (before, after, key),
                _ => {
                    return Err(CliError::usage(
                        "--before, --after and --key are required without a config file",
                    )
                    .with_hint("or pass a .compare.toml config as the first argument"));
                }
            };
            let config = CompareConfig {
                name: "ad hoc comparison".to_string(),
                before: SourceConfig { file: before.display().to_string() },
                after: SourceConfig { file: after.display().to_string() },
                pairs: vec![PairConfig {
                    before_sheet: args.before_sheet.clone(),
                    after_sheet: args.after_sheet.clone(),
                    key_column: key.clone(),
                    columns: parse_map_overrides(&args.map)?,
                }],
                matching: MatchingConfig::default(),
                output: OutputConfig::default(),
            };
            (config, PathBuf::from("."))
        }
    };

    if args.strict_duplicates {
        config.matching.on_duplicate_key = DuplicatePolicy::Fail;
    }

    config.validate().map_err(CliError::engine)?;
    Ok((config, base_dir))
}

fn parse_map_overrides(entries: &[String]) -> Result<HashMap<String, String>, CliError> {
    let mut overrides = HashMap::new();
    for entry in entries {
        match entry.split_once('=') {
            Some((after_col, before_col)) if !after_col.is_empty() && !before_col.is_empty() => {
                overrides.insert(after_col.to_string(), before_col.to_string());
            }
            _ => {
                return Err(CliError::usage(format!(
                    "--map '{entry}': expected AFTER=BEFORE"
                )));
            }
        }
    }
    Ok(overrides)
}

fn run_config(config: &CompareConfig, base_dir: &Path, args: &CompareArgs) -> Result<(), CliError> {
    let before_path = base_dir.join(&config.before.file);
    let after_path = base_dir.join(&config.after.file);

    let mut pair_results: Vec<(String, Table, CompareReport)> =
        Vec::with_capacity(config.pairs.len());

    for pair in &config.pairs {
        let before_table = read_table(&before_path, pair.before_sheet.as_deref())?;
        let after_table = read_table(&after_path, pair.after_sheet.as_deref())?;

        let options = CompareOptions {
            key_column: pair.key_column.clone(),
            overrides: pair.columns.clone(),
            on_duplicate: config.matching.on_duplicate_key,
        };
        let report =
            compare_tables(&before_table, &after_table, &options).map_err(CliError::engine)?;

        let sheet_name = pair
            .after_sheet
            .clone()
            .unwrap_or_else(|| default_sheet_name(&after_path));

        let s = &report.summary;
        eprintln!(
            "{}: {} rows — {} changed, {} missing, {} blank-key, {} unmatched",
            sheet_name,
            s.after_rows,
            s.changed_cells,
            s.missing_cells,
            s.blank_key_rows,
            s.unmatched_rows,
        );

        // Unmapped columns: surface fuzzy proposals so the caller can
        // confirm them with --map / [pairs.columns] on the next run.
        if !s.unmapped_columns.is_empty() {
            let proposals = similar_mapping(
                &before_table.columns,
                &after_table.columns,
                config.matching.similarity_threshold,
            );
            for after_col in &s.unmapped_columns {
                let closest = proposals
                    .iter()
                    .find_map(|(before_col, proposed)| (proposed == after_col).then_some(before_col));
                match closest {
                    Some(before_col) => eprintln!(
                        "  no mapping for '{after_col}'; closest before column: '{before_col}'"
                    ),
                    None => eprintln!("  no mapping for '{after_col}'"),
                }
            }
        }

        pair_results.push((sheet_name, after_table, report));
    }

    // Annotated workbook: one worksheet per pair
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| base_dir.join(&config.output.file));
    let sheets: Vec<AnnotatedSheet<'_>> = pair_results
        .iter()
        .map(|(name, table, report)| AnnotatedSheet {
            name: name.clone(),
            table,
            cells: &report.cells,
        })
        .collect();
    write_annotated(&output_path, &sheets).map_err(CliError::io)?;
    eprintln!("wrote {}", output_path.display());

    // JSON report: to file when configured, to stdout behind --json
    let report_path = args
        .report
        .clone()
        .or_else(|| config.output.json.as_ref().map(|p| base_dir.join(p)));
    if report_path.is_some() || args.json {
        let payload = serde_json::json!({
            "name": config.name,
            "workbook": output_path.display().to_string(),
            "pairs": pair_results
                .iter()
                .map(|(name, _, report)| serde_json::json!({ "sheet": name, "report": report }))
                .collect::<Vec<_>>(),
        });
        let json_str = serde_json::to_string_pretty(&payload)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;

        if let Some(path) = report_path {
            std::fs::write(&path, &json_str)
                .map_err(|e| CliError::io(format!("cannot write report: {e}")))?;
            eprintln!("wrote {}", path.display());
        }
        if args.json {
            println!("{json_str}");
        }
    }

    let has_diffs = pair_results.iter().any(|(_, _, report)| {
        let s = &report.summary;
        s.changed_cells + s.missing_cells + s.blank_key_cells > 0
    });
    if has_diffs {
        return Err(CliError { code: EXIT_DIFFS, message: "differences found".to_string(), hint: None });
    }

    Ok(())
}

/// Worksheet name for a pair with no explicit after-sheet (CSV input).
fn default_sheet_name(after_path: &Path) -> String {
    after_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("after")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args_for(dir: &Path, before: &str, after: &str, key: &str) -> CompareArgs {
        CompareArgs {
            config: None,
            before: Some(dir.join(before)),
            after: Some(dir.join(after)),
            key: Some(key.to_string()),
            before_sheet: None,
            after_sheet: None,
            map: Vec::new(),
            output: Some(dir.join("result.xlsx")),
            report: Some(dir.join("report.json")),
            strict_duplicates: false,
            json: false,
        }
    }

    #[test]
    fn map_overrides_parse() {
        let overrides =
            parse_map_overrides(&["NAME=Vendor Name".to_string(), "CITY=City Code".to_string()])
                .unwrap();
        assert_eq!(overrides["NAME"], "Vendor Name");
        assert_eq!(overrides["CITY"], "City Code");
    }

    #[test]
    fn map_overrides_reject_bad_syntax() {
        assert!(parse_map_overrides(&["NAME".to_string()]).is_err());
        assert!(parse_map_overrides(&["=X".to_string()]).is_err());
        assert!(parse_map_overrides(&["X=".to_string()]).is_err());
    }

    #[test]
    fn inline_flags_conflict_with_config_file() {
        let mut args = args_for(Path::new("."), "b.csv", "a.csv", "ID");
        args.config = Some(PathBuf::from("check.compare.toml"));
        let err = load_or_build_config(&args).unwrap_err();
        assert_eq!(err.code, crate::exit_codes::EXIT_USAGE);
    }

    #[test]
    fn compare_writes_annotated_workbook_and_report() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("before.csv"),
            "ID,Name,City\n1,Acme,Berlin\n2,Borealis,Oslo\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("after.csv"),
            "ID,NAME,CITY\n1,Acme,Berlin\n2,Borealis AS,Oslo\n",
        )
        .unwrap();

        let args = args_for(dir.path(), "before.csv", "after.csv", "ID");
        let err = cmd_compare(args).unwrap_err();
        // The renamed vendor counts as a difference: diff(1) convention.
        assert_eq!(err.code, EXIT_DIFFS);

        let result_path = dir.path().join("result.xlsx");
        let table = loadcheck_io::xlsx::read_table(&result_path, Some("after")).unwrap();
        assert_eq!(table.columns, vec!["ID", "NAME", "CITY"]);
        assert_eq!(table.rows.len(), 2);

        let report: serde_json::Value = serde_json::from_str(
            &std::fs::read_to_string(dir.path().join("report.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(report["pairs"][0]["report"]["summary"]["changed_cells"], 1);
    }

    #[test]
    fn compare_identical_files_exits_clean() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("before.csv"), "ID,Name\n1,Acme\n").unwrap();
        std::fs::write(dir.path().join("after.csv"), "ID,Name\n1,Acme\n").unwrap();

        let mut args = args_for(dir.path(), "before.csv", "after.csv", "ID");
        args.report = None;
        cmd_compare(args).unwrap();
        assert!(dir.path().join("result.xlsx").exists());
    }
}
