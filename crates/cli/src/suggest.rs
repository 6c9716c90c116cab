//! `loadcheck sheets` / `columns` / `suggest` — pre-run schema inspection.
//!
//! `suggest` is phase 1 of the two-phase mapping protocol: it prints the
//! automatic candidates so a caller can confirm or override them, then run
//! `compare` with `--map` (or a config `[pairs.columns]` table) as phase 2.

use std::path::Path;

use loadcheck_recon::columns::{similar_mapping, suggest_candidates};
use loadcheck_recon::model::Table;

use crate::CliError;

pub fn cmd_sheets(file: &Path) -> Result<(), CliError> {
    if is_delimited_text(file) {
        return Err(CliError::usage(format!(
            "{} is a delimited text file and has no sheets",
            file.display()
        )));
    }
    for name in loadcheck_io::xlsx::sheet_names(file).map_err(CliError::parse)? {
        println!("{}", name);
    }
    Ok(())
}

pub fn cmd_columns(file: &Path, sheet: Option<&str>) -> Result<(), CliError> {
    let table = read_table(file, sheet)?;
    for column in &table.columns {
        println!("{}", column);
    }
    Ok(())
}

pub fn cmd_suggest(
    before: &Path,
    after: &Path,
    before_sheet: Option<&str>,
    after_sheet: Option<&str>,
    threshold: f64,
    json: bool,
) -> Result<(), CliError> {
    if !(0.0..=1.0).contains(&threshold) {
        return Err(CliError::usage(format!(
            "--threshold must be within 0..=1, got {threshold}"
        )));
    }

    let before_table = read_table(before, before_sheet)?;
    let after_table = read_table(after, after_sheet)?;

    let candidates = suggest_candidates(&before_table.columns, &after_table.columns);
    let similar = similar_mapping(&before_table.columns, &after_table.columns, threshold);

    if json {
        let payload = serde_json::json!({
            "candidates": candidates,
            "similar": similar,
        });
        let rendered = serde_json::to_string_pretty(&payload)
            .map_err(|e| CliError::io(format!("JSON serialization error: {e}")))?;
        println!("{rendered}");
        return Ok(());
    }

    for after_col in &after_table.columns {
        match candidates.get(after_col) {
            Some(matches) => println!("{} <- {}", after_col, matches.join(" | ")),
            None => println!("{} <- (no identity match)", after_col),
        }
    }

    if !similar.is_empty() {
        println!();
        println!("similarity proposals (threshold {threshold}):");
        for before_col in &before_table.columns {
            if let Some(after_col) = similar.get(before_col) {
                println!("{} ~ {}", before_col, after_col);
            }
        }
    }

    Ok(())
}

/// Read a tabular source: delimited text by extension, otherwise an Excel
/// workbook.
pub fn read_table(file: &Path, sheet: Option<&str>) -> Result<Table, CliError> {
    if is_delimited_text(file) {
        if sheet.is_some() {
            return Err(CliError::usage(format!(
                "{} is a delimited text file; sheet selection does not apply",
                file.display()
            )));
        }
        loadcheck_io::csv::read_table(file).map_err(CliError::parse)
    } else {
        loadcheck_io::xlsx::read_table(file, sheet).map_err(CliError::parse)
    }
}

fn is_delimited_text(file: &Path) -> bool {
    file.extension()
        .and_then(|e| e.to_str())
        .map(|e| {
            e.eq_ignore_ascii_case("csv")
                || e.eq_ignore_ascii_case("tsv")
                || e.eq_ignore_ascii_case("txt")
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn delimited_text_detection() {
        assert!(is_delimited_text(Path::new("data.csv")));
        assert!(is_delimited_text(Path::new("data.TSV")));
        assert!(!is_delimited_text(Path::new("data.xlsx")));
        assert!(!is_delimited_text(Path::new("data")));
    }
}
