//! Cell-level reconciliation of an "after" table against an indexed
//! "before" table.

use std::collections::HashMap;

use crate::columns::resolve_mapping;
use crate::error::{ReconcileError, Side};
use crate::index::{build_index, DuplicatePolicy, RowIndex};
use crate::model::{
    CellClassification, CellOutcome, CellScalar, ColumnMapping, CompareMeta, CompareReport, Table,
};
use crate::normalize::normalize;
use crate::summary::compute_summary;

/// Per-comparison options for [`compare_tables`].
#[derive(Debug, Clone, Default)]
pub struct CompareOptions {
    pub key_column: String,
    /// Caller-confirmed mapping entries ("after" column → "before" column);
    /// these replace whatever the automatic resolver would produce.
    pub overrides: HashMap<String, String>,
    pub on_duplicate: DuplicatePolicy,
}

/// Classify every cell of the "after" table. Single linear pass; fully
/// deterministic for identical inputs.
///
/// Per row: a blank key marks the whole row `BlankKey`; a key with no
/// index entry yields no classifications (nothing to compare against —
/// the row is counted as unmatched in the summary); a matched key
/// classifies each non-key cell against the mapped "before" value, and
/// the key cell itself as `Unchanged`.
pub fn reconcile(
    after: &Table,
    index: &RowIndex,
    mapping: &ColumnMapping,
    key_column: &str,
) -> Vec<CellClassification> {
    let mut cells = Vec::new();

    for (row_idx, row) in after.rows.iter().enumerate() {
        let key = normalize(row.get(key_column).unwrap_or(&CellScalar::Empty));

        if key.is_empty() {
            for column in &after.columns {
                cells.push(CellClassification {
                    row: row_idx,
                    column: column.clone(),
                    outcome: CellOutcome::BlankKey,
                });
            }
            continue;
        }

        let record = match index.get(&key) {
            Some(record) => record,
            None => continue,
        };

        for column in &after.columns {
            let outcome = if column == key_column {
                CellOutcome::Unchanged
            } else {
                let post_value = normalize(row.get(column).unwrap_or(&CellScalar::Empty));
                match mapping.get(column) {
                    // No corresponding "before" column: nothing to compare
                    // against, so the cell cannot have changed.
                    None => CellOutcome::Unchanged,
                    Some(before_col) => {
                        let pre_value =
                            record.get(before_col).map(String::as_str).unwrap_or("");
                        if post_value == pre_value {
                            CellOutcome::Unchanged
                        } else if post_value.is_empty() && !pre_value.is_empty() {
                            CellOutcome::Missing
                        } else {
                            CellOutcome::Changed
                        }
                    }
                }
            };
            cells.push(CellClassification {
                row: row_idx,
                column: column.clone(),
                outcome,
            });
        }
    }

    cells
}

/// The primary entry point: resolve the column mapping, apply overrides,
/// index the "before" table and classify every "after" cell.
///
/// An input with zero rows is not an error; it yields zero classifications.
pub fn compare_tables(
    before: &Table,
    after: &Table,
    options: &CompareOptions,
) -> Result<CompareReport, ReconcileError> {
    let key_column = options.key_column.as_str();

    // The key column must exist on both sides; never silently defaulted.
    if !before.has_column(key_column) {
        return Err(ReconcileError::MissingKeyColumn {
            side: Side::Before,
            column: key_column.to_string(),
        });
    }
    if !after.has_column(key_column) {
        return Err(ReconcileError::MissingKeyColumn {
            side: Side::After,
            column: key_column.to_string(),
        });
    }

    validate_overrides(&options.overrides, before, after)?;

    let mut mapping = resolve_mapping(&before.columns, &after.columns);
    for (after_col, before_col) in &options.overrides {
        mapping.insert(after_col.clone(), before_col.clone());
    }

    let index = build_index(before, key_column, options.on_duplicate)?;

    let cells = if before.rows.is_empty() || after.rows.is_empty() {
        Vec::new()
    } else {
        reconcile(after, &index, &mapping, key_column)
    };

    let summary = compute_summary(after, &index, &mapping, key_column, &cells);

    Ok(CompareReport {
        meta: CompareMeta {
            key_column: key_column.to_string(),
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        mapping,
        cells,
    })
}

fn validate_overrides(
    overrides: &HashMap<String, String>,
    before: &Table,
    after: &Table,
) -> Result<(), ReconcileError> {
    for (after_col, before_col) in overrides {
        if !after.has_column(after_col) {
            return Err(ReconcileError::ConfigValidation(format!(
                "override '{after_col}': not a column of the after dataset"
            )));
        }
        if !before.has_column(before_col) {
            return Err(ReconcileError::ConfigValidation(format!(
                "override '{after_col}' -> '{before_col}': not a column of the before dataset"
            )));
        }
    }
    Ok(())
}

/// Load an in-memory CSV string (header row required) into a `Table`.
pub fn load_csv_table(csv_data: &str) -> Result<Table, ReconcileError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| ReconcileError::MalformedInput(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconcileError::MalformedInput(e.to_string()))?;
        let mut row = HashMap::new();
        for (idx, column) in columns.iter().enumerate() {
            if let Some(field) = record.get(idx) {
                if !field.is_empty() {
                    row.insert(column.clone(), CellScalar::Text(field.to_string()));
                }
            }
        }
        rows.push(row);
    }

    Ok(Table { columns, rows })
}
