//! Summary statistics over a classification sequence.

use std::collections::{BTreeSet, HashMap};

use crate::index::RowIndex;
use crate::model::{CellClassification, CellOutcome, ColumnMapping, CompareSummary, Table};

/// Compute row- and cell-level counts for a finished comparison.
///
/// Row categories are recovered from the cells themselves: a row with
/// blank-key cells is blank-keyed, any other classified row was matched,
/// and rows with no classifications at all had no "before" counterpart.
pub fn compute_summary(
    after: &Table,
    index: &RowIndex,
    mapping: &ColumnMapping,
    key_column: &str,
    cells: &[CellClassification],
) -> CompareSummary {
    let mut outcome_counts: HashMap<String, usize> = HashMap::new();
    let mut unchanged_cells = 0;
    let mut changed_cells = 0;
    let mut missing_cells = 0;
    let mut blank_key_cells = 0;
    let mut matched_rows: BTreeSet<usize> = BTreeSet::new();
    let mut blank_rows: BTreeSet<usize> = BTreeSet::new();

    for cell in cells {
        *outcome_counts.entry(cell.outcome.to_string()).or_insert(0) += 1;
        match cell.outcome {
            CellOutcome::Unchanged => {
                unchanged_cells += 1;
                matched_rows.insert(cell.row);
            }
            CellOutcome::Changed => {
                changed_cells += 1;
                matched_rows.insert(cell.row);
            }
            CellOutcome::Missing => {
                missing_cells += 1;
                matched_rows.insert(cell.row);
            }
            CellOutcome::BlankKey => {
                blank_key_cells += 1;
                blank_rows.insert(cell.row);
            }
        }
    }

    let unmapped_columns: Vec<String> = after
        .columns
        .iter()
        .filter(|c| c.as_str() != key_column && !mapping.contains_key(c.as_str()))
        .cloned()
        .collect();

    let after_rows = after.rows.len();
    let matched = matched_rows.len();
    let blank_key_rows = blank_rows.len();

    CompareSummary {
        after_rows,
        indexed_rows: index.len(),
        matched_rows: matched,
        unmatched_rows: after_rows - matched - blank_key_rows,
        blank_key_rows,
        unchanged_cells,
        changed_cells,
        missing_cells,
        blank_key_cells,
        unmapped_columns,
        outcome_counts,
    }
}
