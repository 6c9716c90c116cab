//! Key-indexed view of the "before" table.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::{ReconcileError, Side};
use crate::model::{CellScalar, Table};
use crate::normalize::normalize;

/// What to do when two "before" rows normalize to the same key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Later row overwrites the earlier one. An intentional simplification,
    /// not silently-enforced uniqueness.
    LastWins,
    /// Strict mode: fail with `DuplicateKey`.
    Fail,
}

impl Default for DuplicatePolicy {
    fn default() -> Self {
        Self::LastWins
    }
}

/// Fully-normalized "before" rows keyed by normalized key value.
#[derive(Debug, Clone, Default)]
pub struct RowIndex {
    entries: HashMap<String, HashMap<String, String>>,
}

impl RowIndex {
    pub fn get(&self, key: &str) -> Option<&HashMap<String, String>> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Index the "before" table by `key_column`.
///
/// Rows whose key normalizes to the empty sentinel cannot participate in
/// matching and are skipped, not flagged. Every retained row is normalized
/// once here and cached, column by column.
pub fn build_index(
    before: &Table,
    key_column: &str,
    on_duplicate: DuplicatePolicy,
) -> Result<RowIndex, ReconcileError> {
    if !before.has_column(key_column) {
        return Err(ReconcileError::MissingKeyColumn {
            side: Side::Before,
            column: key_column.to_string(),
        });
    }

    let mut entries: HashMap<String, HashMap<String, String>> = HashMap::new();
    for (row_idx, row) in before.rows.iter().enumerate() {
        let key = normalize(row.get(key_column).unwrap_or(&CellScalar::Empty));
        if key.is_empty() {
            continue;
        }
        if on_duplicate == DuplicatePolicy::Fail && entries.contains_key(&key) {
            return Err(ReconcileError::DuplicateKey { key, row: row_idx });
        }

        let record: HashMap<String, String> = before
            .columns
            .iter()
            .map(|col| {
                let value = normalize(row.get(col).unwrap_or(&CellScalar::Empty));
                (col.clone(), value)
            })
            .collect();
        entries.insert(key, record);
    }

    Ok(RowIndex { entries })
}
