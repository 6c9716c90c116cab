use std::collections::HashMap;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A raw cell value as read from a spreadsheet or CSV source.
///
/// Date cells arrive as Excel serial numbers (`Number`) or ISO text
/// (`Text`); the engine treats every variant as an opaque scalar and only
/// ever compares normalized string forms.
#[derive(Debug, Clone, PartialEq)]
pub enum CellScalar {
    Empty,
    Number(f64),
    Text(String),
    Bool(bool),
}

/// One tabular snapshot: declared column order plus row records.
///
/// Row records only hold non-empty cells; lookups fall back to `Empty`.
#[derive(Debug, Clone, Default)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<HashMap<String, CellScalar>>,
}

impl Table {
    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c == name)
    }
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// "after" column name → "before" column name. At most one entry per
/// "after" column; built once per comparison and immutable thereafter.
pub type ColumnMapping = HashMap<String, String>;

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CellOutcome {
    Unchanged,
    Changed,
    /// Value present before, absent after.
    Missing,
    /// The row's key normalized to the empty sentinel.
    BlankKey,
}

impl CellOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            CellOutcome::Unchanged => "unchanged",
            CellOutcome::Changed => "changed",
            CellOutcome::Missing => "missing",
            CellOutcome::BlankKey => "blank_key",
        }
    }
}

impl std::fmt::Display for CellOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Per-cell verdict: row position in the "after" table, column name, outcome.
#[derive(Debug, Clone, Serialize)]
pub struct CellClassification {
    pub row: usize,
    pub column: String,
    pub outcome: CellOutcome,
}

// ---------------------------------------------------------------------------
// Summary + Report
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default, Serialize)]
pub struct CompareSummary {
    pub after_rows: usize,
    /// "before" rows retained in the key index (blank keys excluded).
    pub indexed_rows: usize,
    pub matched_rows: usize,
    /// Rows whose key had no "before" counterpart; left unclassified.
    pub unmatched_rows: usize,
    pub blank_key_rows: usize,
    pub unchanged_cells: usize,
    pub changed_cells: usize,
    pub missing_cells: usize,
    pub blank_key_cells: usize,
    /// "after" columns (key column excluded) with no mapped counterpart.
    pub unmapped_columns: Vec<String>,
    pub outcome_counts: HashMap<String, usize>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareMeta {
    pub key_column: String,
    pub engine_version: String,
    pub run_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompareReport {
    pub meta: CompareMeta,
    pub summary: CompareSummary,
    pub mapping: ColumnMapping,
    pub cells: Vec<CellClassification>,
}
