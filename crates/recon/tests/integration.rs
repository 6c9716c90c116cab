use std::path::PathBuf;

use loadcheck_recon::config::CompareConfig;
use loadcheck_recon::engine::{compare_tables, load_csv_table, CompareOptions};
use loadcheck_recon::error::ReconcileError;
use loadcheck_recon::index::DuplicatePolicy;
use loadcheck_recon::model::{CellOutcome, CompareReport, Table};

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

fn load_fixture(name: &str) -> Table {
    let path = fixtures_dir().join(name);
    let data = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("cannot read {}: {e}", path.display()));
    load_csv_table(&data).unwrap()
}

fn run_suppliers(on_duplicate: DuplicatePolicy) -> Result<CompareReport, ReconcileError> {
    let before = load_fixture("suppliers-before.csv");
    let after = load_fixture("suppliers-after.csv");
    let options = CompareOptions {
        key_column: "ALTKN".to_string(),
        overrides: Default::default(),
        on_duplicate,
    };
    compare_tables(&before, &after, &options)
}

#[test]
fn supplier_fixture_end_to_end() {
    let report = run_suppliers(DuplicatePolicy::LastWins).unwrap();
    let s = &report.summary;

    assert_eq!(s.after_rows, 5);
    assert_eq!(s.indexed_rows, 3); // duplicate A-300 collapsed
    assert_eq!(s.matched_rows, 3);
    assert_eq!(s.unmatched_rows, 1); // A-999 has no preload counterpart
    assert_eq!(s.blank_key_rows, 1);
    assert_eq!(s.changed_cells, 1);
    assert_eq!(s.missing_cells, 1);
    assert_eq!(s.blank_key_cells, 5);
    assert_eq!(s.unchanged_cells, 13);
    assert!(s.unmapped_columns.is_empty());
}

#[test]
fn supplier_fixture_column_resolution() {
    let report = run_suppliers(DuplicatePolicy::LastWins).unwrap();
    assert_eq!(report.mapping["VENDOR_NAME1"], "Vendor Name 1");
    assert_eq!(report.mapping["CITY"], "City Code");
    assert_eq!(report.mapping["POSTAL_CODE"], "Postal");
    assert_eq!(report.mapping["REGION"], "Region");
}

#[test]
fn supplier_fixture_cell_outcomes() {
    let report = run_suppliers(DuplicatePolicy::LastWins).unwrap();

    let outcome = |row: usize, column: &str| {
        report
            .cells
            .iter()
            .find(|c| c.row == row && c.column == column)
            .map(|c| c.outcome)
    };

    // Renamed vendor on row 1; postal code vanished on the same row.
    assert_eq!(outcome(1, "VENDOR_NAME1"), Some(CellOutcome::Changed));
    assert_eq!(outcome(1, "POSTAL_CODE"), Some(CellOutcome::Missing));
    // Leading-zero postal ("0150") compares equal through normalization.
    assert_eq!(outcome(1, "CITY"), Some(CellOutcome::Unchanged));
    // A-999 never went through the comparison at all.
    assert_eq!(outcome(2, "VENDOR_NAME1"), None);
    // Blank key marks the entire row.
    assert_eq!(outcome(3, "ALTKN"), Some(CellOutcome::BlankKey));
    assert_eq!(outcome(3, "REGION"), Some(CellOutcome::BlankKey));
    // The duplicate preload row was overwritten: the later name wins.
    assert_eq!(outcome(4, "VENDOR_NAME1"), Some(CellOutcome::Unchanged));
}

#[test]
fn supplier_fixture_strict_duplicates() {
    let err = run_suppliers(DuplicatePolicy::Fail).unwrap_err();
    match err {
        ReconcileError::DuplicateKey { key, row } => {
            assert_eq!(key, "A-300");
            assert_eq!(row, 3);
        }
        other => panic!("expected DuplicateKey, got {other:?}"),
    }
}

#[test]
fn compare_config_fixture_parses() {
    let path = fixtures_dir().join("suppliers.compare.toml");
    let data = std::fs::read_to_string(path).unwrap();
    let config = CompareConfig::from_toml(&data).unwrap();
    assert_eq!(config.name, "Supplier master postload check");
    assert_eq!(config.before.file, "suppliers-before.csv");
    assert_eq!(config.pairs.len(), 1);
    assert_eq!(config.pairs[0].key_column, "ALTKN");
}

#[test]
fn report_serializes_to_json() {
    let report = run_suppliers(DuplicatePolicy::LastWins).unwrap();
    let json = serde_json::to_string(&report).unwrap();
    assert!(json.contains("\"blank_key\""));
    assert!(json.contains("\"key_column\":\"ALTKN\""));
}
