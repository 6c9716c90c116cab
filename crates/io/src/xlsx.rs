// Excel workbook reading for reconciliation input

use std::collections::HashMap;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};

use loadcheck_recon::model::{CellScalar, Table};

/// Sheet names in workbook order.
pub fn sheet_names(path: &Path) -> Result<Vec<String>, String> {
    let workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file: {}", e))?;
    Ok(workbook.sheet_names().to_vec())
}

/// Read one worksheet into a `Table`. The first row of the used range is
/// the header row; `sheet = None` reads the first sheet.
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table, String> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open Excel file: {}", e))?;

    let names: Vec<String> = workbook.sheet_names().to_vec();
    if names.is_empty() {
        return Err("Excel file contains no sheets".to_string());
    }

    let sheet_name = match sheet {
        Some(name) => names
            .iter()
            .find(|n| n.as_str() == name)
            .ok_or_else(|| {
                format!("Sheet '{}' not found (available: {})", name, names.join(", "))
            })?
            .clone(),
        None => names[0].clone(),
    };

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("Failed to read sheet '{}': {}", sheet_name, e))?;

    let mut rows_iter = range.rows();
    let header = match rows_iter.next() {
        Some(header) => header,
        None => return Ok(Table::default()),
    };
    let columns = header_names(header);

    let mut rows = Vec::new();
    for row in rows_iter {
        let mut record = HashMap::new();
        for (col_idx, cell) in row.iter().enumerate() {
            // Cells beyond the header width have no addressable name.
            let column = match columns.get(col_idx) {
                Some(column) => column,
                None => break,
            };
            match scalar_from(cell) {
                CellScalar::Empty => {}
                value => {
                    record.insert(column.clone(), value);
                }
            }
        }
        rows.push(record);
    }

    Ok(Table { columns, rows })
}

/// Header cells become column names. Blanks are synthesized positionally
/// and duplicates get a numeric suffix so row records stay addressable.
fn header_names(header: &[Data]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::with_capacity(header.len());
    let mut seen: HashMap<String, usize> = HashMap::new();

    for (idx, cell) in header.iter().enumerate() {
        let mut name = match cell {
            Data::Empty => String::new(),
            Data::String(s) => s.trim().to_string(),
            other => other.to_string(),
        };
        if name.is_empty() {
            name = format!("COLUMN{}", idx + 1);
        }
        let count = seen.entry(name.clone()).or_insert(0);
        *count += 1;
        if *count > 1 {
            name = format!("{}_{}", name, *count);
        }
        columns.push(name);
    }

    columns
}

/// Map a calamine cell onto the engine's scalar model.
fn scalar_from(cell: &Data) -> CellScalar {
    match cell {
        Data::Empty => CellScalar::Empty,
        Data::String(s) => {
            if s.is_empty() {
                CellScalar::Empty
            } else {
                CellScalar::Text(s.clone())
            }
        }
        Data::Float(n) => CellScalar::Number(*n),
        Data::Int(n) => CellScalar::Number(*n as f64),
        Data::Bool(b) => CellScalar::Bool(*b),
        Data::Error(e) => CellScalar::Text(format!("#{:?}", e)),
        // Date/duration cells keep their serial or ISO form; the engine
        // compares normalized strings, not calendar values.
        Data::DateTime(dt) => CellScalar::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellScalar::Text(s.clone()),
        Data::DurationIso(s) => CellScalar::Text(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_xlsxwriter::Workbook;

    fn sample_workbook(dir: &Path) -> std::path::PathBuf {
        let path = dir.join("sample.xlsx");
        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet().set_name("Suppliers").unwrap();
        sheet.write_string(0, 0, "ALTKN").unwrap();
        sheet.write_string(0, 1, "Vendor Name").unwrap();
        sheet.write_string(0, 2, "Active").unwrap();
        sheet.write_string(1, 0, "A-100").unwrap();
        sheet.write_string(1, 1, "Acme Industrial").unwrap();
        sheet.write_boolean(1, 2, true).unwrap();
        sheet.write_number(2, 0, 200.0).unwrap();
        sheet.write_string(2, 1, "Borealis").unwrap();
        workbook.add_worksheet().set_name("Notes").unwrap();
        workbook.save(&path).unwrap();
        path
    }

    #[test]
    fn lists_sheet_names() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_workbook(dir.path());
        assert_eq!(sheet_names(&path).unwrap(), vec!["Suppliers", "Notes"]);
    }

    #[test]
    fn reads_first_sheet_with_typed_cells() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_workbook(dir.path());
        let table = read_table(&path, None).unwrap();

        assert_eq!(table.columns, vec!["ALTKN", "Vendor Name", "Active"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0]["ALTKN"], CellScalar::Text("A-100".into()));
        assert_eq!(table.rows[0]["Active"], CellScalar::Bool(true));
        assert_eq!(table.rows[1]["ALTKN"], CellScalar::Number(200.0));
        assert!(table.rows[1].get("Active").is_none());
    }

    #[test]
    fn unknown_sheet_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = sample_workbook(dir.path());
        let err = read_table(&path, Some("Ghost")).unwrap_err();
        assert!(err.contains("Ghost"));
        assert!(err.contains("Suppliers"));
    }
}
