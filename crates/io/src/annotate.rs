// Annotated-workbook output: each "after" sheet rewritten with per-cell
// fills marking the classification outcomes.

use std::collections::HashMap;
use std::path::Path;

use rust_xlsxwriter::{Color, Format, Workbook, Worksheet};

use loadcheck_recon::model::{CellClassification, CellOutcome, CellScalar, Table};

/// Fill palette: changed = yellow, missing = red, blank key = blue.
const CHANGED_FILL: Color = Color::RGB(0xFFF2CC);
const MISSING_FILL: Color = Color::RGB(0xE5A78C);
const BLANK_KEY_FILL: Color = Color::RGB(0xE6F3FF);

const MAX_COLUMN_WIDTH: f64 = 50.0;

/// One annotated worksheet: the "after" table plus its classifications.
pub struct AnnotatedSheet<'a> {
    pub name: String,
    pub table: &'a Table,
    pub cells: &'a [CellClassification],
}

/// Write every annotated sheet into a single workbook at `path`.
///
/// Values are rewritten as-is; only cells classified Changed, Missing or
/// BlankKey receive a fill. Unchanged and unclassified cells keep the
/// default appearance.
pub fn write_annotated(path: &Path, sheets: &[AnnotatedSheet<'_>]) -> Result<(), String> {
    let mut workbook = Workbook::new();

    let changed = Format::new().set_background_color(CHANGED_FILL);
    let missing = Format::new().set_background_color(MISSING_FILL);
    let blank_key = Format::new().set_background_color(BLANK_KEY_FILL);

    for sheet in sheets {
        let worksheet = workbook
            .add_worksheet()
            .set_name(&sheet.name)
            .map_err(|e| format!("Failed to create sheet '{}': {}", sheet.name, e))?;

        let table = sheet.table;

        // Classification lookup by grid position (row 0 is the header).
        let col_index: HashMap<&str, u16> = table
            .columns
            .iter()
            .enumerate()
            .map(|(i, name)| (name.as_str(), i as u16))
            .collect();
        let mut fills: HashMap<(u32, u16), CellOutcome> = HashMap::new();
        for cell in sheet.cells {
            if cell.outcome == CellOutcome::Unchanged {
                continue;
            }
            if let Some(&col) = col_index.get(cell.column.as_str()) {
                fills.insert((cell.row as u32 + 1, col), cell.outcome);
            }
        }

        for (col_idx, column) in table.columns.iter().enumerate() {
            worksheet
                .write_string(0, col_idx as u16, column)
                .map_err(|e| format!("Failed to write header '{}': {}", column, e))?;
        }

        for (row_idx, row) in table.rows.iter().enumerate() {
            let target_row = row_idx as u32 + 1;
            for (col_idx, column) in table.columns.iter().enumerate() {
                let col = col_idx as u16;
                let value = row.get(column).unwrap_or(&CellScalar::Empty);
                let format = fills.get(&(target_row, col)).map(|outcome| match outcome {
                    CellOutcome::Changed => &changed,
                    CellOutcome::Missing => &missing,
                    CellOutcome::BlankKey => &blank_key,
                    CellOutcome::Unchanged => unreachable!("filtered above"),
                });
                write_cell(worksheet, target_row, col, value, format).map_err(|e| {
                    format!("Failed to write cell ({}, {}): {}", target_row, col, e)
                })?;
            }
        }

        autofit_columns(worksheet, table)?;
    }

    workbook
        .save(path)
        .map_err(|e| format!("Failed to save workbook: {}", e))
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    value: &CellScalar,
    format: Option<&Format>,
) -> Result<(), rust_xlsxwriter::XlsxError> {
    match (value, format) {
        (CellScalar::Empty, Some(format)) => {
            worksheet.write_blank(row, col, format)?;
        }
        (CellScalar::Empty, None) => {}
        (CellScalar::Number(n), Some(format)) => {
            worksheet.write_number_with_format(row, col, *n, format)?;
        }
        (CellScalar::Number(n), None) => {
            worksheet.write_number(row, col, *n)?;
        }
        (CellScalar::Text(s), Some(format)) => {
            worksheet.write_string_with_format(row, col, s, format)?;
        }
        (CellScalar::Text(s), None) => {
            worksheet.write_string(row, col, s)?;
        }
        (CellScalar::Bool(b), Some(format)) => {
            worksheet.write_boolean_with_format(row, col, *b, format)?;
        }
        (CellScalar::Bool(b), None) => {
            worksheet.write_boolean(row, col, *b)?;
        }
    }
    Ok(())
}

/// Widen columns to fit their longest rendered value, capped at 50 chars.
fn autofit_columns(worksheet: &mut Worksheet, table: &Table) -> Result<(), String> {
    for (col_idx, column) in table.columns.iter().enumerate() {
        let mut max_len = column.chars().count();
        for row in &table.rows {
            let len = match row.get(column) {
                Some(CellScalar::Text(s)) => s.chars().count(),
                Some(CellScalar::Number(n)) => format!("{}", n).len(),
                Some(CellScalar::Bool(_)) => 5,
                Some(CellScalar::Empty) | None => 0,
            };
            max_len = max_len.max(len);
        }
        let width = ((max_len + 2) as f64).min(MAX_COLUMN_WIDTH);
        worksheet
            .set_column_width(col_idx as u16, width)
            .map_err(|e| format!("Failed to set width of column '{}': {}", column, e))?;
    }
    Ok(())
}
