// CSV/TSV import for reconciliation input

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use loadcheck_recon::model::{CellScalar, Table};

/// Read a delimited text file into a `Table`. The first row is the header
/// row; the delimiter is sniffed from the content.
pub fn read_table(path: &Path) -> Result<Table, String> {
    let content = read_file_as_utf8(path)?;
    let delimiter = sniff_delimiter(&content);
    table_from_string(&content, delimiter)
}

/// Detect the most likely field delimiter by checking consistency across
/// the first few lines.
///
/// For each candidate (tab, semicolon, comma, pipe), count fields per line.
/// The delimiter that produces the most consistent field count (>1 field)
/// wins; higher field counts break ties.
fn sniff_delimiter(content: &str) -> u8 {
    let candidates: &[u8] = &[b'\t', b';', b',', b'|'];
    let sample: Vec<&str> = content.lines().take(10).collect();

    if sample.is_empty() {
        return b',';
    }

    let mut best = b',';
    let mut best_score = 0u64;

    for &delim in candidates {
        let counts: Vec<usize> = sample
            .iter()
            .map(|line| line.split(delim as char).count())
            .collect();

        let target = counts[0];
        if target <= 1 {
            continue;
        }

        let consistent = counts.iter().filter(|&&c| c == target).count() as u64;
        let score = consistent * target as u64;
        if score > best_score {
            best_score = score;
            best = delim;
        }
    }

    best
}

/// Read a file as UTF-8, falling back to Windows-1252 (common for
/// Excel-exported CSVs).
fn read_file_as_utf8(path: &Path) -> Result<String, String> {
    let mut file = std::fs::File::open(path)
        .map_err(|e| format!("cannot open {}: {}", path.display(), e))?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .map_err(|e| format!("cannot read {}: {}", path.display(), e))?;

    match String::from_utf8(bytes) {
        Ok(s) => Ok(s),
        Err(e) => {
            let bytes = e.into_bytes();
            let (decoded, _, _) = encoding_rs::WINDOWS_1252.decode(&bytes);
            Ok(decoded.into_owned())
        }
    }
}

fn table_from_string(content: &str, delimiter: u8) -> Result<Table, String> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let columns: Vec<String> = reader
        .headers()
        .map_err(|e| e.to_string())?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.map_err(|e| e.to_string())?;
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

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp(contents: &[u8]) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file
    }

    #[test]
    fn reads_comma_separated() {
        let file = write_temp(b"ID,Name\n1,Acme\n2,Borealis\n");
        let table = read_table(file.path()).unwrap();
        assert_eq!(table.columns, vec!["ID", "Name"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(
            table.rows[1]["Name"],
            CellScalar::Text("Borealis".to_string())
        );
    }

    #[test]
    fn sniffs_semicolon_delimiter() {
        let file = write_temp(b"ID;Name;City\n1;Acme;Berlin\n");
        let table = read_table(file.path()).unwrap();
        assert_eq!(table.columns, vec!["ID", "Name", "City"]);
        assert_eq!(table.rows[0]["City"], CellScalar::Text("Berlin".to_string()));
    }

    #[test]
    fn empty_fields_stay_absent() {
        let file = write_temp(b"ID,Name\n1,\n");
        let table = read_table(file.path()).unwrap();
        assert!(table.rows[0].get("Name").is_none());
    }

    #[test]
    fn decodes_windows_1252_fallback() {
        // "Müller" with 0xFC, invalid as UTF-8
        let file = write_temp(b"ID,Name\n1,M\xFCller\n");
        let table = read_table(file.path()).unwrap();
        assert_eq!(
            table.rows[0]["Name"],
            CellScalar::Text("Müller".to_string())
        );
    }
}
