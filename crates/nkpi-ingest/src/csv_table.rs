use std::path::Path;

use csv::ReaderBuilder;
use tracing::debug;

use nkpi_model::{RawTable, RawValue, Row};

use crate::{IngestError, Result};

fn normalize_header(raw: &str) -> String {
    let trimmed = raw.trim().trim_matches('\u{feff}');
    let mut parts = trimmed.split_whitespace();
    let mut normalized = String::new();
    if let Some(first) = parts.next() {
        normalized.push_str(first);
        for part in parts {
            normalized.push(' ');
            normalized.push_str(part);
        }
    }
    normalized
}

fn normalize_cell(raw: &str) -> String {
    raw.trim().trim_matches('\u{feff}').to_string()
}

/// Read a CSV export as a grid of cells, without interpreting any header.
///
/// Rows keep their own length; blank lines are skipped.
pub fn read_csv_grid(path: &Path) -> Result<Vec<Vec<String>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_path(path)
        .map_err(|e| IngestError::csv(path, e))?;
    let mut grid = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| IngestError::csv(path, e))?;
        let row: Vec<String> = record.iter().map(normalize_cell).collect();
        if row.iter().all(String::is_empty) {
            continue;
        }
        grid.push(row);
    }
    debug!(path = %path.display(), rows = grid.len(), "read csv grid");
    Ok(grid)
}

/// Read a CSV export as a table, treating the first row as the header.
pub fn read_csv_table(path: &Path) -> Result<RawTable> {
    let grid = read_csv_grid(path)?;
    Ok(grid_to_table(&grid))
}

/// Turn a grid into a table. Row 0 is the header; rows shorter than the
/// header leave the trailing columns absent.
pub fn grid_to_table(grid: &[Vec<String>]) -> RawTable {
    let Some((header, body)) = grid.split_first() else {
        return RawTable::default();
    };
    let columns: Vec<String> = header.iter().map(|h| normalize_header(h)).collect();
    let mut table = RawTable::new(columns);
    for record in body {
        let mut row = Row::default();
        for (column, value) in table.columns.iter().zip(record) {
            row.insert(column.clone(), RawValue::text(normalize_cell(value)));
        }
        table.push_row(row);
    }
    table
}
