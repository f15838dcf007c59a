use std::collections::BTreeMap;

use tracing::debug;

use nkpi_model::{RawTable, Row};

/// Rename columns per `mapping` (source name to canonical name).
///
/// Columns not in the mapping pass through. Mapping entries whose source
/// column is absent are ignored.
pub fn rename_columns(table: &RawTable, mapping: &BTreeMap<String, String>) -> RawTable {
    if mapping.is_empty() {
        return table.clone();
    }
    let renamed = |name: &String| mapping.get(name).unwrap_or(name).clone();
    let columns: Vec<String> = table.columns.iter().map(renamed).collect();
    let rows = table
        .rows
        .iter()
        .map(|row| Row {
            cells: row
                .cells
                .iter()
                .map(|(name, value)| (renamed(name), value.clone()))
                .collect(),
        })
        .collect();
    let applied = mapping
        .keys()
        .filter(|source| table.has_column(source))
        .count();
    debug!(applied, requested = mapping.len(), "renamed columns");
    RawTable { columns, rows }
}
