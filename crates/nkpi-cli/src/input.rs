//! Loading source tables for the commands.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, trace};

use nkpi_ingest::{A1Range, grid_to_table, range_to_table, read_csv_grid};
use nkpi_model::{Dropped, RawTable};

use crate::logging::redact_value;

/// Read a CSV export, optionally cut down to an A1 range.
///
/// Without a range the first row is the header. With one, the first row of
/// the range is.
pub fn load_table(path: &Path, range: Option<&str>) -> Result<RawTable> {
    let grid = read_csv_grid(path).with_context(|| format!("read {}", path.display()))?;
    let table = match range {
        Some(reference) => {
            let range = A1Range::parse(reference)?;
            range_to_table(&grid, &range)
                .with_context(|| format!("slice {range} from {}", path.display()))?
        }
        None => grid_to_table(&grid),
    };
    debug!(
        path = %path.display(),
        rows = table.len(),
        columns = table.columns.len(),
        "loaded table"
    );
    Ok(table)
}

/// Trace each dropped cell together with its source value.
pub fn trace_dropped_values(table: &RawTable, dropped: &[Dropped]) {
    for drop in dropped {
        let (Some(row), Some(column)) = (drop.row, drop.column.as_deref()) else {
            continue;
        };
        let value = table
            .value(row, column)
            .map(ToString::to_string)
            .unwrap_or_default();
        trace!(
            row,
            column,
            value = redact_value(&value),
            reason = %drop.reason,
            "dropped cell"
        );
    }
}
