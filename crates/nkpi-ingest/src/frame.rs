//! Query result frames.
//!
//! SQL collaborators hand back polars frames; each cell is mapped onto a
//! [`RawValue`] without interpretation.

use polars::prelude::{AnyValue, DataFrame};

use nkpi_model::{RawTable, RawValue, Row};

use crate::Result;

/// Map a polars cell onto a raw value.
///
/// Numbers stay numbers, strings stay text, and everything else (dates,
/// timestamps, booleans) is carried as its display text.
pub fn any_to_raw(value: AnyValue<'_>) -> RawValue {
    match value {
        AnyValue::Null => RawValue::Null,
        AnyValue::Int8(v) => RawValue::Number(f64::from(v)),
        AnyValue::Int16(v) => RawValue::Number(f64::from(v)),
        AnyValue::Int32(v) => RawValue::Number(f64::from(v)),
        AnyValue::Int64(v) => RawValue::Number(v as f64),
        AnyValue::UInt8(v) => RawValue::Number(f64::from(v)),
        AnyValue::UInt16(v) => RawValue::Number(f64::from(v)),
        AnyValue::UInt32(v) => RawValue::Number(f64::from(v)),
        AnyValue::UInt64(v) => RawValue::Number(v as f64),
        AnyValue::Float32(v) => RawValue::Number(f64::from(v)),
        AnyValue::Float64(v) => RawValue::Number(v),
        AnyValue::String(s) => RawValue::text(s),
        AnyValue::StringOwned(s) => RawValue::text(s.to_string()),
        AnyValue::Boolean(b) => RawValue::Text(b.to_string()),
        other => RawValue::text(other.to_string()),
    }
}

/// Convert a result frame into a table, preserving column order.
pub fn table_from_dataframe(df: &DataFrame) -> Result<RawTable> {
    let columns: Vec<String> = df
        .get_column_names()
        .into_iter()
        .map(ToString::to_string)
        .collect();
    let mut table = RawTable::new(columns);
    for idx in 0..df.height() {
        let mut row = Row::default();
        for column in df.get_columns() {
            row.insert(column.name().to_string(), any_to_raw(column.get(idx)?));
        }
        table.push_row(row);
    }
    Ok(table)
}
