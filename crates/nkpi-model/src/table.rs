//! Raw tabular input.
//!
//! A [`RawTable`] is what a SQL result set or a spreadsheet range looks like
//! before any normalization. Cells keep their source form; coercion happens
//! later in the transform pipeline.

use std::collections::BTreeMap;
use std::fmt;

/// A single cell as delivered by the data source.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(untagged)]
pub enum RawValue {
    Number(f64),
    Text(String),
    Null,
}

impl RawValue {
    /// Text cell; blank text becomes [`RawValue::Null`].
    pub fn text(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.trim().is_empty() {
            Self::Null
        } else {
            Self::Text(value)
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for RawValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::Null => Ok(()),
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for RawValue {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

impl From<f64> for RawValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for RawValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl<T: Into<RawValue>> From<Option<T>> for RawValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

/// One source row. Columns missing from `cells` are absent (ragged input),
/// which is distinct from a present [`RawValue::Null`].
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Row {
    pub cells: BTreeMap<String, RawValue>,
}

impl Row {
    pub fn get(&self, column: &str) -> Option<&RawValue> {
        self.cells.get(column)
    }

    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<RawValue>) {
        self.cells.insert(column.into(), value.into());
    }
}

/// Ordered rows sharing one column set.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RawTable {
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl RawTable {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from positional records.
    ///
    /// Records shorter than the header leave the trailing columns absent;
    /// extra trailing values are ignored.
    pub fn from_records<I, R, V>(columns: Vec<String>, records: I) -> Self
    where
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = V>,
        V: Into<RawValue>,
    {
        let mut table = Self::new(columns);
        for record in records {
            let mut row = Row::default();
            for (column, value) in table.columns.iter().zip(record) {
                row.insert(column.clone(), value);
            }
            table.rows.push(row);
        }
        table
    }

    pub fn push_row(&mut self, row: Row) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Cell lookup; `None` when the row or the cell is absent.
    pub fn value(&self, row: usize, column: &str) -> Option<&RawValue> {
        self.rows.get(row)?.get(column)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_records_leaves_short_rows_ragged() {
        let table = RawTable::from_records(
            vec!["A".to_string(), "B".to_string()],
            vec![vec!["1", "2"], vec!["3"]],
        );
        assert_eq!(table.len(), 2);
        assert_eq!(table.value(0, "B"), Some(&RawValue::Text("2".to_string())));
        assert_eq!(table.value(1, "B"), None);
        assert!(table.has_column("B"));
    }

    #[test]
    fn blank_text_is_null() {
        assert_eq!(RawValue::from("   "), RawValue::Null);
        assert_eq!(RawValue::from(None::<&str>), RawValue::Null);
        assert_eq!(RawValue::from(Some(2.5)), RawValue::Number(2.5));
    }

    #[test]
    fn untagged_serde_keeps_source_types() {
        let values: Vec<RawValue> = serde_json::from_str(r#"[1.5, "x", null]"#).unwrap();
        assert_eq!(
            values,
            vec![
                RawValue::Number(1.5),
                RawValue::Text("x".to_string()),
                RawValue::Null
            ]
        );
    }
}
