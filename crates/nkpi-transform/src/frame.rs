//! Month-indexed rows.
//!
//! Building a [`MonthlyFrame`] resolves each row's month and coerces each
//! value column. Rows whose month cannot be read are dropped; value cells
//! keep their coercion result so the positive-value filter can report them.

use std::collections::BTreeMap;

use tracing::debug;

use nkpi_model::{DropReason, Dropped, MonthKey, RawTable, Row};

use crate::normalization::{coerce_value, compose_month_key, month_key_for_value};
use crate::report::StageOutput;
use crate::spec::MonthSource;

#[derive(Debug, Clone, PartialEq)]
pub struct MonthlyRow {
    /// Index of the source row.
    pub row: usize,
    pub month: MonthKey,
    /// Present cells only; absent (ragged) cells have no entry.
    pub values: BTreeMap<String, Result<f64, DropReason>>,
}

/// Rows keyed by month, in chronological order once sorted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyFrame {
    pub value_columns: Vec<String>,
    pub rows: Vec<MonthlyRow>,
}

impl MonthlyFrame {
    pub fn new(value_columns: Vec<String>) -> Self {
        Self {
            value_columns,
            rows: Vec::new(),
        }
    }

    pub fn push(&mut self, row: MonthlyRow) {
        self.rows.push(row);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Stable chronological sort on the month key.
    pub fn sort_chronologically(&mut self) {
        self.rows.sort_by_key(|row| row.month);
    }
}

fn resolve_month(row: &Row, source: &MonthSource) -> Result<MonthKey, (String, DropReason)> {
    let cell = |column: &str| {
        row.get(column)
            .ok_or_else(|| (column.to_string(), DropReason::RaggedRow))
    };
    match source {
        MonthSource::Label { column } => {
            month_key_for_value(cell(column.as_str())?).map_err(|reason| (column.clone(), reason))
        }
        MonthSource::Split {
            year_column,
            month_column,
        } => compose_month_key(cell(year_column.as_str())?, cell(month_column.as_str())?)
            .map_err(|reason| (month_column.clone(), reason)),
    }
}

/// Resolve months and coerce values for every row of `table`.
///
/// Month columns are never coerced even if listed in `value_columns`.
/// Value columns absent from the whole table are reported once and left out.
pub fn build_monthly_frame(
    table: &RawTable,
    source: &MonthSource,
    value_columns: &[String],
) -> StageOutput<MonthlyFrame> {
    let mut dropped = Vec::new();
    let month_columns = source.columns();

    let missing_months: Vec<&str> = month_columns
        .iter()
        .copied()
        .filter(|c| !table.has_column(c))
        .collect();
    if !missing_months.is_empty() {
        dropped.extend(missing_months.into_iter().map(Dropped::column));
        return StageOutput::new(MonthlyFrame::default(), dropped);
    }

    let mut columns = Vec::with_capacity(value_columns.len());
    for column in value_columns {
        if month_columns.contains(&column.as_str()) {
            continue;
        }
        if table.has_column(column) {
            columns.push(column.clone());
        } else {
            dropped.push(Dropped::column(column.as_str()));
        }
    }

    let mut frame = MonthlyFrame::new(columns);
    for (idx, row) in table.rows.iter().enumerate() {
        let month = match resolve_month(row, source) {
            Ok(month) => month,
            Err((column, reason)) => {
                dropped.push(Dropped::cell(idx, column, reason));
                continue;
            }
        };
        let values = frame
            .value_columns
            .iter()
            .filter_map(|column| {
                row.get(column)
                    .map(|value| (column.clone(), coerce_value(value)))
            })
            .collect();
        frame.push(MonthlyRow {
            row: idx,
            month,
            values,
        });
    }
    frame.sort_chronologically();
    debug!(
        rows_in = table.len(),
        rows_out = frame.len(),
        value_columns = frame.value_columns.len(),
        "built monthly frame"
    );
    StageOutput::new(frame, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use nkpi_model::RawValue;

    fn columns(names: &[&str]) -> Vec<String> {
        names.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn sorts_rows_by_month_not_label_text() {
        let table = RawTable::from_records(
            columns(&["Month-Year", "Value"]),
            vec![
                vec!["Mar 2024", "3"],
                vec!["Jan 2024", "1"],
                vec!["Feb 2024", "2"],
            ],
        );
        let out = build_monthly_frame(&table, &MonthSource::default(), &columns(&["Value"]));
        let labels: Vec<String> = out.value.rows.iter().map(|r| r.month.label()).collect();
        assert_eq!(labels, vec!["Jan 2024", "Feb 2024", "Mar 2024"]);
        assert!(out.dropped.is_empty());
    }

    #[test]
    fn drops_rows_with_bad_months_only() {
        let table = RawTable::from_records(
            columns(&["Month-Year", "Value"]),
            vec![vec!["Jan 2024", "1"], vec!["someday", "2"], vec!["", "3"]],
        );
        let out = build_monthly_frame(&table, &MonthSource::default(), &columns(&["Value"]));
        assert_eq!(out.value.len(), 1);
        assert_eq!(
            out.dropped,
            vec![
                Dropped::cell(1, "Month-Year", DropReason::UnparsableDate),
                Dropped::cell(2, "Month-Year", DropReason::MissingValue),
            ]
        );
    }

    #[test]
    fn month_column_is_never_coerced() {
        let table = RawTable::from_records(
            columns(&["Month-Year", "Value"]),
            vec![vec!["2024-01", "5"]],
        );
        let out = build_monthly_frame(
            &table,
            &MonthSource::default(),
            &columns(&["Month-Year", "Value"]),
        );
        assert_eq!(out.value.value_columns, vec!["Value"]);
        assert_eq!(out.value.rows[0].values["Value"], Ok(5.0));
    }

    #[test]
    fn missing_month_column_yields_empty_frame() {
        let table = RawTable::from_records(columns(&["Value"]), vec![vec!["5"]]);
        let out = build_monthly_frame(&table, &MonthSource::default(), &columns(&["Value"]));
        assert!(out.value.is_empty());
        assert_eq!(out.dropped, vec![Dropped::column("Month-Year")]);
    }

    #[test]
    fn split_year_month_columns() {
        let mut table = RawTable::new(columns(&["year", "month", "count"]));
        for (y, m, c) in [(2024.0, 2.0, 4.0), (2023.0, 12.0, 9.0)] {
            let mut row = Row::default();
            row.insert("year", RawValue::Number(y));
            row.insert("month", RawValue::Number(m));
            row.insert("count", RawValue::Number(c));
            table.push_row(row);
        }
        let source = MonthSource::Split {
            year_column: "year".to_string(),
            month_column: "month".to_string(),
        };
        let out = build_monthly_frame(&table, &source, &columns(&["count"]));
        let months: Vec<String> = out.value.rows.iter().map(|r| r.month.label()).collect();
        assert_eq!(months, vec!["Dec 2023", "Feb 2024"]);
        assert_eq!(out.value.rows[0].row, 1);
    }

    #[test]
    fn absent_value_column_reported_once() {
        let table = RawTable::from_records(
            columns(&["Month-Year", "A"]),
            vec![vec!["Jan 2024", "1"], vec!["Feb 2024", "2"]],
        );
        let out =
            build_monthly_frame(&table, &MonthSource::default(), &columns(&["A", "Missing"]));
        assert_eq!(out.value.value_columns, vec!["A"]);
        assert_eq!(out.dropped, vec![Dropped::column("Missing")]);
    }
}
