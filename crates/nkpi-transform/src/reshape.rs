//! Wide-to-long and long-to-wide reshaping.

use std::collections::BTreeMap;

use tracing::debug;

use nkpi_model::{DropReason, Dropped, LongRecord, MetricSeries, MonthKey, RawTable, RawValue};

use crate::frame::{MonthlyFrame, build_monthly_frame};
use crate::report::StageOutput;
use crate::spec::MonthSource;

fn display<'a>(display_names: &'a BTreeMap<String, String>, column: &'a str) -> &'a str {
    display_names.get(column).map_or(column, String::as_str)
}

/// Melt a monthly frame into one record per (row, value column).
///
/// The output has `rows × value_columns` records, less any cells absent
/// from ragged rows; those are reported as [`DropReason::RaggedRow`] and
/// never treated as zero. Records come out column by column, so series
/// keep the order of the value columns.
pub fn melt(
    frame: &MonthlyFrame,
    display_names: &BTreeMap<String, String>,
) -> StageOutput<Vec<LongRecord>> {
    let mut records = Vec::with_capacity(frame.rows.len() * frame.value_columns.len());
    let mut dropped = Vec::new();
    for column in &frame.value_columns {
        for row in &frame.rows {
            match row.values.get(column) {
                Some(value) => records.push(LongRecord::new(
                    row.row,
                    row.month,
                    display(display_names, column),
                    *value,
                )),
                None => dropped.push(Dropped::cell(row.row, column.as_str(), DropReason::RaggedRow)),
            }
        }
    }
    debug!(records = records.len(), ragged = dropped.len(), "melted frame");
    StageOutput::new(records, dropped)
}

/// Read a source that is already long: one row per (month, type, value).
///
/// Rows without a usable month or type are dropped; value cells keep their
/// coercion result for the positive-value filter. Output is chronological.
pub fn read_long(
    table: &RawTable,
    source: &MonthSource,
    type_column: &str,
    value_column: &str,
    display_names: &BTreeMap<String, String>,
) -> StageOutput<Vec<LongRecord>> {
    let mut dropped = Vec::new();
    for column in [type_column, value_column] {
        if !table.has_column(column) {
            dropped.push(Dropped::column(column));
        }
    }
    if !dropped.is_empty() {
        return StageOutput::new(Vec::new(), dropped);
    }

    // Resolve months through the frame builder with the value column, then
    // pair each surviving row with its type cell.
    let StageOutput {
        value: frame,
        dropped: frame_dropped,
    } = build_monthly_frame(table, source, &[value_column.to_string()]);
    dropped.extend(frame_dropped);

    let mut records = Vec::with_capacity(frame.rows.len());
    for row in &frame.rows {
        let series = match table.value(row.row, type_column) {
            None => Err(DropReason::RaggedRow),
            Some(RawValue::Null) => Err(DropReason::MissingValue),
            Some(RawValue::Text(s)) => Ok(s.trim().to_string()),
            Some(RawValue::Number(n)) => Ok(n.to_string()),
        };
        let series = match series {
            Ok(series) => series,
            Err(reason) => {
                dropped.push(Dropped::cell(row.row, type_column, reason));
                continue;
            }
        };
        let Some(value) = row.values.get(value_column) else {
            dropped.push(Dropped::cell(row.row, value_column, DropReason::RaggedRow));
            continue;
        };
        records.push(LongRecord::new(
            row.row,
            row.month,
            display(display_names, &series),
            *value,
        ));
    }
    debug!(records = records.len(), dropped = dropped.len(), "read long source");
    StageOutput::new(records, dropped)
}

/// Group usable records into series, in order of first appearance.
///
/// Records still carrying a coercion failure are skipped; run the
/// positive-value filter first to have them reported.
pub fn group_series(records: &[LongRecord]) -> Vec<MetricSeries> {
    let mut order: Vec<MetricSeries> = Vec::new();
    let mut index: BTreeMap<&str, usize> = BTreeMap::new();
    for record in records {
        let Ok(value) = record.value else {
            continue;
        };
        let slot = *index.entry(record.series.as_str()).or_insert_with(|| {
            order.push(MetricSeries::new(record.series.clone()));
            order.len() - 1
        });
        order[slot].push(record.month, value);
    }
    for series in &mut order {
        series.points.sort_by_key(|(month, _)| *month);
    }
    order
}

/// Long-to-wide view: months down, series across.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize)]
pub struct WideTable {
    pub months: Vec<MonthKey>,
    pub series: Vec<String>,
    /// `cells[m][s]` is the value for `months[m]` and `series[s]`.
    pub cells: Vec<Vec<Option<f64>>>,
}

impl WideTable {
    pub fn value(&self, month: MonthKey, series: &str) -> Option<f64> {
        let m = self.months.iter().position(|k| *k == month)?;
        let s = self.series.iter().position(|name| name == series)?;
        self.cells[m][s]
    }

    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// Pivot usable records into a [`WideTable`].
///
/// Duplicate (month, series) pairs are summed. Series keep first-appearance
/// order; months are chronological.
pub fn pivot(records: &[LongRecord]) -> WideTable {
    let mut months: Vec<MonthKey> = Vec::new();
    let mut series: Vec<String> = Vec::new();
    let mut sums: BTreeMap<(MonthKey, usize), f64> = BTreeMap::new();
    for record in records {
        let Ok(value) = record.value else {
            continue;
        };
        if !months.contains(&record.month) {
            months.push(record.month);
        }
        let s = match series.iter().position(|name| *name == record.series) {
            Some(s) => s,
            None => {
                series.push(record.series.clone());
                series.len() - 1
            }
        };
        *sums.entry((record.month, s)).or_insert(0.0) += value;
    }
    months.sort();
    let cells = months
        .iter()
        .map(|month| {
            (0..series.len())
                .map(|s| sums.get(&(*month, s)).copied())
                .collect()
        })
        .collect();
    WideTable {
        months,
        series,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::MonthlyRow;

    fn key(month: u32) -> MonthKey {
        MonthKey::new(2024, month).unwrap()
    }

    fn frame() -> MonthlyFrame {
        let mut frame = MonthlyFrame::new(vec!["new_entries".to_string(), "total".to_string()]);
        frame.push(MonthlyRow {
            row: 0,
            month: key(1),
            values: BTreeMap::from([
                ("new_entries".to_string(), Ok(2.0)),
                ("total".to_string(), Ok(2.0)),
            ]),
        });
        frame.push(MonthlyRow {
            row: 1,
            month: key(2),
            values: BTreeMap::from([("new_entries".to_string(), Err(DropReason::NonNumeric))]),
        });
        frame
    }

    #[test]
    fn melt_applies_display_names_and_skips_ragged_cells() {
        let names = BTreeMap::from([("new_entries".to_string(), "New Entries".to_string())]);
        let out = melt(&frame(), &names);
        let series: Vec<&str> = out.value.iter().map(|r| r.series.as_str()).collect();
        assert_eq!(series, vec!["New Entries", "New Entries", "total"]);
        assert_eq!(out.value[1].value, Err(DropReason::NonNumeric));
        assert_eq!(
            out.dropped,
            vec![Dropped::cell(1, "total", DropReason::RaggedRow)]
        );
    }

    #[test]
    fn group_series_skips_failed_values() {
        let records = melt(&frame(), &BTreeMap::new()).value;
        let series = group_series(&records);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "new_entries");
        assert_eq!(series[0].points, vec![(key(1), 2.0)]);
    }

    #[test]
    fn pivot_sums_duplicates() {
        let records = vec![
            LongRecord::new(0, key(2), "A", Ok(1.0)),
            LongRecord::new(1, key(1), "B", Ok(5.0)),
            LongRecord::new(2, key(2), "A", Ok(2.0)),
        ];
        let wide = pivot(&records);
        assert_eq!(wide.months, vec![key(1), key(2)]);
        assert_eq!(wide.series, vec!["A", "B"]);
        assert_eq!(wide.value(key(2), "A"), Some(3.0));
        assert_eq!(wide.value(key(1), "A"), None);
        assert_eq!(wide.value(key(1), "B"), Some(5.0));
    }

    #[test]
    fn read_long_resolves_type_and_value() {
        let table = RawTable::from_records(
            vec!["Month-Year".to_string(), "Type".to_string(), "Value".to_string()],
            vec![
                vec!["Feb 2024", "Virtual", "3"],
                vec!["Jan 2024", "In Person", "$1,200"],
                vec!["Jan 2024", "", "4"],
                vec!["bad", "Virtual", "1"],
            ],
        );
        let out = read_long(
            &table,
            &MonthSource::default(),
            "Type",
            "Value",
            &BTreeMap::new(),
        );
        let rows: Vec<(String, String, Result<f64, DropReason>)> = out
            .value
            .iter()
            .map(|r| (r.month.label(), r.series.clone(), r.value))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Jan 2024".to_string(), "In Person".to_string(), Ok(1200.0)),
                ("Feb 2024".to_string(), "Virtual".to_string(), Ok(3.0)),
            ]
        );
        assert_eq!(out.dropped.len(), 2);
    }

    #[test]
    fn read_long_requires_both_columns() {
        let table = RawTable::from_records(
            vec!["Month-Year".to_string(), "Value".to_string()],
            vec![vec!["Jan 2024", "3"]],
        );
        let out = read_long(
            &table,
            &MonthSource::default(),
            "Type",
            "Value",
            &BTreeMap::new(),
        );
        assert!(out.value.is_empty());
        assert_eq!(out.dropped, vec![Dropped::column("Type")]);
    }
}
