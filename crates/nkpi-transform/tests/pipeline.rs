use std::collections::BTreeMap;

use nkpi_model::{DropReason, Dropped, MonthKey, RawTable, ValueFormat};
use nkpi_transform::metrics::{
    EntityRecord, SessionEvent, average_session_duration, entity_counts, entity_counts_frame,
    entity_display_names, sessions_frame,
};
use nkpi_transform::normalization::coerce_numeric;
use nkpi_transform::{ChartSpec, Layout, MonthSource, TransformSpec, chart_from_frame, run};

fn columns(names: &[&str]) -> Vec<String> {
    names.iter().map(ToString::to_string).collect()
}

fn render(points: &[nkpi_model::ChartPoint]) -> String {
    points
        .iter()
        .map(|p| format!("{} | {} | {}", p.label, p.series, p.value_label))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn zero_existing_entries_are_dropped_end_to_end() {
    let table = RawTable::from_records(
        columns(&["Month Year", "New Entries", "Existing Entries"]),
        vec![vec!["Jan 2024", "5", "0"]],
    );
    let spec = TransformSpec {
        rename: BTreeMap::from([("Month Year".to_string(), "Month-Year".to_string())]),
        ..TransformSpec::default()
    };

    let out = run(&table, &spec);

    let points: Vec<(String, String, f64)> = out
        .chart
        .points()
        .into_iter()
        .map(|p| (p.label, p.series, p.value))
        .collect();
    assert_eq!(
        points,
        vec![("Jan 2024".to_string(), "New Entries".to_string(), 5.0)]
    );
    assert_eq!(
        out.report.dropped,
        vec![Dropped::cell(0, "Existing Entries", DropReason::NonPositive)]
    );
}

#[test]
fn months_sort_chronologically() {
    let table = RawTable::from_records(
        columns(&["Month-Year", "Value"]),
        vec![
            vec!["Mar 2024", "3"],
            vec!["Jan 2024", "1"],
            vec!["Feb 2024", "2"],
        ],
    );
    let out = run(&table, &TransformSpec::default());
    let labels: Vec<String> = out.chart.months().iter().map(|m| m.label()).collect();
    assert_eq!(labels, vec!["Jan 2024", "Feb 2024", "Mar 2024"]);
}

#[test]
fn coercion_examples() {
    assert_eq!(coerce_numeric("1,234"), Some(1234.0));
    assert_eq!(coerce_numeric("$1,200.50"), Some(1200.5));
    assert_eq!(coerce_numeric("45%"), Some(0.45));
    assert_eq!(coerce_numeric(""), None);
    assert_eq!(coerce_numeric("n/a"), None);
}

#[test]
fn empty_source_gives_empty_chart() {
    let table = RawTable::new(columns(&["Month-Year", "Value"]));
    let out = run(&table, &TransformSpec::default());
    assert!(out.is_empty());
    assert!(out.report.dropped.is_empty());
}

#[test]
fn missing_month_column_gives_empty_chart_with_reason() {
    let table = RawTable::from_records(columns(&["When", "Value"]), vec![vec!["Jan 2024", "1"]]);
    let out = run(&table, &TransformSpec::default());
    assert!(out.is_empty());
    assert_eq!(out.report.missing_columns(), vec!["Month-Year"]);
}

#[test]
fn explicit_value_columns_report_absent_ones() {
    let table = RawTable::from_records(
        columns(&["Month-Year", "Virtual"]),
        vec![vec!["Jan 2024", "4"]],
    );
    let spec = TransformSpec {
        layout: Layout::Wide {
            value_columns: columns(&["Virtual", "In Person"]),
        },
        ..TransformSpec::default()
    };
    let out = run(&table, &spec);
    assert_eq!(out.chart.series.len(), 1);
    assert_eq!(out.report.missing_columns(), vec!["In Person"]);
}

#[test]
fn long_source_with_split_months() {
    let table = RawTable::from_records(
        columns(&["year", "month", "Type", "Value"]),
        vec![
            vec!["2024", "2", "Grants", "$2,000"],
            vec!["2024", "1", "Grants", "$1,500"],
            vec!["2024", "1", "Loans", "-3"],
            vec!["2024", "13", "Loans", "9"],
        ],
    );
    let spec = TransformSpec {
        month: MonthSource::Split {
            year_column: "year".to_string(),
            month_column: "month".to_string(),
        },
        layout: Layout::Long {
            type_column: "Type".to_string(),
            value_column: "Value".to_string(),
        },
        chart: ChartSpec {
            format: ValueFormat::Currency,
            ..ChartSpec::titled("Capital Deployed")
        },
        ..TransformSpec::default()
    };
    let out = run(&table, &spec);
    insta::assert_snapshot!(render(&out.chart.points()), @r"
    Jan 2024 | Grants | $1,500.00
    Feb 2024 | Grants | $2,000.00
    ");
    let reasons = out.report.counts_by_reason();
    assert_eq!(reasons.get(&DropReason::UnparsableDate), Some(&1));
    assert_eq!(reasons.get(&DropReason::NonPositive), Some(&1));
}

#[test]
fn pivot_of_output_matches_chart() {
    let table = RawTable::from_records(
        columns(&["Month-Year", "A", "B"]),
        vec![vec!["Jan 2024", "1", "2"], vec!["Feb 2024", "3", ""]],
    );
    let out = run(&table, &TransformSpec::default());
    let wide = out.pivot();
    let feb = MonthKey::new(2024, 2).unwrap();
    assert_eq!(wide.series, vec!["A", "B"]);
    assert_eq!(wide.value(feb, "A"), Some(3.0));
    assert_eq!(wide.value(feb, "B"), None);
}

#[test]
fn series_follow_value_column_order() {
    // Existing Entries is zero in the first month, so it first appears after
    // Total Entries in row order.
    let table = RawTable::from_records(
        columns(&["Month-Year", "New Entries", "Existing Entries", "Total Entries"]),
        vec![vec!["Jan 2024", "2", "0", "2"], vec!["Feb 2024", "1", "2", "3"]],
    );
    let out = run(&table, &TransformSpec::default());
    let names: Vec<&str> = out.chart.series.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["New Entries", "Existing Entries", "Total Entries"]);
    assert_eq!(out.pivot().series, names);
}

#[test]
fn entity_counts_chart_uses_display_names() {
    let at = |m: u32, d: u32| {
        chrono::NaiveDate::from_ymd_opt(2024, m, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    };
    let entities = vec![
        EntityRecord::new(at(1, 3)),
        EntityRecord::new(at(1, 9)),
        EntityRecord::new(at(2, 1)),
    ];
    let frame = entity_counts_frame(&entity_counts(&entities));
    let out = chart_from_frame(&frame, &entity_display_names(), &ChartSpec::titled("Teams"));
    insta::assert_snapshot!(render(&out.chart.points()), @r"
    Jan 2024 | New Entries | 2
    Jan 2024 | Total Entries | 2
    Feb 2024 | New Entries | 1
    Feb 2024 | Existing Entries | 2
    Feb 2024 | Total Entries | 3
    ");
}

#[test]
fn session_average_splits_minutes_and_seconds() {
    let at = |h: u32, m: u32| {
        chrono::NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    };
    let events = vec![
        SessionEvent::new("x", at(9, 0)),
        SessionEvent::new("x", at(9, 2)),
        SessionEvent::new("y", at(10, 0)),
        SessionEvent::new("y", at(10, 3)),
    ];
    let durations = average_session_duration(&events);
    assert_eq!((durations[0].minutes, durations[0].seconds), (2, 30.0));
    let frame = sessions_frame(&durations);
    assert_eq!(frame.rows[0].values["avg_seconds"], Ok(30.0));
}
