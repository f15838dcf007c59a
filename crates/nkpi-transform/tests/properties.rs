use std::collections::BTreeMap;

use proptest::prelude::*;

use nkpi_model::{DropReason, LongRecord, MonthKey, RawTable, RawValue, Row};
use nkpi_transform::{MonthSource, build_monthly_frame, filter_positive, melt};

fn table_strategy() -> impl Strategy<Value = (usize, Vec<(u32, Vec<Option<i64>>)>)> {
    (1usize..5).prop_flat_map(|width| {
        let row = (1u32..=12, prop::collection::vec(prop::option::of(-5i64..50), width));
        (Just(width), prop::collection::vec(row, 0..20))
    })
}

proptest! {
    #[test]
    fn melt_emits_one_record_per_present_cell((width, rows) in table_strategy()) {
        let value_columns: Vec<String> = (0..width).map(|i| format!("c{i}")).collect();
        let mut header = vec!["Month-Year".to_string()];
        header.extend(value_columns.iter().cloned());
        let mut table = RawTable::new(header);
        let mut present = 0;
        for (month, cells) in &rows {
            let mut row = Row::default();
            row.insert("Month-Year", MonthKey::new(2024, *month).unwrap().label());
            for (column, cell) in value_columns.iter().zip(cells) {
                if let Some(value) = cell {
                    row.insert(column.as_str(), RawValue::Number(*value as f64));
                    present += 1;
                }
            }
            table.push_row(row);
        }

        let frame = build_monthly_frame(&table, &MonthSource::default(), &value_columns).value;
        let out = melt(&frame, &BTreeMap::new());

        prop_assert_eq!(out.value.len(), present);
        prop_assert_eq!(out.value.len() + out.dropped.len(), rows.len() * width);
        prop_assert!(out.dropped.iter().all(|d| d.reason == DropReason::RaggedRow));
    }

    #[test]
    fn positive_filter_is_idempotent(values in prop::collection::vec(prop::option::of(-100.0f64..100.0), 0..40)) {
        let jan = MonthKey::new(2024, 1).unwrap();
        let records: Vec<LongRecord> = values
            .iter()
            .enumerate()
            .map(|(row, v)| LongRecord::new(row, jan, "s", v.ok_or(DropReason::NonNumeric)))
            .collect();

        let once = filter_positive(records).value;
        let twice = filter_positive(once.clone());

        prop_assert!(twice.dropped.is_empty());
        prop_assert_eq!(&twice.value, &once);
        prop_assert!(once.iter().all(|r| matches!(r.value, Ok(v) if v > 0.0)));
    }
}
