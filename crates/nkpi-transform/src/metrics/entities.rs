//! New, existing and total entity counts.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use tracing::debug;

use nkpi_model::{DropReason, Dropped, MonthKey, RawTable, RawValue};

use super::{display_map, present};
use crate::frame::{MonthlyFrame, MonthlyRow};
use crate::normalization::{coerce_numeric, parse_timestamp, timestamp_for_value};
use crate::report::StageOutput;

pub const ENTITY_DISPLAY_NAMES: [(&str, &str); 3] = [
    ("new_entries", "New Entries"),
    ("existing_entries", "Existing Entries"),
    ("total_entries", "Total Entries"),
];

pub fn entity_display_names() -> BTreeMap<String, String> {
    display_map(&ENTITY_DISPLAY_NAMES)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityRecord {
    pub created_at: NaiveDateTime,
    pub deleted: bool,
}

impl EntityRecord {
    pub fn new(created_at: NaiveDateTime) -> Self {
        Self {
            created_at,
            deleted: false,
        }
    }

    pub fn deleted(created_at: NaiveDateTime) -> Self {
        Self {
            created_at,
            deleted: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct MonthlyEntityCounts {
    pub month: MonthKey,
    pub new: usize,
    /// Entities created before the first instant of `month`.
    pub existing: usize,
    pub total: usize,
}

/// Counts for every month in which at least one live entity was created.
///
/// Each month's `existing` is the number of live entities created strictly
/// before that month starts, counted against the full sorted creation list
/// rather than carried over from the previous month. Deleted entities are
/// left out of every count.
pub fn entity_counts(entities: &[EntityRecord]) -> Vec<MonthlyEntityCounts> {
    let mut created: Vec<NaiveDateTime> = entities
        .iter()
        .filter(|e| !e.deleted)
        .map(|e| e.created_at)
        .collect();
    created.sort_unstable();

    let mut new_by_month: BTreeMap<MonthKey, usize> = BTreeMap::new();
    for timestamp in &created {
        *new_by_month
            .entry(MonthKey::from_datetime(*timestamp))
            .or_insert(0) += 1;
    }

    let counts: Vec<MonthlyEntityCounts> = new_by_month
        .into_iter()
        .map(|(month, new)| {
            let start = month.start();
            let existing = created.partition_point(|t| *t < start);
            MonthlyEntityCounts {
                month,
                new,
                existing,
                total: new + existing,
            }
        })
        .collect();
    debug!(
        entities = entities.len(),
        live = created.len(),
        months = counts.len(),
        "computed entity counts"
    );
    counts
}

/// Deletion flag: booleans, yes/no words, non-zero numbers, or a deletion
/// timestamp. Blank means live.
fn parse_deleted(value: &RawValue) -> Result<bool, DropReason> {
    match value {
        RawValue::Null => Ok(false),
        RawValue::Number(n) => Ok(*n != 0.0),
        RawValue::Text(s) => {
            let flag = s.trim().to_ascii_lowercase();
            match flag.as_str() {
                "true" | "t" | "yes" | "y" | "1" | "deleted" => Ok(true),
                "false" | "f" | "no" | "n" | "0" => Ok(false),
                _ => {
                    if let Some(n) = coerce_numeric(s) {
                        Ok(n != 0.0)
                    } else if parse_timestamp(s).is_some() {
                        Ok(true)
                    } else {
                        Err(DropReason::NonNumeric)
                    }
                }
            }
        }
    }
}

/// Read entity rows: a creation timestamp and an optional deletion flag.
///
/// A missing deletion column means nothing is deleted; a missing creation
/// column yields no rows.
pub fn entity_rows_from_table(
    table: &RawTable,
    created_column: &str,
    deleted_column: Option<&str>,
) -> StageOutput<Vec<EntityRecord>> {
    if !table.has_column(created_column) {
        return StageOutput::new(Vec::new(), vec![Dropped::column(created_column)]);
    }
    let mut dropped = Vec::new();
    let deleted_column = match deleted_column {
        Some(column) if !table.has_column(column) => {
            dropped.push(Dropped::column(column));
            None
        }
        other => other,
    };

    let mut entities = Vec::with_capacity(table.len());
    for (idx, row) in table.rows.iter().enumerate() {
        let created_at = match present(row.get(created_column)).and_then(timestamp_for_value) {
            Ok(created_at) => created_at,
            Err(reason) => {
                dropped.push(Dropped::cell(idx, created_column, reason));
                continue;
            }
        };
        let deleted = match deleted_column {
            Some(column) => match row.get(column).map_or(Ok(false), parse_deleted) {
                Ok(deleted) => deleted,
                Err(reason) => {
                    dropped.push(Dropped::cell(idx, column, reason));
                    continue;
                }
            },
            None => false,
        };
        entities.push(EntityRecord {
            created_at,
            deleted,
        });
    }
    StageOutput::new(entities, dropped)
}

/// Wide frame with `new_entries`, `existing_entries` and `total_entries`.
pub fn entity_counts_frame(counts: &[MonthlyEntityCounts]) -> MonthlyFrame {
    let mut frame = MonthlyFrame::new(
        ENTITY_DISPLAY_NAMES
            .iter()
            .map(|(column, _)| (*column).to_string())
            .collect(),
    );
    for (idx, count) in counts.iter().enumerate() {
        frame.push(MonthlyRow {
            row: idx,
            month: count.month,
            values: BTreeMap::from([
                ("new_entries".to_string(), Ok(count.new as f64)),
                ("existing_entries".to_string(), Ok(count.existing as f64)),
                ("total_entries".to_string(), Ok(count.total as f64)),
            ]),
        });
    }
    frame.sort_chronologically();
    frame
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn created(month: u32, day: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, month, day)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    fn triples(counts: &[MonthlyEntityCounts]) -> Vec<(String, usize, usize, usize)> {
        counts
            .iter()
            .map(|c| (c.month.label(), c.new, c.existing, c.total))
            .collect()
    }

    #[test]
    fn existing_counts_everything_before_the_month() {
        let entities = vec![
            EntityRecord::new(created(3, 2)),
            EntityRecord::new(created(1, 5)),
            EntityRecord::new(created(2, 1)),
            EntityRecord::new(created(1, 20)),
            EntityRecord::new(created(2, 14)),
            EntityRecord::new(created(2, 28)),
        ];
        assert_eq!(
            triples(&entity_counts(&entities)),
            vec![
                ("Jan 2024".to_string(), 2, 0, 2),
                ("Feb 2024".to_string(), 3, 2, 5),
                ("Mar 2024".to_string(), 1, 5, 6),
            ]
        );
    }

    #[test]
    fn existing_spans_months_without_new_entities() {
        let entities = vec![
            EntityRecord::new(created(1, 5)),
            EntityRecord::new(created(4, 5)),
        ];
        assert_eq!(
            triples(&entity_counts(&entities)),
            vec![
                ("Jan 2024".to_string(), 1, 0, 1),
                ("Apr 2024".to_string(), 1, 1, 2),
            ]
        );
    }

    #[test]
    fn deleted_entities_are_excluded() {
        let entities = vec![
            EntityRecord::new(created(1, 5)),
            EntityRecord::deleted(created(1, 6)),
            EntityRecord::deleted(created(2, 6)),
            EntityRecord::new(created(3, 6)),
        ];
        assert_eq!(
            triples(&entity_counts(&entities)),
            vec![
                ("Jan 2024".to_string(), 1, 0, 1),
                ("Mar 2024".to_string(), 1, 1, 2),
            ]
        );
    }

    #[test]
    fn reads_deletion_flags() {
        let table = RawTable::from_records(
            vec!["created_at".to_string(), "deleted".to_string()],
            vec![
                vec![Some("2024-01-05"), Some("false")],
                vec![Some("2024-01-06"), Some("Yes")],
                vec![Some("2024-01-07"), None],
                vec![Some("2024-01-08"), Some("2024-02-01 09:00:00")],
                vec![Some("2024-01-09"), Some("maybe")],
                vec![None, Some("no")],
                vec![Some("2024-01-10"), Some("0.0")],
                vec![Some("2024-01-11"), Some("1.0")],
            ],
        );
        let out = entity_rows_from_table(&table, "created_at", Some("deleted"));
        let flags: Vec<bool> = out.value.iter().map(|e| e.deleted).collect();
        assert_eq!(flags, vec![false, true, false, true, false, true]);
        assert_eq!(
            out.dropped,
            vec![
                Dropped::cell(4, "deleted", DropReason::NonNumeric),
                Dropped::cell(5, "created_at", DropReason::MissingValue),
            ]
        );
    }

    #[test]
    fn frame_uses_snake_case_columns() {
        let counts = entity_counts(&[EntityRecord::new(created(1, 1))]);
        let frame = entity_counts_frame(&counts);
        assert_eq!(
            frame.value_columns,
            vec!["new_entries", "existing_entries", "total_entries"]
        );
        assert_eq!(frame.rows[0].values["existing_entries"], Ok(0.0));
    }
}
