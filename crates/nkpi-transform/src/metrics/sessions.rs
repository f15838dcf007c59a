//! Average session duration.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use tracing::debug;

use nkpi_model::{Dropped, MonthKey, RawTable};

use super::{display_map, present};
use crate::frame::{MonthlyFrame, MonthlyRow};
use crate::normalization::timestamp_for_value;
use crate::report::StageOutput;

pub const SESSION_DISPLAY_NAMES: [(&str, &str); 2] = [
    ("avg_minutes", "Avg Minutes"),
    ("avg_seconds", "Avg Seconds"),
];

pub fn session_display_names() -> BTreeMap<String, String> {
    display_map(&SESSION_DISPLAY_NAMES)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionEvent {
    pub session_id: String,
    pub timestamp: NaiveDateTime,
}

impl SessionEvent {
    pub fn new(session_id: impl Into<String>, timestamp: NaiveDateTime) -> Self {
        Self {
            session_id: session_id.into(),
            timestamp,
        }
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MonthlySessionDuration {
    pub month: MonthKey,
    pub sessions: usize,
    /// Mean session length in seconds.
    pub average_seconds: f64,
    /// Whole minutes of the mean.
    pub minutes: u64,
    /// Seconds left over after `minutes`, in `[0, 60)`.
    pub seconds: f64,
}

/// Average session duration per calendar month.
///
/// A session lasts from its first to its last event and belongs to the month
/// of its first event. Single-event sessions count with a duration of zero.
pub fn average_session_duration(events: &[SessionEvent]) -> Vec<MonthlySessionDuration> {
    let mut bounds: BTreeMap<&str, (NaiveDateTime, NaiveDateTime)> = BTreeMap::new();
    for event in events {
        bounds
            .entry(event.session_id.as_str())
            .and_modify(|(first, last)| {
                *first = (*first).min(event.timestamp);
                *last = (*last).max(event.timestamp);
            })
            .or_insert((event.timestamp, event.timestamp));
    }

    let mut by_month: BTreeMap<MonthKey, Vec<f64>> = BTreeMap::new();
    for (first, last) in bounds.values() {
        let seconds = (*last - *first).num_milliseconds() as f64 / 1000.0;
        by_month
            .entry(MonthKey::from_datetime(*first))
            .or_default()
            .push(seconds);
    }

    let months: Vec<MonthlySessionDuration> = by_month
        .into_iter()
        .map(|(month, durations)| {
            let average_seconds = durations.iter().sum::<f64>() / durations.len() as f64;
            let minutes = (average_seconds / 60.0).floor();
            MonthlySessionDuration {
                month,
                sessions: durations.len(),
                average_seconds,
                minutes: minutes as u64,
                seconds: average_seconds - minutes * 60.0,
            }
        })
        .collect();
    debug!(
        events = events.len(),
        sessions = bounds.len(),
        months = months.len(),
        "computed session durations"
    );
    months
}

/// Read session events from two columns of a table.
pub fn session_events_from_table(
    table: &RawTable,
    session_column: &str,
    timestamp_column: &str,
) -> StageOutput<Vec<SessionEvent>> {
    let missing: Vec<Dropped> = [session_column, timestamp_column]
        .into_iter()
        .filter(|c| !table.has_column(c))
        .map(Dropped::column)
        .collect();
    if !missing.is_empty() {
        return StageOutput::new(Vec::new(), missing);
    }

    let mut events = Vec::with_capacity(table.len());
    let mut dropped = Vec::new();
    for (idx, row) in table.rows.iter().enumerate() {
        let session_id = match present(row.get(session_column)) {
            Ok(value) => value.to_string().trim().to_string(),
            Err(reason) => {
                dropped.push(Dropped::cell(idx, session_column, reason));
                continue;
            }
        };
        let timestamp =
            match present(row.get(timestamp_column)).and_then(timestamp_for_value) {
                Ok(timestamp) => timestamp,
                Err(reason) => {
                    dropped.push(Dropped::cell(idx, timestamp_column, reason));
                    continue;
                }
            };
        events.push(SessionEvent::new(session_id, timestamp));
    }
    StageOutput::new(events, dropped)
}

/// Wide frame with `avg_minutes` and `avg_seconds` per month.
pub fn sessions_frame(durations: &[MonthlySessionDuration]) -> MonthlyFrame {
    let mut frame = MonthlyFrame::new(
        SESSION_DISPLAY_NAMES
            .iter()
            .map(|(column, _)| (*column).to_string())
            .collect(),
    );
    for (idx, duration) in durations.iter().enumerate() {
        frame.push(MonthlyRow {
            row: idx,
            month: duration.month,
            values: BTreeMap::from([
                ("avg_minutes".to_string(), Ok(duration.minutes as f64)),
                ("avg_seconds".to_string(), Ok(duration.seconds)),
            ]),
        });
    }
    frame.sort_chronologically();
    frame
}
