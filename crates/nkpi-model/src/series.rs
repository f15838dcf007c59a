use crate::{DropReason, MonthKey};

/// One long-form `(month, series, value)` triple.
///
/// `value` carries the reason when the source cell could not be coerced, so
/// the positive-value filter can report why the record was dropped.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LongRecord {
    /// Index of the source row this record came from.
    pub row: usize,
    pub month: MonthKey,
    pub series: String,
    pub value: Result<f64, DropReason>,
}

impl LongRecord {
    pub fn new(
        row: usize,
        month: MonthKey,
        series: impl Into<String>,
        value: Result<f64, DropReason>,
    ) -> Self {
        Self {
            row,
            month,
            series: series.into(),
            value,
        }
    }
}

/// A named, chronologically ordered sequence of positive values.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct MetricSeries {
    pub name: String,
    pub points: Vec<(MonthKey, f64)>,
}

impl MetricSeries {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            points: Vec::new(),
        }
    }

    pub fn push(&mut self, month: MonthKey, value: f64) {
        self.points.push((month, value));
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }
}
