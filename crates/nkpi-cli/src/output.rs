//! Machine-readable command output.

use std::collections::BTreeMap;

use nkpi_model::{ChartKind, ChartPoint, ChartRequest, Dropped, Stacking, ValueFormat};
use nkpi_transform::TransformReport;

/// `render --format json` document.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ChartDocument {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub kind: ChartKind,
    pub stacking: Stacking,
    pub format: ValueFormat,
    pub series: Vec<String>,
    pub points: Vec<ChartPoint>,
    pub input_rows: usize,
    /// Drop counts keyed by reason.
    pub drop_counts: BTreeMap<String, usize>,
    pub dropped: Vec<Dropped>,
}

impl ChartDocument {
    pub fn new(chart: &ChartRequest, report: &TransformReport) -> Self {
        Self {
            title: chart.title.clone(),
            x_label: chart.x_label.clone(),
            y_label: chart.y_label.clone(),
            kind: chart.kind,
            stacking: chart.stacking,
            format: chart.format,
            series: chart.series.iter().map(|s| s.name.clone()).collect(),
            points: chart.points(),
            input_rows: report.input_rows,
            drop_counts: drop_counts(report),
            dropped: report.dropped.clone(),
        }
    }
}

pub fn drop_counts(report: &TransformReport) -> BTreeMap<String, usize> {
    report
        .counts_by_reason()
        .into_iter()
        .map(|(reason, count)| (reason.as_str().to_string(), count))
        .collect()
}
