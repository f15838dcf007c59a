//! End-to-end transform driver.

use std::collections::BTreeMap;

use tracing::{debug, debug_span, warn};

use nkpi_model::{ChartRequest, Dropped, LongRecord, RawTable};

use crate::filter::filter_positive;
use crate::frame::{MonthlyFrame, build_monthly_frame};
use crate::normalization::rename_columns;
use crate::report::TransformReport;
use crate::reshape::{WideTable, group_series, melt, pivot, read_long};
use crate::spec::{ChartSpec, Layout, TransformSpec};

/// A finished transform: the chart, the records behind it, and the drops.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    pub chart: ChartRequest,
    /// Filtered long records, chronological within each series.
    pub records: Vec<LongRecord>,
    pub report: TransformReport,
}

impl TransformOutput {
    fn empty(spec: &ChartSpec, report: TransformReport) -> Self {
        Self {
            chart: spec.build(Vec::new()),
            records: Vec::new(),
            report,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.chart.is_empty()
    }

    pub fn pivot(&self) -> WideTable {
        pivot(&self.records)
    }
}

/// Run a transform over one source table.
///
/// Never fails: an empty source, missing required columns, or rows with no
/// usable values all end in an empty chart with the reasons in the report.
pub fn run(table: &RawTable, spec: &TransformSpec) -> TransformOutput {
    let span = debug_span!("transform", title = %spec.chart.title);
    let _guard = span.enter();

    let mut report = TransformReport::new(table.len());
    if table.is_empty() {
        debug!("source table is empty");
        return TransformOutput::empty(&spec.chart, report);
    }

    let table = rename_columns(table, &spec.rename);
    let check = spec.schema(&table).check(&table);
    if !check.is_satisfied() {
        let missing: Vec<&str> = check
            .missing
            .iter()
            .filter(|c| c.required)
            .map(|c| c.name.as_str())
            .collect();
        warn!(missing = ?missing, "required columns missing");
        for column in missing {
            report.push(Dropped::column(column));
        }
        return TransformOutput::empty(&spec.chart, report);
    }

    let records = match &spec.layout {
        Layout::Wide { .. } => {
            let value_columns = spec.value_columns(&table);
            let frame = report.record(
                "frame",
                build_monthly_frame(&table, &spec.month, &value_columns),
                MonthlyFrame::len,
            );
            report.record("melt", melt(&frame, &spec.display_names), Vec::len)
        }
        Layout::Long {
            type_column,
            value_column,
        } => report.record(
            "read_long",
            read_long(
                &table,
                &spec.month,
                type_column,
                value_column,
                &spec.display_names,
            ),
            Vec::len,
        ),
    };

    finish(records, &spec.chart, report)
}

/// Chart an already-built frame, e.g. one produced by a derived metric.
pub fn chart_from_frame(
    frame: &MonthlyFrame,
    display_names: &BTreeMap<String, String>,
    chart: &ChartSpec,
) -> TransformOutput {
    let mut report = TransformReport::new(frame.len());
    let records = report.record("melt", melt(frame, display_names), Vec::len);
    finish(records, chart, report)
}

fn finish(
    records: Vec<LongRecord>,
    chart: &ChartSpec,
    mut report: TransformReport,
) -> TransformOutput {
    let records = report.record("filter", filter_positive(records), Vec::len);
    let series = group_series(&records);
    let chart = chart.build(series);
    debug!(
        series = chart.series.len(),
        records = records.len(),
        dropped = report.dropped_count(),
        "transform complete"
    );
    TransformOutput {
        chart,
        records,
        report,
    }
}
