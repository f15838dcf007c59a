//! Page rendering.

use tracing::{info_span, warn};

use nkpi_model::{ChartRequest, RawTable};
use nkpi_transform::metrics::{
    average_session_duration, entity_counts, entity_counts_frame, entity_display_names,
    entity_rows_from_table, session_display_names, session_events_from_table, sessions_frame,
};
use nkpi_transform::{TransformOutput, TransformReport, chart_from_frame, run};

use crate::cache::FetchCache;
use crate::catalog::{COMING_SOON_URL, MetricSpec, Page, PanelContent};
use crate::source::TableSource;

#[derive(Debug, Clone, PartialEq)]
pub enum PanelOutput {
    Image {
        url: String,
    },
    ComingSoon {
        url: String,
    },
    Chart {
        chart: ChartRequest,
        report: TransformReport,
    },
    /// Nothing to draw; `report` says what was dropped, if anything ran.
    NoData {
        report: Option<TransformReport>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPanel {
    pub title: String,
    pub output: PanelOutput,
}

/// Run one live metric over a fetched table.
fn run_metric(table: &RawTable, metric: &MetricSpec) -> TransformOutput {
    match metric {
        MetricSpec::Transform(spec) => run(table, spec),
        MetricSpec::Sessions {
            session_column,
            timestamp_column,
            chart,
        } => {
            let events = session_events_from_table(table, session_column, timestamp_column);
            let frame = sessions_frame(&average_session_duration(&events.value));
            let mut output = chart_from_frame(&frame, &session_display_names(), chart);
            output.report.input_rows = table.len();
            for dropped in events.dropped {
                output.report.push(dropped);
            }
            output
        }
        MetricSpec::Entities {
            created_column,
            deleted_column,
            chart,
        } => {
            let rows = entity_rows_from_table(table, created_column, deleted_column.as_deref());
            let frame = entity_counts_frame(&entity_counts(&rows.value));
            let mut output = chart_from_frame(&frame, &entity_display_names(), chart);
            output.report.input_rows = table.len();
            for dropped in rows.dropped {
                output.report.push(dropped);
            }
            output
        }
    }
}

/// Render every panel of `page`.
///
/// A panel whose fetch fails renders as [`PanelOutput::NoData`]; the page as
/// a whole never fails.
pub fn render_page(
    page: &Page,
    source: &dyn TableSource,
    cache: &mut FetchCache,
) -> Vec<RenderedPanel> {
    let span = info_span!("render_page", page = %page.label);
    let _guard = span.enter();

    page.panels
        .iter()
        .map(|panel| {
            let output = match &panel.content {
                PanelContent::Image { url } => PanelOutput::Image { url: url.clone() },
                PanelContent::ComingSoon => PanelOutput::ComingSoon {
                    url: COMING_SOON_URL.to_string(),
                },
                PanelContent::Metric { source: request, metric } => {
                    match cache.get_or_fetch(request, source) {
                        Ok(table) => {
                            let output = run_metric(table, metric);
                            if output.is_empty() {
                                PanelOutput::NoData {
                                    report: Some(output.report),
                                }
                            } else {
                                let mut chart = output.chart;
                                if chart.title.is_empty() {
                                    chart.title.clone_from(&panel.title);
                                }
                                PanelOutput::Chart {
                                    chart,
                                    report: output.report,
                                }
                            }
                        }
                        Err(error) => {
                            warn!(panel = %panel.title, request = %request, %error, "fetch failed");
                            PanelOutput::NoData { report: None }
                        }
                    }
                }
            };
            RenderedPanel {
                title: panel.title.clone(),
                output,
            }
        })
        .collect()
}
