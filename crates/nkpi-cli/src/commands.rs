use anyhow::{Context, Result};
use tracing::{Level, enabled, info, info_span, warn};

use nkpi_dashboard::Catalog;
use nkpi_model::RawTable;
use nkpi_transform::metrics::{
    average_session_duration, entity_counts, entity_rows_from_table, session_events_from_table,
};
use nkpi_transform::normalization::rename_columns;
use nkpi_transform::{TransformReport, TransformSpec, run};

use nkpi_cli::input::{load_table, trace_dropped_values};
use nkpi_cli::output::{ChartDocument, drop_counts};

use crate::cli::{EntitiesArgs, OutputFormatArg, PagesArgs, RenderArgs, SessionsArgs, SourceArgs};
use crate::summary::{
    print_chart, print_drop_summary, print_entities, print_page, print_pages, print_sessions,
};

/// How a command finished when it did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// Ran fine but there was nothing to show.
    NoData,
}

fn load_source(source: &SourceArgs) -> Result<RawTable> {
    load_table(&source.input, source.range.as_deref())
}

pub fn run_render(args: &RenderArgs) -> Result<Outcome> {
    let mut spec = match &args.spec {
        Some(path) => TransformSpec::from_path(path)
            .with_context(|| format!("load transform spec {}", path.display()))?,
        None => TransformSpec::default(),
    };
    if let Some(title) = &args.title {
        spec.chart.title.clone_from(title);
    }
    let span = info_span!("render", input = %args.source.input.display());
    let _guard = span.enter();

    let table = load_source(&args.source)?;
    let output = run(&table, &spec);
    if enabled!(Level::TRACE) {
        trace_dropped_values(&rename_columns(&table, &spec.rename), &output.report.dropped);
    }
    let missing = output.report.missing_columns();
    if !missing.is_empty() {
        warn!(columns = ?missing, "columns not found");
    }
    info!(
        rows = table.len(),
        series = output.chart.series.len(),
        dropped = output.report.dropped_count(),
        "rendered chart"
    );

    match args.source.format {
        OutputFormatArg::Table => {
            print_chart(&output.chart);
            print_drop_summary(&output.report);
        }
        OutputFormatArg::Json => {
            let document = ChartDocument::new(&output.chart, &output.report);
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }
    if output.is_empty() {
        warn!("no data available");
        return Ok(Outcome::NoData);
    }
    Ok(Outcome::Done)
}

pub fn run_sessions(args: &SessionsArgs) -> Result<Outcome> {
    let span = info_span!("sessions", input = %args.source.input.display());
    let _guard = span.enter();

    let table = load_source(&args.source)?;
    let mut report = TransformReport::new(table.len());
    let events = session_events_from_table(&table, &args.session_column, &args.timestamp_column);
    if enabled!(Level::TRACE) {
        trace_dropped_values(&table, &events.dropped);
    }
    let events = report.record("sessions", events, Vec::len);
    let durations = average_session_duration(&events);
    info!(
        events = events.len(),
        months = durations.len(),
        "computed session durations"
    );

    match args.source.format {
        OutputFormatArg::Table => {
            print_sessions(&durations);
            print_drop_summary(&report);
        }
        OutputFormatArg::Json => {
            let document = serde_json::json!({
                "months": durations,
                "drop_counts": drop_counts(&report),
                "dropped": report.dropped,
            });
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }
    Ok(if durations.is_empty() {
        Outcome::NoData
    } else {
        Outcome::Done
    })
}

pub fn run_entities(args: &EntitiesArgs) -> Result<Outcome> {
    let span = info_span!("entities", input = %args.source.input.display());
    let _guard = span.enter();

    let table = load_source(&args.source)?;
    let mut report = TransformReport::new(table.len());
    let rows = entity_rows_from_table(
        &table,
        &args.created_column,
        args.deleted_column.as_deref(),
    );
    if enabled!(Level::TRACE) {
        trace_dropped_values(&table, &rows.dropped);
    }
    let rows = report.record("entities", rows, Vec::len);
    let counts = entity_counts(&rows);
    info!(entities = rows.len(), months = counts.len(), "computed entity counts");

    match args.source.format {
        OutputFormatArg::Table => {
            print_entities(&counts);
            print_drop_summary(&report);
        }
        OutputFormatArg::Json => {
            let document = serde_json::json!({
                "months": counts,
                "drop_counts": drop_counts(&report),
                "dropped": report.dropped,
            });
            println!("{}", serde_json::to_string_pretty(&document)?);
        }
    }
    Ok(if counts.is_empty() {
        Outcome::NoData
    } else {
        Outcome::Done
    })
}

pub fn run_pages(args: &PagesArgs) -> Result<Outcome> {
    let mut catalog = Catalog::nkpi();
    if let Some(path) = &args.catalog {
        let extra = Catalog::from_path(path)
            .with_context(|| format!("load catalog {}", path.display()))?;
        catalog.merge(extra);
    }
    match &args.page {
        Some(label) => print_page(catalog.page(label)?),
        None => print_pages(&catalog),
    }
    Ok(Outcome::Done)
}
