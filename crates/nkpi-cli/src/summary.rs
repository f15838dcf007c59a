use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use nkpi_dashboard::{Catalog, Page, PanelContent};
use nkpi_model::ChartRequest;
use nkpi_transform::TransformReport;
use nkpi_transform::metrics::{MonthlyEntityCounts, MonthlySessionDuration};

pub fn print_chart(chart: &ChartRequest) {
    if !chart.title.is_empty() {
        println!("{}", chart.title);
    }
    if chart.is_empty() {
        println!("No data available.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell(&chart.x_label),
        header_cell("Series"),
        header_cell(&chart.y_label),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    for point in chart.points() {
        table.add_row(vec![
            Cell::new(point.label),
            Cell::new(point.series),
            Cell::new(point.value_label),
        ]);
    }
    println!("{table}");
}

pub fn print_drop_summary(report: &TransformReport) {
    let counts = report.counts_by_reason();
    if counts.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![header_cell("Dropped"), header_cell("Count")]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for (reason, count) in counts {
        table.add_row(vec![Cell::new(reason), count_cell(count, Color::Yellow)]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(report.dropped_count()).add_attribute(Attribute::Bold),
    ]);
    println!("{table}");
    let missing = report.missing_columns();
    if !missing.is_empty() {
        eprintln!("Missing columns: {}", missing.join(", "));
    }
}

pub fn print_sessions(durations: &[MonthlySessionDuration]) {
    if durations.is_empty() {
        println!("No data available.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Month-Year"),
        header_cell("Sessions"),
        header_cell("Avg Minutes"),
        header_cell("Avg Seconds"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for duration in durations {
        table.add_row(vec![
            Cell::new(duration.month),
            Cell::new(duration.sessions),
            Cell::new(duration.minutes),
            Cell::new(format!("{:.1}", duration.seconds)),
        ]);
    }
    println!("{table}");
}

pub fn print_entities(counts: &[MonthlyEntityCounts]) {
    if counts.is_empty() {
        println!("No data available.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Month-Year"),
        header_cell("New Entries"),
        header_cell("Existing Entries"),
        header_cell("Total Entries"),
    ]);
    apply_table_style(&mut table);
    for index in 1..=3 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    for count in counts {
        table.add_row(vec![
            Cell::new(count.month),
            Cell::new(count.new),
            dim_zero(count.existing),
            Cell::new(count.total).add_attribute(Attribute::Bold),
        ]);
    }
    println!("{table}");
}

pub fn print_pages(catalog: &Catalog) {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Page"),
        header_cell("Panels"),
        header_cell("Live"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for page in &catalog.pages {
        let live = page
            .panels
            .iter()
            .filter(|p| matches!(p.content, PanelContent::Metric { .. }))
            .count();
        table.add_row(vec![
            Cell::new(&page.label).add_attribute(Attribute::Bold),
            dim_zero(page.panels.len()),
            dim_zero(live),
        ]);
    }
    println!("{table}");
}

pub fn print_page(page: &Page) {
    println!("{}", page.label);
    if page.panels.is_empty() {
        println!("No panels.");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Panel"),
        header_cell("Kind"),
        header_cell("Source"),
    ]);
    apply_table_style(&mut table);
    for panel in &page.panels {
        let (kind, source) = match &panel.content {
            PanelContent::Image { url } => (Cell::new("image"), dim_cell(url)),
            PanelContent::ComingSoon => (
                Cell::new("coming soon").fg(Color::DarkGrey),
                dim_cell("-"),
            ),
            PanelContent::Metric { source, .. } => (
                Cell::new("metric").fg(Color::Green),
                Cell::new(source.cache_key()),
            ),
        };
        table.add_row(vec![Cell::new(&panel.title), kind, source]);
    }
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn dim_zero(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
    } else {
        dim_cell(count)
    }
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
