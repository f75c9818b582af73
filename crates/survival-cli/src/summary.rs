use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use survival_cli::logging::redact_value;
use survival_cli::types::{ExposureStage, RunSummary, SurvivalStage};
use survival_model::{EventCategory, ExposureAnomaly};

/// Anomaly rows shown before the table is cut short.
const MAX_ANOMALY_ROWS: usize = 50;

pub fn print_summary(summary: &RunSummary) {
    println!("Command: {}", summary.command);
    println!("Input: {}", summary.input.display());
    if let Some(stage) = &summary.survival {
        println!("Survival table: {}", stage.output.display());
    }
    if let Some(stage) = &summary.exposure {
        println!("Monthly table: {}", stage.output.display());
    }
    if let Some(stage) = &summary.survival {
        println!("{}", end_reason_table(stage));
    }
    if let Some(stage) = &summary.exposure {
        println!("{}", exposure_table(stage));
        print_anomaly_table(&stage.anomalies);
    }
    println!("Elapsed: {} ms", summary.elapsed_ms);
}

fn end_reason_table(stage: &SurvivalStage) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("End reason"),
        header_cell("Subjects"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    for category in [
        EventCategory::Primary,
        EventCategory::Competing,
        EventCategory::Censor,
    ] {
        let count = stage.end_reasons.get(category);
        table.add_row(vec![Cell::new(category), count_cell(count, Color::Blue)]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(stage.subjects).add_attribute(Attribute::Bold),
    ]);
    table.add_row(vec![
        dim_cell(format!("priority: {}", stage.priority)),
        dim_cell(format!("{} days at risk", stage.person_days)),
    ]);
    table
}

fn exposure_table(stage: &ExposureStage) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Subjects"),
        header_cell("Month rows"),
        header_cell("Person-days"),
        header_cell("Checksum"),
        header_cell("Anomalies"),
    ]);
    apply_table_style(&mut table);
    for index in 0..5 {
        align_column(&mut table, index, CellAlignment::Right);
    }
    let checksum = match stage.expected_checksum {
        Some(expected) if expected == stage.person_days => Cell::new(expected).fg(Color::Green),
        Some(expected) => Cell::new(expected)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold),
        None => dim_cell("-"),
    };
    table.add_row(vec![
        Cell::new(stage.subjects),
        Cell::new(stage.month_rows),
        Cell::new(stage.person_days),
        checksum,
        count_cell(stage.anomalies.len(), Color::Yellow),
    ]);
    table
}

fn print_anomaly_table(anomalies: &[ExposureAnomaly]) {
    if anomalies.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Kind"),
        header_cell("Subject"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    for anomaly in anomalies.iter().take(MAX_ANOMALY_ROWS) {
        let subject = anomaly
            .subject()
            .map_or_else(|| dim_cell("-"), |id| Cell::new(redact_value(id)));
        table.add_row(vec![
            Cell::new(anomaly.kind()).fg(Color::Yellow),
            subject,
            Cell::new(anomaly.message()),
        ]);
    }
    println!();
    println!("Anomalies:");
    println!("{table}");
    if anomalies.len() > MAX_ANOMALY_ROWS {
        println!("... {} more", anomalies.len() - MAX_ANOMALY_ROWS);
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn count_cell(count: usize, color: Color) -> Cell {
    if count > 0 {
        Cell::new(count).fg(color).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
