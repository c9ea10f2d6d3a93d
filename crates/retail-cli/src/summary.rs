use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use retail_model::{IntegrityIssueKind, IntegrityReport, TableSummary};
use retail_cli::logging::redact_value;
use retail_cli::pipeline::RunResult;

pub fn print_summary(result: &RunResult) {
    println!("Output: {}", result.output_dir.display());
    if let Some(path) = &result.manifest {
        println!("Load manifest: {}", path.display());
    }
    if let Some(load) = &result.load
        && !load.scripts_applied.is_empty()
    {
        println!("Constraints applied: {}", load.scripts_applied.join(", "));
    }

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Description"),
        header_cell("Input rows"),
        header_cell("Output rows"),
        header_cell("Dropped"),
        header_cell("Output file"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    let mut total_input = 0usize;
    let mut total_output = 0usize;
    let mut total_dropped = 0usize;
    for summary in &result.tables {
        total_input += summary.input_rows;
        total_output += summary.output_rows;
        total_dropped += summary.dropped();
        table.add_row(summary_row(summary));
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_input).add_attribute(Attribute::Bold),
        Cell::new(total_output).add_attribute(Attribute::Bold),
        count_cell(total_dropped).add_attribute(Attribute::Bold),
        dim_cell("-"),
    ]);
    println!("{table}");
}

fn summary_row(summary: &TableSummary) -> Vec<Cell> {
    let input = if summary.table.raw_file_name().is_some() {
        Cell::new(summary.input_rows)
    } else {
        dim_cell("-")
    };
    let file = summary
        .output_path
        .as_ref()
        .and_then(|path| path.file_name())
        .map_or_else(|| dim_cell("-"), |name| Cell::new(name.to_string_lossy()));
    vec![
        table_cell(summary.table.warehouse_table()),
        Cell::new(summary.table.description()),
        input,
        Cell::new(summary.output_rows),
        count_cell(summary.dropped()),
        file,
    ]
}

/// Prints the integrity findings, if any.
pub fn print_issue_table(report: &IntegrityReport) {
    if report.is_clean() {
        println!("Integrity: OK");
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Column"),
        header_cell("Check"),
        header_cell("Count"),
        header_cell("Example"),
    ]);
    apply_issue_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for issue in &report.issues {
        table.add_row(vec![
            table_cell(issue.table.warehouse_table()),
            Cell::new(&issue.column),
            kind_cell(issue.kind),
            Cell::new(issue.count).fg(Color::Red),
            issue
                .example
                .as_deref()
                .map_or_else(|| dim_cell("-"), |value| Cell::new(redact_value(value))),
        ]);
    }
    println!();
    println!("Integrity issues:");
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn apply_issue_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn kind_cell(kind: IntegrityIssueKind) -> Cell {
    let label = match kind {
        IntegrityIssueKind::DuplicateKey => "duplicate key",
        IntegrityIssueKind::DanglingReference => "dangling reference",
        IntegrityIssueKind::InvalidStatus => "invalid status",
        IntegrityIssueKind::MissingColumn => "missing column",
    };
    Cell::new(label).fg(Color::Red)
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count)
            .fg(Color::Yellow)
            .add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn table_cell(name: &str) -> Cell {
    Cell::new(name)
        .fg(Color::Blue)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
