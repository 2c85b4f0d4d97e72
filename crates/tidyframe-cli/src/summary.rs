use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use tidyframe_cli::job::{CleanRun, DatasetSummary};
use tidyframe_core::{Violation, ViolationKind};
use tidyframe_model::{CleaningSpec, ColumnKey, Converter};

/// Digest prefix shown in the summary table.
const DIGEST_CHARS: usize = 12;

pub fn print_summary(run: &CleanRun) {
    println!("Spec: {}", run.spec_name);
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Rows in"),
        header_cell("Rows out"),
        header_cell("Status"),
        header_cell("Digest"),
        header_cell("Output"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Center);

    let mut total_in = 0usize;
    let mut total_out = 0usize;
    for summary in &run.datasets {
        total_in += summary.rows_in.unwrap_or_default();
        total_out += summary.rows_out.unwrap_or_default();
        table.add_row(vec![
            Cell::new(&summary.dataset)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            count_cell(summary.rows_in),
            count_cell(summary.rows_out),
            status_cell(summary),
            match &summary.digest {
                Some(digest) => Cell::new(&digest[..DIGEST_CHARS.min(digest.len())]),
                None => dim_cell("-"),
            },
            match &summary.output {
                Some(path) => Cell::new(path.display()),
                None => dim_cell("-"),
            },
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        Cell::new(total_in).add_attribute(Attribute::Bold),
        Cell::new(total_out).add_attribute(Attribute::Bold),
        failures_cell(run.failures()),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");
    print_violation_table(run);

    let errors: Vec<&DatasetSummary> = run
        .datasets
        .iter()
        .filter(|d| d.error.as_ref().is_some_and(|e| e.report().is_none()))
        .collect();
    if !errors.is_empty() {
        eprintln!("Errors:");
        for summary in errors {
            if let Some(error) = &summary.error {
                eprintln!("- {}: {error}", summary.dataset);
            }
        }
    }
}

fn print_violation_table(run: &CleanRun) {
    let violations: Vec<(&str, &Violation)> = run
        .datasets
        .iter()
        .filter_map(|d| Some((d.dataset.as_str(), d.error.as_ref()?.report()?)))
        .flat_map(|(dataset, report)| report.iter().map(move |v| (dataset, v)))
        .collect();
    if violations.is_empty() {
        return;
    }
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Kind"),
        header_cell("Column"),
        header_cell("Count"),
        header_cell("Message"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 3, CellAlignment::Right);
    for (dataset, violation) in violations {
        table.add_row(vec![
            Cell::new(dataset),
            kind_cell(violation.kind()),
            Cell::new(violation.column()),
            count_cell(violation.count()),
            Cell::new(violation.message()),
        ]);
    }
    println!();
    println!("Violations:");
    println!("{table}");
}

pub fn print_spec<S: CleaningSpec + ?Sized>(spec: &S) {
    let rename = spec.rename_map();
    let fill = spec.fill_null_map();
    let converters = spec.converter_map();
    let precision = spec.precision_map();
    let required = spec.no_null_cols();
    let aggregate = spec.add_on_duplicate_cols();

    println!("Spec: {}", spec.name());
    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Column"),
        header_cell("Source"),
        header_cell("Type"),
        header_cell("Fill"),
        header_cell("Converter"),
        header_cell("Precision"),
        header_cell("Flags"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 5, CellAlignment::Right);
    for (key, column_type) in spec.dtype_map().iter() {
        let mut flags = Vec::new();
        if required.contains(key) {
            flags.push("required");
        }
        if aggregate.contains(key) {
            flags.push("aggregate");
        }
        table.add_row(vec![
            Cell::new(key)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            optional_cell(rename.get(key)),
            Cell::new(column_type),
            optional_cell(fill.get(key)),
            optional_cell(converters.get(key).map(Converter::name)),
            optional_cell(precision.get(key)),
            if flags.is_empty() {
                dim_cell("-")
            } else {
                Cell::new(flags.join(", "))
            },
        ]);
    }
    println!("{table}");

    let groups = [
        ("Drop when all null", spec.drop_null_subsets()),
        ("Unique by", spec.unique_subsets()),
    ];
    for (label, subsets) in groups {
        for subset in subsets {
            let keys: Vec<&str> = subset.iter().map(ColumnKey::as_str).collect();
            println!("{label}: [{}]", keys.join(", "));
        }
    }
    for sort_key in spec.sort_keys() {
        let direction = if sort_key.descending { "desc" } else { "asc" };
        println!("Sort by: {} {direction}", sort_key.key);
    }
}

fn apply_table_style(table: &mut Table) {
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
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(140);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn status_cell(summary: &DatasetSummary) -> Cell {
    match &summary.error {
        None => Cell::new("ok")
            .fg(Color::Green)
            .add_attribute(Attribute::Bold),
        Some(error) => Cell::new(error.label()).fg(Color::Red),
    }
}

fn failures_cell(failures: usize) -> Cell {
    if failures > 0 {
        Cell::new(format!("{failures} failed"))
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
    } else {
        Cell::new("all ok").fg(Color::Green)
    }
}

fn kind_cell(kind: ViolationKind) -> Cell {
    let color = match kind {
        ViolationKind::MissingColumn | ViolationKind::TypeMismatch => Color::Red,
        ViolationKind::NullValues | ViolationKind::NanValues => Color::Yellow,
        ViolationKind::PrecisionOnNonFloat => Color::Magenta,
    };
    Cell::new(kind.label()).fg(color)
}

fn count_cell(count: Option<usize>) -> Cell {
    match count {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn optional_cell<T: std::fmt::Display>(value: Option<T>) -> Cell {
    match value {
        Some(value) => Cell::new(value),
        None => dim_cell("-"),
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: std::fmt::Display>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
