//! Terminal rendering of preview snapshots.

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Cell, CellAlignment, ContentArrangement, Table};

use dpv_model::RowRecord;
use dpv_widget::PreviewState;

fn base_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Renders up to `limit` data rows, optionally sorted by one column.
///
/// Sorting goes through the column's own comparator, so number and date
/// columns order the same way they would in the embedded grid.
pub fn preview_table(state: &PreviewState, limit: usize, sort_by: Option<&str>) -> Table {
    let mut table = base_table();
    table.set_header(state.columns.iter().map(|column| Cell::new(&column.header_name)));
    for (index, column) in state.columns.iter().enumerate() {
        if column.kind == dpv_grid::ColumnKind::Number
            && let Some(table_column) = table.column_mut(index)
        {
            table_column.set_cell_alignment(CellAlignment::Right);
        }
    }

    let mut rows: Vec<&RowRecord> = state.rows.iter().collect();
    if let Some(name) = sort_by
        && let Some(column) = state
            .columns
            .iter()
            .find(|column| column.field == name && column.sortable)
    {
        rows.sort_by(|a, b| column.compare_rows(a, b));
    }
    for row in rows.into_iter().take(limit) {
        table.add_row(
            state
                .columns
                .iter()
                .map(|column| row.get(&column.field).unwrap_or("")),
        );
    }
    table
}

/// Renders the field-information panel.
pub fn field_info_table(state: &PreviewState) -> Table {
    let mut table = base_table();
    table.set_header(["Field", "Units", "Data Type", "Format", "Description"]);
    for info in state.field_info.iter() {
        table.add_row([
            info.name.as_str(),
            info.units.as_str(),
            info.field_type.as_str(),
            info.format.as_str(),
            info.description.as_str(),
        ]);
    }
    table
}

/// Formats a row count with thousands separators, e.g. `50,000`.
pub fn group_thousands(value: usize) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i).is_multiple_of(3) {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}
