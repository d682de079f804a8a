//! Feature/label projection.

use crate::data::{Cell, Table};
use crate::Result;

/// Project the table into a feature sub-table (selected columns, in order)
/// and the label column as strings. Row order stays aligned between the two.
pub fn data_selection(
    table: &Table,
    selected_columns: &[String],
    label_column: &str,
) -> Result<(Table, Vec<String>)> {
    let label_idx = table
        .column_index(label_column)
        .ok_or_else(|| crate::Error::ColumnNotFound(label_column.to_string()))?;
    let labels = table.column(label_idx).map(cell_to_label).collect();
    let features = table.select_columns(selected_columns)?;
    Ok((features, labels))
}

fn cell_to_label(cell: &Cell) -> String {
    match cell {
        Cell::Float(v) => v.to_string(),
        Cell::Text(s) => s.clone(),
        Cell::Missing => String::new(),
    }
}
