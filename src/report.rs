//! Human-readable training report assembly.
//!
//! The report echoes the cross-validation score and model parameters, shows
//! held-out classification metrics, and includes a ready-to-send prediction
//! request body built from real test rows.

use serde_json::{json, Number, Value};

use crate::data::{Cell, Table};
use crate::model::SvcParams;
use crate::{Error, Result};

/// How many test rows to embed as prediction examples.
pub const EXAMPLE_ROWS: usize = 2;

/// Assemble the full report text.
pub fn build_report(
    cv_score: f64,
    params: &SvcParams,
    test_report: &str,
    examples: &Table,
) -> Result<String> {
    let params_json =
        serde_json::to_string(params).map_err(|e| Error::Serialization(e.to_string()))?;
    let instances = instances_json(examples)?;

    Ok(format!(
        "\nTraining Job Report\n\n\
         Cross Validation Score: {cv_score}\n\n\
         Training Model Parameters: {params_json}\n\n\
         Test Data Classification Report:\n{test_report}\n\
         Example of data array for prediction:\n\n\
         Order of columns:\n{columns:?}\n\n\
         Example for predict()\n{rows}\n\n\n\
         Example of GCP API request body:\n{instances}\n",
        columns = examples.column_names(),
        rows = render_example_rows(examples),
    ))
}

/// Render example rows as one bracketed array of row literals, strings
/// single-quoted and numerics bare.
fn render_example_rows(examples: &Table) -> String {
    let rows: Vec<String> = examples
        .rows()
        .iter()
        .map(|row| {
            let cells: Vec<String> = row.iter().map(render_cell).collect();
            format!("[{}]", cells.join(", "))
        })
        .collect();
    format!("[{}]", rows.join(", \n"))
}

fn render_cell(cell: &Cell) -> String {
    match cell {
        Cell::Float(v) => format!("{v}"),
        Cell::Text(s) => format!("'{s}'"),
        Cell::Missing => "None".to_string(),
    }
}

/// The `instances` request body: one bare value array per example row, in
/// the column order the "Order of columns" section documents.
fn instances_json(examples: &Table) -> Result<String> {
    let instances: Vec<Value> = examples
        .rows()
        .iter()
        .map(|row| Value::Array(row.iter().map(cell_to_json).collect()))
        .collect();
    let body = json!({ "instances": instances });
    serde_json::to_string_pretty(&body).map_err(|e| Error::Serialization(e.to_string()))
}

fn cell_to_json(cell: &Cell) -> Value {
    match cell {
        Cell::Float(v) => Number::from_f64(*v).map_or(Value::Null, Value::Number),
        Cell::Text(s) => Value::String(s.clone()),
        Cell::Missing => Value::Null,
    }
}
