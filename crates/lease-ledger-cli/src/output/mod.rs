pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::{Map, Value};

/// Array fields of a result that hold report rows, in display priority.
const ROW_FIELDS: [&str; 3] = ["rows", "lines", "totals"];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The `result` object of an output envelope, or the value itself.
fn result_object(value: &Value) -> Option<&Map<String, Value>> {
    value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value)
        .as_object()
}

/// Row tables in a result, by field name.
fn row_tables(result: &Map<String, Value>) -> Vec<(&str, &[Value])> {
    ROW_FIELDS
        .iter()
        .filter_map(|key| match result.get(*key) {
            Some(Value::Array(rows)) => Some((*key, rows.as_slice())),
            _ => None,
        })
        .collect()
}
