use serde_json::Value;

use super::{result_object, row_tables};

/// Print just the headline figure of a result: the initial liability for a
/// schedule, otherwise the number of rows produced.
pub fn print_minimal(value: &Value) {
    let Some(result) = result_object(value) else {
        println!("{}", format_minimal(value));
        return;
    };

    for key in ["initial_lease_liability", "total_interest_expense"] {
        if let Some(val) = result.get(key) {
            if !val.is_null() {
                println!("{}", format_minimal(val));
                return;
            }
        }
    }

    if let Some((name, rows)) = row_tables(result).first() {
        println!("{}: {}", name, rows.len());
        return;
    }

    if let Some((key, val)) = result.iter().next() {
        println!("{}: {}", key, format_minimal(val));
    }
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
