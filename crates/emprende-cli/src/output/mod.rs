pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Render a single JSON value as cell text. Break-even values come through
/// as `{"finite": "236"}` or `"unreachable"`.
pub(crate) fn scalar_text(value: &Value) -> String {
    match value {
        Value::String(s) if s == "unreachable" => "N/A".to_string(),
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        Value::Array(arr) => arr.iter().map(scalar_text).collect::<Vec<_>>().join(", "),
        Value::Object(map) => match map.get("finite") {
            Some(inner) if map.len() == 1 => scalar_text(inner),
            _ => serde_json::to_string(value).unwrap_or_default(),
        },
    }
}
