use std::io::{self, Write};

use serde_json::Value;

/// Pretty-print JSON to stdout.
pub fn print_json(value: &Value) {
    let rendered = match serde_json::to_string_pretty(value) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("JSON serialization error: {}", e);
            return;
        }
    };
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{}", rendered);
}
