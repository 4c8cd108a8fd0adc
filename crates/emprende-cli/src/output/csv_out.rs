use serde_json::{Map, Value};
use std::io;

use super::scalar_text;

/// Write output as CSV to stdout.
///
/// A result carrying a list of rows (payment schedule, scenarios, daily
/// progress) is written as that list; anything else as `field,value` pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    match value {
        Value::Object(map) => {
            if let Some(Value::Object(result)) = map.get("result") {
                match first_row_list(result) {
                    Some(rows) => write_array_csv(&mut wtr, rows),
                    None => write_fields(&mut wtr, result),
                }
            } else if let Some(Value::Array(results)) = map.get("results") {
                write_array_csv(&mut wtr, results);
            } else {
                write_fields(&mut wtr, map);
            }
        }
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        _ => {
            let _ = wtr.write_record([&scalar_text(value)]);
        }
    }

    let _ = wtr.flush();
}

fn first_row_list(map: &Map<String, Value>) -> Option<&[Value]> {
    map.values().find_map(|v| match v {
        Value::Array(rows) if rows.first().is_some_and(Value::is_object) => Some(rows.as_slice()),
        _ => None,
    })
}

fn write_fields<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in map {
        let _ = wtr.write_record([key.as_str(), &scalar_text(val)]);
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    let Some(Value::Object(first)) = arr.first() else {
        for item in arr {
            let _ = wtr.write_record([&scalar_text(item)]);
        }
        return;
    };

    let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
    let _ = wtr.write_record(&headers);

    for map in arr.iter().filter_map(Value::as_object) {
        let row: Vec<String> = headers
            .iter()
            .map(|h| map.get(*h).map(scalar_text).unwrap_or_default())
            .collect();
        let _ = wtr.write_record(&row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schedule_written_as_rows() {
        let result = json!({
            "monthly_payment": "888.49",
            "schedule": [
                { "month": 1, "payment": "888.49" },
                { "month": 2, "payment": "888.49" }
            ]
        });
        let mut wtr = csv::Writer::from_writer(Vec::new());
        let rows = first_row_list(result.as_object().unwrap()).unwrap();
        write_array_csv(&mut wtr, rows);
        let text = String::from_utf8(wtr.into_inner().unwrap()).unwrap();
        assert_eq!(text, "month,payment\n1,888.49\n2,888.49\n");
    }
}
