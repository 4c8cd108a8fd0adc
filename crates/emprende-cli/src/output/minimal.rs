use serde_json::Value;

use super::scalar_text;

/// Key answer of each command, in priority order.
const PRIORITY_KEYS: [&str; 5] = [
    "monthly_payment",
    "break_even_units",
    "projected_net_profit_month_end",
    "deleted",
    "net_monthly_profit",
];

/// Print just the key answer value from the output.
///
/// Looks for the well-known result fields first, then falls back to the
/// first field in the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(Value::Array(entries)) = value.as_object().and_then(|m| m.get("results")) {
        for entry in entries {
            let id = entry.get("id").map(scalar_text).unwrap_or_default();
            let at = entry.get("timestamp").map(scalar_text).unwrap_or_default();
            println!("{} {}", id, at);
        }
        return;
    }

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key).filter(|v| !v.is_null()) {
                println!("{}", scalar_text(val));
                return;
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, scalar_text(val));
            return;
        }
    }

    println!("{}", scalar_text(result_obj));
}
