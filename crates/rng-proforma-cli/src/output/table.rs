use serde_json::Value;
use tabled::{builder::Builder, Table};

use super::format_value;

/// Columns shown in the per-year table (the full record is available via
/// --output json).
const YEAR_COLUMNS: &[&str] = &[
    "year",
    "calendar_year",
    "rng_mmbtu",
    "total_revenue",
    "total_opex",
    "ebitda",
    "debt_service",
    "net_cash_flow",
    "cumulative_cash_flow",
];

/// Format output as a table using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(value);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &serde_json::Map<String, Value>) {
    if let Value::Object(res_map) = result {
        // Metrics first when present, then the remaining scalar fields.
        if let Some(Value::Object(metrics)) = res_map.get("metrics") {
            let mut builder = Builder::default();
            builder.push_record(["Metric", "Value"]);
            for (key, val) in metrics {
                builder.push_record([key.as_str(), &format_value(val)]);
            }
            println!("{}", Table::from(builder));
        }

        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in res_map {
            if key == "metrics" || key == "years" || key == "assumptions" {
                continue;
            }
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));

        if let Some(Value::Array(years)) = res_map.get("years") {
            print_year_table(years);
        }
    } else {
        print_flat_object(&Value::Object(envelope.clone()));
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::Object(warning) = w {
                    let severity = warning.get("severity").map(format_value).unwrap_or_default();
                    let field = warning.get("field").map(format_value).unwrap_or_default();
                    let message = warning.get("message").map(format_value).unwrap_or_default();
                    println!("  - [{}] {}: {}", severity, field, message);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

fn print_year_table(years: &[Value]) {
    if years.is_empty() {
        return;
    }

    let mut builder = Builder::default();
    builder.push_record(YEAR_COLUMNS.iter().copied());
    for year in years {
        if let Value::Object(map) = year {
            let row: Vec<String> = YEAR_COLUMNS
                .iter()
                .map(|col| map.get(*col).map(format_value).unwrap_or_default())
                .collect();
            builder.push_record(row);
        }
    }
    println!("{}", Table::from(builder));
}

fn print_flat_object(value: &Value) {
    if let Value::Object(map) = value {
        let mut builder = Builder::default();
        builder.push_record(["Field", "Value"]);
        for (key, val) in map {
            builder.push_record([key.as_str(), &format_value(val)]);
        }
        println!("{}", Table::from(builder));
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = first.keys().cloned().collect();
        let mut builder = Builder::default();
        builder.push_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(h.as_str()).map(format_value).unwrap_or_default())
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", format_value(item));
        }
    }
}
