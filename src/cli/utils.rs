use anyhow::Context;
use serde_json::Value;
use std::io::Read;

use crate::cli::OutputFormat;

/// Print a result value in the selected format. Text mode prints items one
/// per line; everything else falls back to pretty JSON.
pub fn output_value(output_format: &OutputFormat, value: &Value) -> anyhow::Result<()> {
    match output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(value)?);
        }
        OutputFormat::Text => match value {
            Value::Array(entries) => {
                for entry in entries {
                    println!("{}", text_line(entry));
                }
            }
            other => println!("{}", text_line(other)),
        },
    }
    Ok(())
}

/// One-line rendering of an item or summary object
fn text_line(value: &Value) -> String {
    let obj = match value.as_object() {
        Some(obj) => obj,
        None => return value.to_string(),
    };

    // Items have an id; model summaries do not
    if let Some(id) = obj.get("id").and_then(Value::as_str) {
        let deleted = obj.get("deleted").and_then(Value::as_bool).unwrap_or(false);
        format!(
            "{}  {}  v{}  {}{}",
            id,
            obj.get("model").and_then(Value::as_str).unwrap_or("?"),
            obj.get("version").and_then(Value::as_f64).unwrap_or(0.0),
            obj.get("created").and_then(Value::as_str).unwrap_or(""),
            if deleted { "  [deleted]" } else { "" },
        )
    } else if let Some(model) = obj.get("model").and_then(Value::as_str) {
        format!(
            "{}  {} live / {} deleted / {} total",
            model,
            obj.get("count").and_then(Value::as_i64).unwrap_or(0),
            obj.get("deleted_count").and_then(Value::as_i64).unwrap_or(0),
            obj.get("total_count").and_then(Value::as_i64).unwrap_or(0),
        )
    } else {
        value.to_string()
    }
}

/// Read a JSON payload from stdin (for create/update commands)
pub fn read_stdin_json() -> anyhow::Result<Value> {
    let mut buffer = String::new();
    std::io::stdin().read_to_string(&mut buffer).context("failed to read stdin")?;
    serde_json::from_str(&buffer).context("stdin was not valid JSON")
}
