//! Table and JSON output formatting for CLI commands.

use serde::Serialize;
use serde_json::Value;
use tabled::{Table, Tabled};

/// Output format selection
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    #[default]
    Table,
    /// JSON output
    Json,
}

/// Print a list of items in the selected format
pub fn print_list<T: Serialize + Tabled>(items: &[T], format: OutputFormat) {
    match format {
        OutputFormat::Table => {
            if items.is_empty() {
                println!("No results found.");
            } else {
                println!("{}", Table::new(items));
            }
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(items).unwrap_or_else(|_| "[]".to_string());
            println!("{json}");
        }
    }
}

/// One flattened field of an item, for table output
#[derive(Debug, Tabled)]
struct FieldRow {
    /// Dotted field path
    field: String,
    /// Rendered value
    value: String,
}

/// Print a single item in the selected format
///
/// Table mode flattens nested objects into `section.key` rows.
pub fn print_item<T: Serialize>(item: &T, format: OutputFormat) {
    let value = match serde_json::to_value(item) {
        Ok(value) => value,
        Err(e) => {
            print_error(&format!("Cannot render output: {e}"));
            return;
        }
    };
    match format {
        OutputFormat::Table => {
            let mut rows = Vec::new();
            flatten("", &value, &mut rows);
            println!("{}", Table::new(rows));
        }
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".to_string());
            println!("{json}");
        }
    }
}

fn flatten(prefix: &str, value: &Value, rows: &mut Vec<FieldRow>) {
    let path = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{prefix}.{key}")
        }
    };
    match value {
        Value::Object(map) if !map.is_empty() => {
            for (key, inner) in map {
                flatten(&path(key), inner, rows);
            }
        }
        Value::Object(_) | Value::Array(_) | Value::Null if prefix.is_empty() => {}
        Value::Object(_) => rows.push(FieldRow {
            field: prefix.to_string(),
            value: "-".to_string(),
        }),
        Value::String(s) => rows.push(FieldRow {
            field: prefix.to_string(),
            value: s.clone(),
        }),
        other => rows.push(FieldRow {
            field: prefix.to_string(),
            value: other.to_string(),
        }),
    }
}

/// Print a success message
pub fn print_success(msg: &str) {
    println!("✓ {msg}");
}

/// Print a warning message
pub fn print_warning(msg: &str) {
    println!("⚠ {msg}");
}

/// Print an error message
pub fn print_error(msg: &str) {
    eprintln!("✗ {msg}");
}

/// Print a key-value pair
pub fn print_kv(key: &str, value: &str) {
    println!("  {:<24} {}", format!("{key}:"), value);
}
