//! CLI output: error mapping and record formatting for the CLI surface.

use crate::error::CmciError;
use owo_colors::OwoColorize;
use serde_json::Value;

/// Map domain errors to a string for CLI output.
/// Keeps route handlers thin; extend with stable categories if needed.
pub fn map_error(e: &CmciError) -> String {
    e.to_string()
}

/// Success line with a green check mark.
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green(), message)
}

/// Render query records as a table.
///
/// Columns are the sorted union of attribute names across all records so
/// records with differing attribute sets still line up.
pub fn format_records_table(records: &[Value]) -> String {
    if records.is_empty() {
        return "No resources found.".to_string();
    }

    let mut columns: Vec<String> = Vec::new();
    for record in records {
        if let Value::Object(map) = record {
            for key in map.keys() {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
            }
        }
    }
    columns.sort();

    use comfy_table::Table;
    let mut table = Table::new();
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.set_header(columns.clone());
    for record in records {
        let row: Vec<String> = columns
            .iter()
            .map(|col| {
                record
                    .get(col)
                    .and_then(|v| v.as_str())
                    .unwrap_or("")
                    .to_string()
            })
            .collect();
        table.add_row(row);
    }
    table.to_string()
}

/// Render query records as pretty-printed JSON.
pub fn format_records_json(records: &[Value]) -> Result<String, CmciError> {
    serde_json::to_string_pretty(records)
        .map_err(|e| CmciError::Response(format!("Failed to serialize records: {}", e)))
}
