//! Shared rendering helpers.

use anyhow::Result;
use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled};

/// Prints `value` as pretty JSON.
///
/// # Errors
///
/// Returns an error if `value` cannot be serialized.
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Prints `rows` as a table, or `empty` when there are none.
pub fn print_table<T: Tabled>(rows: Vec<T>, empty: &str) {
    if rows.is_empty() {
        println!("{empty}");
    } else {
        println!("{}", Table::new(rows));
    }
}

/// Colors a workspace or resource status.
#[must_use]
pub fn status_colored(status: &str) -> String {
    match status {
        "RUNNING" => status.green().to_string(),
        "FAILED" | "BANNED" => status.red().to_string(),
        "PROVISIONING" => status.yellow().to_string(),
        "NOT_PROVISIONED" | "CANCELLING" => status.dimmed().to_string(),
        _ => status.to_string(),
    }
}

/// Formats epoch milliseconds as UTC, or `-` when unknown.
#[must_use]
pub fn timestamp(epoch_millis: i64) -> String {
    chrono::DateTime::from_timestamp_millis(epoch_millis)
        .filter(|_| epoch_millis > 0)
        .map_or_else(
            || "-".to_string(),
            |time| time.format("%Y-%m-%d %H:%M:%S").to_string(),
        )
}

/// Renders an optional field.
#[must_use]
pub fn or_dash(value: Option<&str>) -> String {
    value.unwrap_or("-").to_string()
}
