//! CSV export of the per-stake rows.
//!
//! Every field is quoted and embedded quotes are doubled. The rows come from
//! [`stake_rows`], the same projection the interactive table uses.

use chrono::{DateTime, SecondsFormat, Utc};

use bnote_core::error::BnoteError;
use bnote_core::units::format_units;
use bnote_core::{ProtocolParameters, StakeRecord, Timestamp};

use crate::analytics::{stake_rows, StakeRow};

/// Column order of the export.
pub const CSV_HEADERS: [&str; 10] = [
    "index",
    "amount",
    "lock_days",
    "start_timestamp",
    "start_iso",
    "unlock_timestamp",
    "unlock_iso",
    "status",
    "days_remaining",
    "estimated_penalty_percent",
];

/// `2024-01-01T00:00:00.000Z`; empty if the timestamp is out of range.
pub fn iso8601(ts: Timestamp) -> String {
    DateTime::<Utc>::from_timestamp(ts, 0)
        .map(|dt| dt.to_rfc3339_opts(SecondsFormat::Millis, true))
        .unwrap_or_default()
}

/// Field values of one row, in [`CSV_HEADERS`] order. Amounts are rendered
/// in whole-token units.
pub fn csv_fields(row: &StakeRow, token_decimals: u8) -> Vec<String> {
    vec![
        row.index.to_string(),
        format_units(row.principal_amount, token_decimals),
        row.lock_days.to_string(),
        row.start_timestamp.to_string(),
        iso8601(row.start_timestamp),
        row.unlock_timestamp.to_string(),
        iso8601(row.unlock_timestamp),
        row.status.as_str().to_string(),
        row.days_remaining.to_string(),
        format!("{:.2}", row.estimated_penalty_percent),
    ]
}

fn quote(field: &str) -> String {
    format!("\"{}\"", field.replace('"', "\"\""))
}

fn csv_line<S: AsRef<str>>(fields: &[S]) -> String {
    fields
        .iter()
        .map(|f| quote(f.as_ref()))
        .collect::<Vec<_>>()
        .join(",")
}

/// Render already-projected rows.
pub fn rows_to_csv(rows: &[StakeRow], token_decimals: u8) -> String {
    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(csv_line(&CSV_HEADERS));
    for row in rows {
        lines.push(csv_line(&csv_fields(row, token_decimals)));
    }
    lines.join("\n")
}

/// Project and render the owner's stakes at `now`.
pub fn stakes_csv(
    stakes: &[StakeRecord],
    params: &ProtocolParameters,
    now: Timestamp,
) -> Result<String, BnoteError> {
    let rows = stake_rows(stakes, params, now)?;
    Ok(rows_to_csv(&rows, params.token_decimals))
}
