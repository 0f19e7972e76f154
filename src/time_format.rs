use chrono::{DateTime, Utc};

/// Calendar date of a submission, used for chart axis labels.
///
/// Examples:
/// - 2025-01-17T10:21:29Z: "2025-01-17"
pub fn format_submission_date(submitted_at: DateTime<Utc>) -> String {
    submitted_at.format("%Y-%m-%d").to_string()
}

/// Minutes with two decimals.
///
/// Examples:
/// - 0.1: "0.10 minutes"
/// - 15.0: "15.00 minutes"
pub fn format_minutes(minutes: f64) -> String {
    format!("{:.2} minutes", minutes)
}
