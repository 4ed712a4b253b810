//! Display helpers shared by listing and detail views.

use chrono::{DateTime, Utc};

/// Timestamp format used in admin listings: `DD/MM/YYYY HH:MM:SS`.
pub const TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";

/// Format a record timestamp, blank when absent.
pub fn format_timestamp(ts: Option<&DateTime<Utc>>) -> String {
    ts.map(|t| t.format(TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}
