//! Time related utils.

use chrono::Utc;

/// DateTime in UTC.
pub type DateTime = chrono::DateTime<Utc>;

/// Get current time in UTC.
pub fn now() -> DateTime {
    Utc::now()
}

/// Format the EdgeGrid signing timestamp: `yyyyMMddTHH:mm:ss+0000`.
///
/// The `+0000` offset is a fixed literal; the time is always UTC with second
/// precision.
pub fn format_timestamp(t: DateTime) -> String {
    t.format("%Y%m%dT%H:%M:%S+0000").to_string()
}
