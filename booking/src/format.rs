//! Display formatting helpers shared by the wizard and the manager.

use chrono::{DateTime, Utc};

/// Render a timestamp as a short display date, e.g. `"Sat, Mar 1, 2025"`.
#[must_use]
pub fn display_date(ts: DateTime<Utc>) -> String {
    ts.format("%a, %b %-d, %Y").to_string()
}

/// Render a timestamp as a 12-hour clock time, e.g. `"09:30 AM"`.
#[must_use]
pub fn display_time(ts: DateTime<Utc>) -> String {
    ts.format("%I:%M %p").to_string()
}
