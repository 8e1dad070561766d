//! Shared timestamp rendering for report output

use chrono::{DateTime, Utc};

// E.g. Tue, May 8, 2018 at 14:23:53
const REPORT_TIME_FORMAT: &str = "%a, %b %-d, %Y at %H:%M:%S";

/// Renders a timestamp the way both report surfaces display it
pub(crate) fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.format(REPORT_TIME_FORMAT).to_string()
}
