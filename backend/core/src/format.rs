//! Display helpers shared by the pipeline and the CLI.

use chrono::{DateTime, Utc};

const UNITS: [&str; 5] = ["Bytes", "KB", "MB", "GB", "TB"];
const STEP: u64 = 1024;

/// Convert a byte count into a human-readable string.
///
/// Values are rounded to at most two decimals, trailing zeros dropped:
/// `1536 -> "1.5 KB"`, `52428800 -> "50 MB"`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut unit = 0;
    let mut divisor = 1u64;
    while unit + 1 < UNITS.len() && bytes / divisor >= STEP {
        divisor *= STEP;
        unit += 1;
    }

    let value = bytes as f64 / divisor as f64;
    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

/// Relative label for an activity timestamp ("Just now", "2 hours ago", "Yesterday").
pub fn relative_time_label(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = now.signed_duration_since(then);
    let minutes = elapsed.num_minutes();
    let hours = elapsed.num_hours();
    let days = elapsed.num_days();

    if minutes < 1 {
        "Just now".to_string()
    } else if minutes == 1 {
        "1 minute ago".to_string()
    } else if hours < 1 {
        format!("{minutes} minutes ago")
    } else if hours == 1 {
        "1 hour ago".to_string()
    } else if days < 1 {
        format!("{hours} hours ago")
    } else if days == 1 {
        "Yesterday".to_string()
    } else {
        format!("{days} days ago")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_format_file_size() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(2 * 1024), "2 KB");
        assert_eq!(format_file_size(50 * 1024 * 1024), "50 MB");
        assert_eq!(format_file_size(1_234_567), "1.18 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn test_format_file_size_clamps_to_largest_unit() {
        let five_pb = 5 * 1024u64.pow(5);
        assert_eq!(format_file_size(five_pb), "5120 TB");
    }

    #[test]
    fn test_relative_time_label() {
        let now = Utc::now();
        assert_eq!(relative_time_label(now, now), "Just now");
        // Clock skew must not produce negative labels.
        assert_eq!(relative_time_label(now + Duration::seconds(5), now), "Just now");
        assert_eq!(relative_time_label(now - Duration::minutes(5), now), "5 minutes ago");
        assert_eq!(relative_time_label(now - Duration::hours(2), now), "2 hours ago");
        assert_eq!(relative_time_label(now - Duration::hours(30), now), "Yesterday");
        assert_eq!(relative_time_label(now - Duration::days(4), now), "4 days ago");
    }
}
