use chrono::{DateTime, Utc};

const MINUTE: i64 = 60;
const HOUR: i64 = 60 * MINUTE;
const DAY: i64 = 24 * HOUR;
const WEEK: i64 = 7 * DAY;
const MONTH: i64 = 30 * DAY;
const YEAR: i64 = 365 * DAY;

/// 将时间格式化为相对当前时间的描述，例如 "5 minutes ago"
pub fn format_relative(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let delta = now.signed_duration_since(then).num_seconds();
    let (seconds, suffix) = if delta < 0 {
        (-delta, "from now")
    } else {
        (delta, "ago")
    };

    if seconds < 1 {
        return "now".to_string();
    }

    let (amount, unit) = match seconds {
        s if s < MINUTE => (s, "second"),
        s if s < HOUR => (s / MINUTE, "minute"),
        s if s < DAY => (s / HOUR, "hour"),
        s if s < WEEK => (s / DAY, "day"),
        s if s < MONTH => (s / WEEK, "week"),
        s if s < YEAR => (s / MONTH, "month"),
        s => (s / YEAR, "year"),
    };
    let plural = if amount == 1 { "" } else { "s" };

    format!("{} {}{} {}", amount, unit, plural, suffix)
}
