use chrono::{NaiveDate, NaiveTime};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Parse a `YYYY-MM-DD` calendar date into the first millisecond of that
/// day (UTC)
pub fn day_start_millis(date: &str) -> Option<i64> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    Some(date.and_time(NaiveTime::MIN).and_utc().timestamp_millis())
}

/// Last millisecond of a `YYYY-MM-DD` calendar date (UTC), for inclusive
/// upper bounds
pub fn day_end_millis(date: &str) -> Option<i64> {
    day_start_millis(date).map(|start| start + MILLIS_PER_DAY - 1)
}
