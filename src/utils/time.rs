use chrono::DateTime;
use chrono::SecondsFormat;
use chrono::Utc;

/// Current UTC time truncated to millisecond precision, so a value survives
/// a round trip through its external representation unchanged.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now)
}

/// Formats a timestamp as `2023-06-01T12:00:00.000Z`
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// return second
pub(crate) fn get_now_as_u32() -> u32 {
    Utc::now().timestamp() as u32
}
