use chrono::TimeZone;
use chrono::Utc;

use super::time::format_timestamp;
use super::time::get_now_as_u32;
use super::time::now_millis;

#[test]
fn test_format_timestamp_uses_fixed_millisecond_precision() {
    let ts = Utc.with_ymd_and_hms(2023, 6, 1, 12, 0, 0).unwrap();
    assert_eq!(format_timestamp(&ts), "2023-06-01T12:00:00.000Z");
}

#[test]
fn test_now_millis_has_no_sub_millisecond_part() {
    let now = now_millis();
    assert_eq!(now.timestamp_subsec_nanos() % 1_000_000, 0);
}

#[test]
fn test_get_now_as_u32() {
    // 2021-01-01
    assert!(get_now_as_u32() > 1609459200);
}
