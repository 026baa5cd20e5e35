use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};

use super::*;

#[test]
fn timestamp_format_matches_stamp_layout() {
    let at = NaiveDate::from_ymd_opt(2024, 6, 5)
        .unwrap()
        .and_hms_opt(15, 45, 10)
        .unwrap()
        .and_utc();
    assert_eq!(format_timestamp(&at), "05 Jun, 2024 03:45 PM, Wednesday");
}

#[test]
fn timestamp_uses_local_offset_of_the_datetime() {
    let tz = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
    let at = Utc
        .with_ymd_and_hms(2024, 1, 1, 0, 15, 0)
        .unwrap()
        .with_timezone(&tz);
    assert_eq!(format_timestamp(&at), "01 Jan, 2024 05:45 AM, Monday");
}

#[test]
fn location_lines() {
    let loc = Location {
        city: Some("Metropolis".to_string()),
        pincode: Some("100001".to_string()),
        latitude: 12.9,
        longitude: 77.6,
    };
    let c = Caption::for_location(&loc);
    assert_eq!(
        c.lines(),
        &["Metropolis", "Pincode: 100001", "Lat: 12.9, Long: 77.6"]
    );
}

#[test]
fn missing_city_and_pincode_render_unknown() {
    let loc = Location {
        city: None,
        pincode: None,
        latitude: -33.0,
        longitude: 151.25,
    };
    let c = Caption::for_location(&loc);
    assert_eq!(c.lines()[0], "Unknown");
    assert_eq!(c.lines()[1], "Pincode: Unknown");
    assert_eq!(c.lines()[2], "Lat: -33, Long: 151.25");
}

#[test]
fn text_appends_timestamp_line() {
    let c = Caption::new(["a", "b"]);
    assert_eq!(c.text("now"), "a\nb\nnow");
    assert_eq!(c.text(""), "a\nb");
}

#[test]
fn empty_caption_and_timestamp_is_empty_text() {
    assert!(Caption::default().is_empty());
    assert_eq!(Caption::default().text(""), "");
}
