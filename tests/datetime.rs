use chrono::{Datelike, Duration, NaiveDate, Timelike, Weekday};
use mastertask::utils::datetime::{self, DateFormat};

fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

#[test]
fn test_week_start_is_monday_midnight() {
    // Every day of the week of 2024-06-10 (a Monday), including Sunday
    for day in 10..=16 {
        let reference = date(2024, 6, day).and_hms_opt(13, 45, 12).unwrap();
        let start = datetime::week_start(reference);
        assert_eq!(start.weekday(), Weekday::Mon);
        assert_eq!(start.date(), date(2024, 6, 10));
        assert_eq!((start.hour(), start.minute(), start.second()), (0, 0, 0));
    }
}

#[test]
fn test_week_span() {
    let reference = date(2024, 2, 29).and_hms_opt(8, 0, 0).unwrap();
    let span = datetime::week_end(reference) - datetime::week_start(reference);
    assert_eq!(
        span,
        Duration::days(6) + Duration::hours(23) + Duration::minutes(59) + Duration::seconds(59) + Duration::milliseconds(999)
    );
    assert_eq!(datetime::week_end(reference).weekday(), Weekday::Sun);
}

#[test]
fn test_in_same_week_edges() {
    let reference = date(2024, 6, 12).and_hms_opt(12, 0, 0).unwrap();
    assert!(datetime::in_same_week(date(2024, 6, 10).and_hms_opt(0, 0, 0).unwrap(), reference));
    assert!(datetime::in_same_week(date(2024, 6, 16).and_hms_opt(23, 59, 59).unwrap(), reference));
    assert!(!datetime::in_same_week(date(2024, 6, 17).and_hms_opt(0, 0, 0).unwrap(), reference));
    assert!(!datetime::in_same_week(date(2024, 6, 9).and_hms_opt(23, 59, 59).unwrap(), reference));
}

#[test]
fn test_parse_deadline_formats() {
    let expected = date(2024, 6, 10).and_hms_opt(14, 30, 0).unwrap();
    assert_eq!(datetime::parse_deadline("2024-06-10T14:30:00"), Some(expected));
    assert_eq!(datetime::parse_deadline("2024-06-10 14:30"), Some(expected));
    assert_eq!(datetime::parse_deadline("2024-06-10T14:30"), Some(expected));
    assert_eq!(
        datetime::parse_deadline("2024-06-10"),
        Some(date(2024, 6, 10).and_hms_opt(0, 0, 0).unwrap())
    );
    assert!(datetime::parse_deadline("2024-06-10T14:30:00Z").is_some());
}

#[test]
fn test_parse_deadline_rejects_garbage() {
    assert_eq!(datetime::parse_deadline(""), None);
    assert_eq!(datetime::parse_deadline("   "), None);
    assert_eq!(datetime::parse_deadline("tomorrow"), None);
    assert_eq!(datetime::parse_deadline("2024-13-40"), None);
}

#[test]
fn test_parse_timestamp_normalises_offsets_to_utc() {
    assert_eq!(
        datetime::parse_timestamp("2024-06-10T14:30:00+02:00"),
        Some(date(2024, 6, 10).and_hms_opt(12, 30, 0).unwrap())
    );
    assert_eq!(
        datetime::parse_timestamp("2024-06-10T14:30:00.123456"),
        Some(date(2024, 6, 10).and_hms_micro_opt(14, 30, 0, 123_456).unwrap())
    );
}

#[test]
fn test_format_deadline_round_trips_through_parse() {
    let deadline = date(2024, 12, 31).and_hms_opt(23, 5, 0).unwrap();
    let formatted = datetime::format_deadline(deadline);
    assert_eq!(formatted, "2024-12-31T23:05:00");
    assert_eq!(datetime::parse_deadline(&formatted), Some(deadline));
}

#[test]
fn test_date_formats() {
    let d = date(2024, 3, 7);
    assert_eq!(DateFormat::default(), DateFormat::DayMonthYearSlash);
    assert_eq!(DateFormat::DayMonthYearSlash.format(d), "07/03/2024");
    assert_eq!(DateFormat::MonthDayYearSlash.format(d), "03/07/2024");
    assert_eq!(DateFormat::Iso.format(d), "2024-03-07");
    assert_eq!(DateFormat::DayMonthYearDot.format(d), "07.03.2024");
    assert_eq!(DateFormat::MonthDayYearDot.format(d), "03.07.2024");
}

#[test]
fn test_date_format_parsing_and_invalid_input() {
    for format in DateFormat::ALL {
        assert_eq!(format.as_str().parse::<DateFormat>().unwrap(), format);
    }
    assert!("YYYY/DD/MM".parse::<DateFormat>().is_err());
    assert_eq!(DateFormat::Iso.format_str("not a date"), "");
    assert_eq!(DateFormat::DayMonthYearDot.format_str("2024-01-02"), "02.01.2024");
}

#[test]
fn test_date_format_from_preferences() {
    let mut prefs = serde_json::Map::new();
    assert_eq!(DateFormat::from_preferences(None), DateFormat::DayMonthYearSlash);
    assert_eq!(DateFormat::from_preferences(Some(&prefs)), DateFormat::DayMonthYearSlash);

    prefs.insert("dateFormat".to_string(), serde_json::json!("YYYY-MM-DD"));
    assert_eq!(DateFormat::from_preferences(Some(&prefs)), DateFormat::Iso);

    prefs.insert("dateFormat".to_string(), serde_json::json!("bogus"));
    assert_eq!(DateFormat::from_preferences(Some(&prefs)), DateFormat::DayMonthYearSlash);
    assert_eq!(DateFormat::preferred(Some(&prefs)), None);
    assert_eq!(DateFormat::preferred(None), None);
}
