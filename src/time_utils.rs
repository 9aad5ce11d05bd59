use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parse a server timestamp.
///
/// Accepts RFC 3339, naive ISO date-times (read as UTC), bare dates and
/// integral epoch milliseconds. Returns `None` for anything else.
pub fn parse_iso_date(value: &str) -> Option<DateTime<Utc>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(parsed.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|naive| Utc.from_utc_datetime(&naive));
    }
    trimmed
        .parse::<i64>()
        .ok()
        .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
}

/// Epoch milliseconds of a server timestamp
pub fn parse_iso_millis(value: &str) -> Option<i64> {
    parse_iso_date(value).map(|date| date.timestamp_millis())
}

/// `MM-DD HH:MM` in UTC, or the raw value when it is not a date.
pub fn format_compact_timestamp(value: &str) -> String {
    match parse_iso_date(value) {
        Some(date) => date.format("%m-%d %H:%M").to_string(),
        None => value.to_string(),
    }
}

/// `HH:MM:SS` wall-clock caption for "updated …" labels.
pub fn format_clock_time(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|date| date.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "--:--:--".to_string())
}

/// `DD Mon YYYY`, used by timeline tooltips.
pub fn format_day_month_year(timestamp_ms: i64) -> String {
    Utc.timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|date| date.format("%d %b %Y").to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_server_shapes() {
        let expected = Utc.with_ymd_and_hms(2024, 3, 5, 14, 30, 0).unwrap();
        assert_eq!(parse_iso_date("2024-03-05T14:30:00Z"), Some(expected));
        assert_eq!(parse_iso_date("2024-03-05T14:30:00"), Some(expected));
        assert_eq!(parse_iso_date("2024-03-05 14:30:00.000"), Some(expected));
        assert_eq!(parse_iso_date("2024-03-05T16:30:00+02:00"), Some(expected));
        assert_eq!(
            parse_iso_date("2024-03-05"),
            Some(Utc.with_ymd_and_hms(2024, 3, 5, 0, 0, 0).unwrap())
        );
        assert_eq!(parse_iso_date("not a date"), None);
        assert_eq!(parse_iso_date(""), None);
    }

    #[test]
    fn compact_timestamp_falls_back_to_raw() {
        assert_eq!(format_compact_timestamp("2024-03-05T14:30:00Z"), "03-05 14:30");
        assert_eq!(format_compact_timestamp("1.0012"), "1.0012");
    }

    #[test]
    fn clock_and_day_formats() {
        assert_eq!(format_clock_time(0), "00:00:00");
        assert_eq!(format_day_month_year(0), "01 Jan 1970");
    }
}
