use chrono::{DateTime, NaiveDateTime, Utc};

/// Parses the timestamp formats the API emits.
///
/// Accepts RFC 3339 and `Mon, 10 Feb 2026 12:00:00 UTC`. The weekday of the
/// latter is ignored since the server does not always get it right.
pub fn parse_api_datetime(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let rest = match s.split_once(", ") {
        Some((_weekday, rest)) => rest,
        None => s,
    };
    let rest = ["UTC", "GMT", "+0000", "Z"]
        .iter()
        .find_map(|zone| rest.strip_suffix(zone))
        .unwrap_or(rest)
        .trim_end();
    NaiveDateTime::parse_from_str(rest, "%d %b %Y %H:%M:%S")
        .ok()
        .map(|naive| naive.and_utc())
}

/// "just now", "5m ago", "3h ago", "7d ago", or "Jan 15, 2024" past 30 days.
pub fn relative_time(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - then).num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }
    let minutes = seconds / 60;
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    let days = hours / 24;
    if days < 30 {
        return format!("{days}d ago");
    }
    then.format("%b %d, %Y").to_string()
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone};

    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 12, 9, 30, 0).unwrap()
    }

    #[test]
    fn buckets() {
        let now = now();
        assert_eq!(relative_time(now, now), "just now");
        assert_eq!(relative_time(now - Duration::seconds(59), now), "just now");
        assert_eq!(relative_time(now - Duration::minutes(5), now), "5m ago");
        assert_eq!(relative_time(now - Duration::hours(3), now), "3h ago");
        assert_eq!(relative_time(now - Duration::days(7), now), "7d ago");
        assert_eq!(relative_time(now - Duration::days(29), now), "29d ago");
    }

    #[test]
    fn old_dates_are_absolute() {
        let then = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        assert_eq!(relative_time(then, now()), "Jan 15, 2024");
    }

    #[test]
    fn future_timestamps_read_as_just_now() {
        let now = now();
        assert_eq!(relative_time(now + Duration::hours(2), now), "just now");
    }

    #[test]
    fn parses_http_style_dates() {
        let expected = Utc.with_ymd_and_hms(2026, 2, 10, 12, 0, 0).unwrap();
        assert_eq!(parse_api_datetime("Mon, 10 Feb 2026 12:00:00 UTC"), Some(expected));
        assert_eq!(parse_api_datetime("Tue, 10 Feb 2026 12:00:00 GMT"), Some(expected));
    }

    #[test]
    fn parses_rfc3339() {
        let expected = Utc.with_ymd_and_hms(2026, 2, 10, 11, 0, 0).unwrap();
        assert_eq!(parse_api_datetime("2026-02-10T12:00:00+01:00"), Some(expected));
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_api_datetime(""), None);
        assert_eq!(parse_api_datetime("yesterday"), None);
    }
}
