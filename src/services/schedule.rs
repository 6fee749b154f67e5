use chrono::{DateTime, NaiveDateTime, Utc};

/// Parse a stored `start_time` string. Accepts RFC 3339 as well as the
/// bare formats the show form historically posted. Naive timestamps are
/// taken as UTC.
pub fn parse_start_time(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(t) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(t.and_utc());
        }
    }
    None
}

/// A show strictly after `now` is upcoming; everything else, including a
/// show at the current instant or with an unparseable timestamp, is past.
pub fn is_upcoming(start_time: &str, now: DateTime<Utc>) -> bool {
    match parse_start_time(start_time) {
        Some(t) => t > now,
        None => false,
    }
}

/// Split `items` into (past, upcoming), preserving input order within each
/// half.
pub fn partition_by_start_time<T>(
    items: Vec<T>,
    now: DateTime<Utc>,
    start_time: impl Fn(&T) -> &str,
) -> (Vec<T>, Vec<T>) {
    let mut past = Vec::new();
    let mut upcoming = Vec::new();
    for item in items {
        if is_upcoming(start_time(&item), now) {
            upcoming.push(item);
        } else {
            past.push(item);
        }
    }
    (past, upcoming)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<Utc> {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
            .unwrap()
            .and_utc()
    }

    #[test]
    fn strictly_later_is_upcoming() {
        let now = at("2024-06-01 20:00:00");
        assert!(is_upcoming("2024-06-01 20:00:01", now));
        assert!(is_upcoming("2024-06-02T19:30:00Z", now));
    }

    #[test]
    fn now_or_earlier_is_past() {
        let now = at("2024-06-01 20:00:00");
        // A show at the current instant is not upcoming
        assert!(!is_upcoming("2024-06-01 20:00:00", now));
        assert!(!is_upcoming("2024-05-31 23:00:00", now));
    }

    #[test]
    fn unparseable_start_time_is_past() {
        let now = at("2024-06-01 20:00:00");
        assert!(!is_upcoming("next tuesday", now));
        assert!(!is_upcoming("", now));
    }

    #[test]
    fn partition_keeps_every_item() {
        let now = at("2024-06-01 20:00:00");
        let items = vec![
            ("a", "2024-01-01 10:00:00"),
            ("b", "2024-07-01 10:00:00"),
            ("c", "2024-06-01 20:00:00"),
        ];
        let (past, upcoming) = partition_by_start_time(items, now, |i| i.1);
        assert_eq!(past.iter().map(|i| i.0).collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(upcoming.iter().map(|i| i.0).collect::<Vec<_>>(), vec!["b"]);
    }
}
