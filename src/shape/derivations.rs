//! Deterministic derived fields.
//!
//! Every function here is total: absent, zero or non-finite inputs map to a
//! defined value instead of `NaN` or a panic.

use chrono::{DateTime, Utc};
use serde_json::Value;

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// `part / whole * 100`, clamped to `0..=100`.
///
/// Returns `0.0` when either side is absent or non-finite, or when `whole`
/// is zero.
pub fn ratio_percent(part: Option<f64>, whole: Option<f64>) -> f64 {
    match (part, whole) {
        (Some(part), Some(whole)) if part.is_finite() && whole.is_finite() && whole != 0.0 => {
            (part / whole * 100.0).clamp(0.0, 100.0)
        }
        _ => 0.0,
    }
}

/// Download progress from total and remaining bytes.
///
/// `0.0` unless `size` is positive and `sizeleft` is known.
pub fn download_progress(size: Option<f64>, sizeleft: Option<f64>) -> f64 {
    match (size, sizeleft) {
        (Some(size), Some(_)) if size > 0.0 => 100.0 - ratio_percent(sizeleft, Some(size)),
        _ => 0.0,
    }
}

/// Bytes to mebibytes with a fixed divisor.
pub fn bytes_to_mb(bytes: f64) -> f64 {
    if bytes.is_finite() {
        bytes / BYTES_PER_MB
    } else {
        0.0
    }
}

pub fn count_matching<T>(items: &[T], predicate: impl Fn(&T) -> bool) -> usize {
    items.iter().filter(|item| predicate(item)).count()
}

fn parse_timestamp(entry: &Value, field: &str) -> Option<DateTime<Utc>> {
    entry
        .get(field)
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc))
}

/// Stable sort by an RFC 3339 timestamp field.
///
/// Entries whose field is missing or unparseable keep their relative order
/// and go after every dated entry.
pub fn sort_by_timestamp(entries: &mut [Value], field: &str) {
    entries.sort_by_cached_key(|entry| {
        let at = parse_timestamp(entry, field);
        (at.is_none(), at)
    });
}

/// The earliest entry by `field`; ties keep list order. `None` when empty.
pub fn next_upcoming<'a>(entries: &'a [Value], field: &str) -> Option<&'a Value> {
    let mut best: Option<(&Value, Option<DateTime<Utc>>)> = None;
    for entry in entries {
        let at = parse_timestamp(entry, field);
        let better = match &best {
            None => true,
            Some((_, current)) => match (at, current) {
                (Some(a), Some(c)) => a < *c,
                (Some(_), None) => true,
                (None, _) => false,
            },
        };
        if better {
            best = Some((entry, at));
        }
    }
    best.map(|(entry, _)| entry)
}

/// Player names from a `list` reply such as
/// `"There are 2 of 20 players online: Alice, Bob"`.
///
/// Takes the text between the first and second `:`. No `:` yields nothing.
pub fn parse_player_list(reply: &str) -> Vec<String> {
    match reply.split(':').nth(1) {
        Some(names) => names
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map(str::to_string)
            .collect(),
        None => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ratio_percent_zero_denominator() {
        assert_eq!(ratio_percent(Some(0.0), Some(0.0)), 0.0);
        assert_eq!(ratio_percent(Some(5.0), Some(0.0)), 0.0);
        assert_eq!(ratio_percent(None, Some(10.0)), 0.0);
        assert_eq!(ratio_percent(Some(5.0), None), 0.0);
        assert_eq!(ratio_percent(Some(f64::NAN), Some(1.0)), 0.0);
    }

    #[test]
    fn test_ratio_percent_values() {
        assert_eq!(ratio_percent(Some(1.0), Some(4.0)), 25.0);
        assert_eq!(ratio_percent(Some(9.0), Some(3.0)), 100.0);
        assert_eq!(ratio_percent(Some(-1.0), Some(3.0)), 0.0);
    }

    #[test]
    fn test_download_progress() {
        assert_eq!(download_progress(Some(200.0), Some(50.0)), 75.0);
        assert_eq!(download_progress(Some(0.0), Some(0.0)), 0.0);
        assert_eq!(download_progress(None, Some(10.0)), 0.0);
        assert_eq!(download_progress(Some(100.0), None), 0.0);
        assert_eq!(download_progress(Some(100.0), Some(0.0)), 100.0);
    }

    #[test]
    fn test_bytes_to_mb() {
        assert_eq!(bytes_to_mb(1_048_576.0), 1.0);
        assert_eq!(bytes_to_mb(0.0), 0.0);
        assert_eq!(bytes_to_mb(f64::INFINITY), 0.0);
    }

    #[test]
    fn test_next_upcoming_picks_earliest() {
        // T+3h, T+1h, T+5h
        let entries = vec![
            json!({"id": 3, "airDateUtc": "2026-03-01T15:00:00Z"}),
            json!({"id": 1, "airDateUtc": "2026-03-01T13:00:00Z"}),
            json!({"id": 5, "airDateUtc": "2026-03-01T17:00:00Z"}),
        ];
        assert_eq!(next_upcoming(&entries, "airDateUtc").unwrap()["id"], 1);
    }

    #[test]
    fn test_next_upcoming_empty_and_ties() {
        assert!(next_upcoming(&[], "airDateUtc").is_none());

        let tied = vec![
            json!({"id": "first", "airDateUtc": "2026-03-01T13:00:00Z"}),
            json!({"id": "second", "airDateUtc": "2026-03-01T13:00:00+00:00"}),
        ];
        assert_eq!(next_upcoming(&tied, "airDateUtc").unwrap()["id"], "first");
    }

    #[test]
    fn test_undated_entries_sort_last() {
        let mut entries = vec![
            json!({"id": "a"}),
            json!({"id": "b", "airDateUtc": "2026-03-02T00:00:00Z"}),
            json!({"id": "c", "airDateUtc": "not a date"}),
            json!({"id": "d", "airDateUtc": "2026-03-01T00:00:00Z"}),
        ];
        assert_eq!(next_upcoming(&entries, "airDateUtc").unwrap()["id"], "d");

        sort_by_timestamp(&mut entries, "airDateUtc");
        let order: Vec<_> = entries.iter().map(|e| e["id"].as_str().unwrap()).collect();
        assert_eq!(order, vec!["d", "b", "a", "c"]);
    }

    #[test]
    fn test_parse_player_list() {
        assert_eq!(
            parse_player_list("There are 2 of 20 players online: Alice, Bob"),
            vec!["Alice", "Bob"]
        );
        assert!(parse_player_list("There are 0 of 20 players online:").is_empty());
        assert!(parse_player_list("no colon here").is_empty());
        assert_eq!(parse_player_list("a: x ,, y : z"), vec!["x", "y"]);
    }

    #[test]
    fn test_count_matching() {
        assert_eq!(count_matching(&[1, 2, 3, 4], |n| n % 2 == 0), 2);
        assert_eq!(count_matching::<i32>(&[], |_| true), 0);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn prop_ratio_percent_is_bounded(part in any::<f64>(), whole in any::<f64>()) {
                let pct = ratio_percent(Some(part), Some(whole));
                prop_assert!(pct.is_finite());
                prop_assert!((0.0..=100.0).contains(&pct));
            }

            #[test]
            fn prop_download_progress_is_bounded(size in any::<f64>(), left in any::<f64>()) {
                let pct = download_progress(Some(size), Some(left));
                prop_assert!(pct.is_finite());
                prop_assert!((0.0..=100.0).contains(&pct));
            }

            #[test]
            fn prop_player_names_are_trimmed(reply in ".{0,80}") {
                for name in parse_player_list(&reply) {
                    prop_assert!(!name.is_empty());
                    prop_assert_eq!(name.trim(), name.as_str());
                    prop_assert!(!name.contains(','));
                }
            }
        }
    }
}
