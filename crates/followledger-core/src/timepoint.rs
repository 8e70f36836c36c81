//! Time point headers: parsing, ISO formatting, and chronological order.

use crate::extract::MembershipSets;
use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};
use followledger_core_types::schema::{EVENT_TIMESTAMP_FALLBACK, EVENT_TIME_POINT_MERGED};

const ISO_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// Raw input for one time point, keyed by its column header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimePointInput {
    pub header: String,
    pub sets: MembershipSets,
}

/// A time point with its resolved ISO-8601 timestamp
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTimePoint {
    pub header: String,
    pub timestamp: String,
    pub sets: MembershipSets,
}

/// Parse a header such as `6/30/2025` (or `2025-06-30`) to noon on that day
pub fn parse_header(header: &str) -> Option<NaiveDateTime> {
    let header = header.trim();
    let date = parse_us_date(header)
        .or_else(|| NaiveDate::parse_from_str(header, "%Y-%m-%d").ok())?;
    Some(date.and_time(NaiveTime::from_hms_opt(12, 0, 0)?))
}

fn parse_us_date(header: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = header.split('/').collect();
    if parts.len() != 3 {
        return None;
    }
    let month: u32 = parts[0].trim().parse().ok()?;
    let day: u32 = parts[1].trim().parse().ok()?;
    let year: i32 = parts[2].trim().parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Current local wall-clock time in ISO-8601 with microseconds
pub fn iso_now() -> String {
    Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// ISO-8601 timestamp for a header, falling back to now when it does not parse
pub fn header_to_iso(header: &str) -> String {
    match parse_header(header) {
        Some(dt) => dt.format(ISO_FORMAT).to_string(),
        None => {
            tracing::warn!(
                component = module_path!(),
                op = "header_to_iso",
                event = EVENT_TIMESTAMP_FALLBACK,
                time_point = header,
                "unparseable time point header, using current time"
            );
            iso_now()
        }
    }
}

/// Resolve timestamps and order time points chronologically
///
/// The sort is stable: headers that fail to parse keep their relative
/// order after all parsed ones. Headers naming the same day (`6/1/2025`
/// and `2025-06-01`) are merged into one time point holding the union of
/// their sets, so timestamps are strictly ascending.
pub fn resolve_time_points(inputs: Vec<TimePointInput>) -> Vec<ResolvedTimePoint> {
    let mut keyed: Vec<(Option<NaiveDateTime>, ResolvedTimePoint)> = inputs
        .into_iter()
        .map(|input| {
            let parsed = parse_header(&input.header);
            let timestamp = header_to_iso(&input.header);
            (
                parsed,
                ResolvedTimePoint {
                    header: input.header,
                    timestamp,
                    sets: input.sets,
                },
            )
        })
        .collect();

    keyed.sort_by_key(|(parsed, _)| (parsed.is_none(), *parsed));

    let mut resolved: Vec<(Option<NaiveDateTime>, ResolvedTimePoint)> =
        Vec::with_capacity(keyed.len());
    for (parsed, tp) in keyed {
        let same_day = parsed.is_some()
            && resolved.last().is_some_and(|(last, _)| *last == parsed);
        match resolved.last_mut() {
            Some((_, kept)) if same_day => {
                tracing::warn!(
                    component = module_path!(),
                    op = "resolve_time_points",
                    event = EVENT_TIME_POINT_MERGED,
                    time_point = tp.header.as_str(),
                    merged_into = kept.header.as_str(),
                    "time point shares its date with an earlier header, sets merged"
                );
                kept.sets.followed.extend(tp.sets.followed);
                kept.sets.not_following_back.extend(tp.sets.not_following_back);
            }
            _ => resolved.push((parsed, tp)),
        }
    }

    resolved.into_iter().map(|(_, tp)| tp).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input(header: &str) -> TimePointInput {
        TimePointInput {
            header: header.to_string(),
            sets: MembershipSets::default(),
        }
    }

    #[test]
    fn test_us_date_maps_to_noon() {
        assert_eq!(header_to_iso("6/1/2025"), "2025-06-01T12:00:00");
        assert_eq!(header_to_iso("12/31/2024"), "2024-12-31T12:00:00");
    }

    #[test]
    fn test_iso_date_header_accepted() {
        assert_eq!(header_to_iso("2025-08-07"), "2025-08-07T12:00:00");
    }

    #[test]
    fn test_invalid_headers_do_not_parse() {
        assert!(parse_header("Unnamed: 0").is_none());
        assert!(parse_header("13/1/2025").is_none());
        assert!(parse_header("2/30/2025").is_none());
        assert!(parse_header("6/1").is_none());
    }

    #[test]
    fn test_fallback_is_current_time() {
        let before = Local::now().naive_local();
        let ts = header_to_iso("not a date");
        let parsed = NaiveDateTime::parse_from_str(&ts, "%Y-%m-%dT%H:%M:%S%.f").unwrap();
        assert!(parsed >= before - chrono::Duration::seconds(1));
    }

    #[test]
    fn test_resolve_orders_chronologically_not_lexically() {
        let resolved = resolve_time_points(vec![
            input("9/7/2025"),
            input("garbage"),
            input("10/1/2025"),
            input("6/1/2025"),
        ]);
        let headers: Vec<&str> = resolved.iter().map(|t| t.header.as_str()).collect();
        assert_eq!(headers, vec!["6/1/2025", "9/7/2025", "10/1/2025", "garbage"]);
    }

    #[test]
    fn test_same_day_headers_are_merged() {
        let resolved = resolve_time_points(vec![
            TimePointInput {
                header: "6/1/2025".to_string(),
                sets: MembershipSets::from_raw(["a"], ["a"]),
            },
            input("7/1/2025"),
            TimePointInput {
                header: "2025-06-01".to_string(),
                sets: MembershipSets::from_raw(["b"], Vec::<String>::new()),
            },
        ]);

        let timestamps: Vec<&str> = resolved.iter().map(|t| t.timestamp.as_str()).collect();
        assert_eq!(timestamps, vec!["2025-06-01T12:00:00", "2025-07-01T12:00:00"]);
        assert_eq!(resolved[0].header, "6/1/2025");
        assert_eq!(resolved[0].sets.followed.len(), 2);
        assert!(resolved[0].sets.not_following_back.contains("a"));
    }
}
