//! Week-key date math.
//!
//! A week is identified by the `YYYY-MM-DD` date of its Monday. Sunday is the
//! last day of the week, so a Sunday maps to the Monday six days earlier and
//! every other day shifts back to the Monday of the same week.

use chrono::{Datelike, Duration, NaiveDate};

use crate::error::{BoardError, Result};

/// Number of day slots in a week.
pub const DAYS_IN_WEEK: usize = 7;

/// Short weekday names indexed by day index (Monday=0).
pub const DAY_NAMES: [&str; DAYS_IN_WEEK] = ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"];

const KEY_FORMAT: &str = "%Y-%m-%d";

/// Return the Monday of the week containing `date`.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    // Day-of-week counted from Sunday=0, as the week grid is laid out.
    let day = date.weekday().num_days_from_sunday() as i64;
    let diff = if day == 0 { -6 } else { 1 - day };
    date + Duration::days(diff)
}

/// Canonical week-key for the week containing `date`.
pub fn key_of(date: NaiveDate) -> String {
    monday_of(date).format(KEY_FORMAT).to_string()
}

/// Parse a week-key (or any ISO date) into the Monday it identifies.
pub fn parse_week_key(key: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), KEY_FORMAT)
        .map(monday_of)
        .map_err(|_| BoardError::InvalidWeekKey(key.to_string()))
}

/// Calendar date of the given day slot (0..=6) in the week starting `monday`.
pub fn day_date(monday: NaiveDate, day_index: usize) -> NaiveDate {
    monday + Duration::days(day_index as i64)
}

/// Key of the week `weeks` away from `week_key` (negative goes back).
pub fn shift_week(week_key: &str, weeks: i64) -> Result<String> {
    let monday = parse_week_key(week_key)?;
    Ok(key_of(monday + Duration::weeks(weeks)))
}

/// Parse a human date for picking a week.
///
/// Supports "today", "tomorrow", "yesterday", "next week", "last week",
/// "in Nw" / "Nw ago", and `YYYY-MM-DD`.
pub fn parse_date_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    match s.as_str() {
        "" | "today" | "this week" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        "next week" => return Some(today + Duration::weeks(1)),
        "last week" => return Some(today - Duration::weeks(1)),
        _ => {}
    }

    if let Some(n) = s.strip_prefix("in ").and_then(|r| r.strip_suffix('w')) {
        if let Ok(weeks) = n.trim().parse::<i64>() {
            return Some(today + Duration::weeks(weeks));
        }
    }
    if let Some(n) = s.strip_suffix("w ago") {
        if let Ok(weeks) = n.trim().parse::<i64>() {
            return Some(today - Duration::weeks(weeks));
        }
    }

    NaiveDate::parse_from_str(&s, KEY_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_wednesday_maps_to_monday() {
        assert_eq!(monday_of(date(2024, 6, 12)), date(2024, 6, 10));
        assert_eq!(key_of(date(2024, 6, 12)), "2024-06-10");
    }

    #[test]
    fn test_sunday_is_last_day_of_week() {
        assert_eq!(monday_of(date(2024, 6, 16)), date(2024, 6, 10));
        assert_eq!(monday_of(date(2024, 6, 17)), date(2024, 6, 17));
    }

    #[test]
    fn test_monday_of_every_day_in_range() {
        let mut d = date(2023, 12, 20);
        for _ in 0..60 {
            let monday = monday_of(d);
            assert_eq!(monday.weekday(), Weekday::Mon);
            let offset = (d - monday).num_days();
            assert!((0..=6).contains(&offset), "{d} -> {monday}");
            if d.weekday() == Weekday::Sun {
                assert_eq!(offset, 6);
            }
            d += Duration::days(1);
        }
    }

    #[test]
    fn test_key_is_stable_and_zero_padded() {
        let d = date(2025, 1, 2);
        assert_eq!(key_of(d), key_of(d));
        assert_eq!(key_of(d), "2024-12-30");
        assert_eq!(key_of(date(2024, 3, 5)), "2024-03-04");
    }

    #[test]
    fn test_parse_week_key_normalises_to_monday() {
        assert_eq!(parse_week_key("2024-06-10").unwrap(), date(2024, 6, 10));
        assert_eq!(parse_week_key("2024-06-13").unwrap(), date(2024, 6, 10));
        assert!(parse_week_key("10/06/2024").is_err());
        assert!(parse_week_key("").is_err());
    }

    #[test]
    fn test_parse_date_input() {
        let today = date(2024, 6, 12);
        assert_eq!(parse_date_input("today", today), Some(today));
        assert_eq!(parse_date_input("Next Week", today), Some(date(2024, 6, 19)));
        assert_eq!(parse_date_input("in 2w", today), Some(date(2024, 6, 26)));
        assert_eq!(parse_date_input("1w ago", today), Some(date(2024, 6, 5)));
        assert_eq!(parse_date_input("2024-01-01", today), Some(date(2024, 1, 1)));
        assert_eq!(parse_date_input("someday", today), None);
    }

    #[test]
    fn test_day_date_and_shift_week() {
        let monday = date(2024, 6, 10);
        assert_eq!(day_date(monday, 6), date(2024, 6, 16));
        assert_eq!(shift_week("2024-06-10", 1).unwrap(), "2024-06-17");
        assert_eq!(shift_week("2024-06-10", -2).unwrap(), "2024-05-27");
        assert_eq!(shift_week("2024-12-30", 1).unwrap(), "2025-01-06");
    }
}
