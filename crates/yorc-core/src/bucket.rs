//! Calendar bucketing.
//!
//! Storage groups records under raw keys (`YYYY`, `YYYYMM`, `YYYY-MM-DD`).
//! These functions turn a key into the date that starts its bucket.
//!
//! Keys come from our own queries, so a malformed key is a broken contract
//! rather than bad user input. Every function here panics on one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Count of records in the bucket starting at `date`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemporalCount {
    pub date: NaiveDate,
    pub count: u64,
}

/// Bucket for a calendar year: January 1st of `year`.
///
/// # Panics
///
/// Panics if `year` is outside chrono's representable range.
pub fn year_bucket_of(count: u64, year: i32) -> TemporalCount {
    let date = NaiveDate::from_ymd_opt(year, 1, 1)
        .unwrap_or_else(|| malformed("year", &year.to_string()));
    TemporalCount { date, count }
}

/// Year number from a raw `YYYY` key.
///
/// # Panics
///
/// Panics unless `raw` is exactly four ASCII digits.
pub fn year_of_key(raw: &str) -> i32 {
    if raw.len() != 4 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        malformed("year", raw);
    }
    raw.parse().unwrap_or_else(|_| malformed("year", raw))
}

/// First day of the month named by a raw `YYYYMM` key.
///
/// Only the first six characters are read.
///
/// # Panics
///
/// Panics if `raw` is shorter than six characters, is not numeric, or names
/// a month outside 01-12.
pub fn month_bucket_of(raw: &str) -> NaiveDate {
    assert!(
        raw.len() >= 6,
        "month bucket key {raw:?} is shorter than YYYYMM"
    );
    split_month_key(raw)
        .and_then(|(year, month)| NaiveDate::from_ymd_opt(year, month, 1))
        .unwrap_or_else(|| malformed("month", raw))
}

fn split_month_key(raw: &str) -> Option<(i32, u32)> {
    let digits = raw.get(0..6)?;
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some((digits[..4].parse().ok()?, digits[4..].parse().ok()?))
}

/// Calendar date of a raw `YYYY-MM-DD` key.
///
/// # Panics
///
/// Panics if `raw` is not an ISO-8601 calendar date.
pub fn day_bucket_of(raw: &str) -> NaiveDate {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").unwrap_or_else(|_| malformed("day", raw))
}

fn malformed(unit: &str, raw: &str) -> ! {
    panic!("malformed {unit} bucket key {raw:?}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, TimeZone, Utc};
    use proptest::prelude::*;
    use yorc_store::TemporalUnit;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_year_bucket_is_january_first() {
        let bucket = year_bucket_of(17, 2023);
        assert_eq!(bucket.date, ymd(2023, 1, 1));
        assert_eq!(bucket.count, 17);
    }

    #[test]
    fn test_month_bucket_is_first_of_month() {
        assert_eq!(month_bucket_of("202403"), ymd(2024, 3, 1));
        assert_eq!(month_bucket_of("199912"), ymd(1999, 12, 1));
    }

    #[test]
    fn test_month_bucket_ignores_trailing_characters() {
        assert_eq!(month_bucket_of("20240315"), ymd(2024, 3, 1));
    }

    #[test]
    #[should_panic(expected = "shorter than YYYYMM")]
    fn test_month_bucket_rejects_short_key() {
        month_bucket_of("2024");
    }

    #[test]
    #[should_panic(expected = "malformed month bucket key")]
    fn test_month_bucket_rejects_month_thirteen() {
        month_bucket_of("202413");
    }

    #[test]
    #[should_panic(expected = "malformed month bucket key")]
    fn test_month_bucket_rejects_non_digits() {
        month_bucket_of("2024-3");
    }

    #[test]
    fn test_day_bucket_parses_iso_date() {
        assert_eq!(day_bucket_of("2024-02-29"), ymd(2024, 2, 29));
    }

    #[test]
    #[should_panic(expected = "malformed day bucket key")]
    fn test_day_bucket_rejects_impossible_date() {
        day_bucket_of("2023-02-29");
    }

    #[test]
    fn test_year_of_key() {
        assert_eq!(year_of_key("2024"), 2024);
    }

    #[test]
    #[should_panic(expected = "malformed year bucket key")]
    fn test_year_of_key_rejects_garbage() {
        year_of_key("20x4");
    }

    proptest! {
        #[test]
        fn month_key_round_trips_to_month_start(secs in 0i64..4_102_444_800) {
            let at = Utc.timestamp_opt(secs, 0).unwrap();
            let start = month_bucket_of(&TemporalUnit::Month.key_of(at));
            prop_assert_eq!(start, ymd(at.year(), at.month(), 1));
        }

        #[test]
        fn day_key_round_trips_to_date(secs in 0i64..4_102_444_800) {
            let at = Utc.timestamp_opt(secs, 0).unwrap();
            prop_assert_eq!(day_bucket_of(&TemporalUnit::Day.key_of(at)), at.date_naive());
        }

        #[test]
        fn year_key_round_trips_to_year_start(secs in 0i64..4_102_444_800) {
            let at = Utc.timestamp_opt(secs, 0).unwrap();
            let bucket = year_bucket_of(1, year_of_key(&TemporalUnit::Year.key_of(at)));
            prop_assert_eq!(bucket.date, ymd(at.year(), 1, 1));
        }
    }
}
