//! Date helpers shared by the spreadsheet reader and the clinical generators.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use rand::Rng;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%d-%m-%Y %H:%M:%S",
    "%d/%m/%Y %H:%M:%S",
    "%d-%m-%Y %H:%M",
    "%d/%m/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d"];

/// Parse the timestamp shapes found in spreadsheet exports and store rows.
pub fn parse_datetime_loose(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_local());
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d.and_time(NaiveTime::MIN));
        }
    }
    None
}

pub fn parse_date_loose(raw: &str) -> Option<NaiveDate> {
    parse_datetime_loose(raw).map(|dt| dt.date())
}

/// First and last day of the month containing `day`.
pub fn month_bounds(day: NaiveDate) -> (NaiveDate, NaiveDate) {
    let start = day.with_day(1).unwrap_or(day);
    let next_month = if day.month() == 12 {
        NaiveDate::from_ymd_opt(day.year() + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(day.year(), day.month() + 1, 1)
    };
    let end = next_month
        .and_then(|d| d.pred_opt())
        .unwrap_or(start);
    (start, end)
}

/// Uniformly random day in the month containing `base`.
pub fn random_date_in_month<R: Rng + ?Sized>(rng: &mut R, base: NaiveDate) -> NaiveDate {
    let (start, end) = month_bounds(base);
    let span = (end - start).num_days();
    start + Duration::days(rng.gen_range(0..=span))
}

/// Random day from `start` to the end of `base`'s month, inclusive.
pub fn random_end_in_month<R: Rng + ?Sized>(
    rng: &mut R,
    start: NaiveDate,
    base: NaiveDate,
) -> NaiveDate {
    let (_, end) = month_bounds(base);
    let span = (end - start).num_days().max(0);
    start + Duration::days(rng.gen_range(0..=span))
}

/// `YYYYMMDD`, the scope key of date-sequenced identifiers.
pub fn compact(day: NaiveDate) -> String {
    day.format("%Y%m%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn parses_spreadsheet_shapes() {
        assert_eq!(parse_date_loose("2025-05-10"), Some(d(2025, 5, 10)));
        assert_eq!(parse_date_loose("2025-05-10 14:22:01"), Some(d(2025, 5, 10)));
        assert_eq!(parse_date_loose("2025-05-10T14:22:01"), Some(d(2025, 5, 10)));
        assert_eq!(parse_date_loose("2025-05-10T14:22:01+05:30"), Some(d(2025, 5, 10)));
        assert_eq!(parse_date_loose("10/05/2025"), Some(d(2025, 5, 10)));
        assert_eq!(parse_date_loose("10-05-2025 09:00"), Some(d(2025, 5, 10)));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_datetime_loose(""), None);
        assert_eq!(parse_datetime_loose("yesterday"), None);
    }

    #[test]
    fn month_bounds_handle_december_and_leap_years() {
        assert_eq!(month_bounds(d(2024, 12, 15)), (d(2024, 12, 1), d(2024, 12, 31)));
        assert_eq!(month_bounds(d(2024, 2, 3)), (d(2024, 2, 1), d(2024, 2, 29)));
        assert_eq!(month_bounds(d(2025, 2, 28)), (d(2025, 2, 1), d(2025, 2, 28)));
    }

    #[test]
    fn random_dates_stay_in_month() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let day = random_date_in_month(&mut rng, d(2025, 4, 18));
            assert_eq!((day.year(), day.month()), (2025, 4));
        }
    }

    #[test]
    fn end_dates_never_precede_start() {
        let mut rng = StdRng::seed_from_u64(11);
        let base = d(2025, 1, 10);
        for _ in 0..200 {
            let start = random_date_in_month(&mut rng, base);
            let end = random_end_in_month(&mut rng, start, base);
            assert!(end >= start);
            assert_eq!(end.month(), 1);
        }
    }

    #[test]
    fn compact_formats_scope_key() {
        assert_eq!(compact(d(2025, 1, 10)), "20250110");
    }
}
