//! Event windows: the time span an event source is asked about.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

use crate::constants::DEFAULT_UPCOMING_DAYS;

/// A start/end pair defining a calendar interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventWindow {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
}

impl EventWindow {
    pub fn new(from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        EventWindow { from, to }
    }

    /// The whole month containing `date`, from local midnight on the 1st to
    /// local midnight on the 1st of the following month, in `tz`.
    pub fn month_of(date: NaiveDate, tz: Tz) -> Self {
        let first = first_of_month(date);
        let next = first_of_next_month(date);

        EventWindow {
            from: local_midnight(first, tz),
            to: local_midnight(next, tz),
        }
    }

    /// One calendar day in `tz`, from its local midnight to the next.
    pub fn day_of(date: NaiveDate, tz: Tz) -> Self {
        let next = date.succ_opt().unwrap_or(date);
        EventWindow::new(local_midnight(date, tz), local_midnight(next, tz))
    }

    /// Whether `[start, end)` shares any instant with this window.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start < self.to && end > self.from
    }

    /// From `now` until `days` days later.
    pub fn upcoming(now: DateTime<Utc>, days: i64) -> Self {
        EventWindow {
            from: now,
            to: now + Duration::days(days),
        }
    }

    /// The default upcoming window (next week).
    pub fn next_week(now: DateTime<Utc>) -> Self {
        Self::upcoming(now, DEFAULT_UPCOMING_DAYS)
    }

    pub fn from_rfc3339(&self) -> String {
        self.from.to_rfc3339()
    }

    pub fn to_rfc3339(&self) -> String {
        self.to.to_rfc3339()
    }
}

pub fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

pub fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

pub fn first_of_previous_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 1 {
        (date.year() - 1, 12)
    } else {
        (date.year(), date.month() - 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(date)
}

/// Midnight at the start of `date` in `tz`. On the rare zones where midnight
/// doesn't exist (DST gap), falls back to treating it as UTC.
fn local_midnight(date: NaiveDate, tz: Tz) -> DateTime<Utc> {
    let naive = date.and_time(chrono::NaiveTime::MIN);
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::America::New_York;

    #[test]
    fn month_window_covers_local_month() {
        let window = EventWindow::month_of(NaiveDate::from_ymd_opt(2025, 3, 17).unwrap(), New_York);

        // EST (UTC-5) on March 1st, EDT (UTC-4) on April 1st
        assert_eq!(window.from, Utc.with_ymd_and_hms(2025, 3, 1, 5, 0, 0).unwrap());
        assert_eq!(window.to, Utc.with_ymd_and_hms(2025, 4, 1, 4, 0, 0).unwrap());
    }

    #[test]
    fn month_navigation_wraps_years() {
        let dec = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        assert_eq!(first_of_next_month(dec), NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());

        let jan = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        assert_eq!(
            first_of_previous_month(jan),
            NaiveDate::from_ymd_opt(2024, 12, 1).unwrap()
        );
    }

    #[test]
    fn day_window_follows_dst_change() {
        // Clocks spring forward on 2025-03-09 in New York, so the day is 23 hours
        let window = EventWindow::day_of(NaiveDate::from_ymd_opt(2025, 3, 9).unwrap(), New_York);

        assert_eq!(window.from, Utc.with_ymd_and_hms(2025, 3, 9, 5, 0, 0).unwrap());
        assert_eq!(window.to - window.from, Duration::hours(23));
    }

    #[test]
    fn overlap_is_closed_open() {
        let window = EventWindow::new(
            Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 21, 0, 0, 0).unwrap(),
        );

        let ends_at_midnight = window.overlaps(
            Utc.with_ymd_and_hms(2025, 3, 19, 22, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 20, 0, 0, 0).unwrap(),
        );
        let runs_past_midnight = window.overlaps(
            Utc.with_ymd_and_hms(2025, 3, 19, 23, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 3, 20, 2, 0, 0).unwrap(),
        );

        assert!(!ends_at_midnight);
        assert!(runs_past_midnight);
    }

    #[test]
    fn next_week_spans_seven_days() {
        let now = Utc.with_ymd_and_hms(2025, 3, 20, 12, 0, 0).unwrap();
        let window = EventWindow::next_week(now);
        assert_eq!(window.to - window.from, Duration::days(7));
    }
}
