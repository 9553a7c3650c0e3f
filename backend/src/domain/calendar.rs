//! Business-time calendar used for streak days and leaderboard windows.
//!
//! Sales teams work in a single local timezone expressed as a fixed UTC
//! offset, so "today" and "this week" are stable regardless of where the
//! server runs.

use std::fmt;
use std::str::FromStr;

use chrono::{
    DateTime, Datelike, Days, FixedOffset, Months, NaiveDate, NaiveTime, Offset, TimeZone,
    Timelike, Utc, Weekday,
};
use serde::{Deserialize, Serialize};

/// Leaderboard and goal time windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    Today,
    Week,
    Month,
    AllTime,
}

impl TimeRange {
    /// Stable wire/storage representation.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
            Self::AllTime => "all_time",
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a time range string is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("time range must be one of today, week, month, all_time (got {0})")]
pub struct ParseTimeRangeError(String);

impl FromStr for TimeRange {
    type Err = ParseTimeRangeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "today" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            "all_time" | "all-time" | "alltime" => Ok(Self::AllTime),
            other => Err(ParseTimeRangeError(other.to_owned())),
        }
    }
}

/// Half-open UTC interval `[start, end)`; `start = None` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: Option<DateTime<Utc>>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Whether the instant falls inside the window.
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        self.start.is_none_or(|start| at >= start) && at < self.end
    }
}

/// Calendar anchored to the business timezone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BusinessCalendar {
    offset: FixedOffset,
}

impl Default for BusinessCalendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl BusinessCalendar {
    /// Calendar on UTC.
    pub fn utc() -> Self {
        Self { offset: Utc.fix() }
    }

    /// Calendar offset from UTC by whole minutes. Out-of-range offsets are
    /// rejected with `None`.
    pub fn with_offset_minutes(minutes: i32) -> Option<Self> {
        let seconds = minutes.checked_mul(60)?;
        FixedOffset::east_opt(seconds).map(|offset| Self { offset })
    }

    /// Calendar day of an instant.
    pub fn day_of(&self, at: DateTime<Utc>) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    /// Local hour (0..=23) of an instant.
    pub fn hour_of(&self, at: DateTime<Utc>) -> u32 {
        at.with_timezone(&self.offset).hour()
    }

    /// Local weekday of an instant.
    pub fn weekday_of(&self, at: DateTime<Utc>) -> Weekday {
        at.with_timezone(&self.offset).weekday()
    }

    fn start_of_day(&self, day: NaiveDate) -> DateTime<Utc> {
        let local = day.and_time(NaiveTime::MIN);
        match self.offset.from_local_datetime(&local).single() {
            Some(at) => at.with_timezone(&Utc),
            None => local.and_utc(),
        }
    }

    /// First day of the period containing `day`.
    pub fn period_start(&self, range: TimeRange, day: NaiveDate) -> NaiveDate {
        match range {
            TimeRange::Today | TimeRange::AllTime => day,
            TimeRange::Week => {
                let back = u64::from(day.weekday().num_days_from_monday());
                day.checked_sub_days(Days::new(back)).unwrap_or(day)
            }
            TimeRange::Month => day.with_day(1).unwrap_or(day),
        }
    }

    /// First day of the period preceding the one containing `day`.
    ///
    /// All-time rankings are snapshotted daily, so their previous period is
    /// yesterday.
    pub fn previous_period_start(&self, range: TimeRange, day: NaiveDate) -> NaiveDate {
        let start = self.period_start(range, day);
        let previous = match range {
            TimeRange::Today | TimeRange::AllTime => start.checked_sub_days(Days::new(1)),
            TimeRange::Week => start.checked_sub_days(Days::new(7)),
            TimeRange::Month => start.checked_sub_months(Months::new(1)),
        };
        previous.unwrap_or(start)
    }

    /// UTC window covering the period of `range` that contains `now`.
    pub fn window(&self, range: TimeRange, now: DateTime<Utc>) -> TimeWindow {
        let today = self.day_of(now);
        let start = self.period_start(range, today);
        let end_day = match range {
            TimeRange::Today | TimeRange::AllTime => start.checked_add_days(Days::new(1)),
            TimeRange::Week => start.checked_add_days(Days::new(7)),
            TimeRange::Month => start.checked_add_months(Months::new(1)),
        }
        .unwrap_or(today);

        TimeWindow {
            start: match range {
                TimeRange::AllTime => None,
                _ => Some(self.start_of_day(start)),
            },
            end: self.start_of_day(end_day),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::{fixture, rstest};

    #[fixture]
    fn calendar() -> BusinessCalendar {
        BusinessCalendar::with_offset_minutes(-5 * 60).expect("valid offset")
    }

    fn at(raw: &str) -> DateTime<Utc> {
        raw.parse().expect("valid timestamp")
    }

    fn day(raw: &str) -> NaiveDate {
        raw.parse().expect("valid date")
    }

    #[rstest]
    fn late_evening_utc_belongs_to_local_day(calendar: BusinessCalendar) {
        assert_eq!(calendar.day_of(at("2026-03-04T02:30:00Z")), day("2026-03-03"));
        assert_eq!(calendar.hour_of(at("2026-03-04T02:30:00Z")), 21);
    }

    #[rstest]
    fn week_window_starts_on_monday(calendar: BusinessCalendar) {
        // Thursday 2026-03-05 local time.
        let window = calendar.window(TimeRange::Week, at("2026-03-05T15:00:00Z"));
        assert_eq!(window.start, Some(at("2026-03-02T05:00:00Z")));
        assert_eq!(window.end, at("2026-03-09T05:00:00Z"));
    }

    #[rstest]
    fn month_window_spans_calendar_month(calendar: BusinessCalendar) {
        let window = calendar.window(TimeRange::Month, at("2026-02-14T12:00:00Z"));
        assert_eq!(window.start, Some(at("2026-02-01T05:00:00Z")));
        assert_eq!(window.end, at("2026-03-01T05:00:00Z"));
    }

    #[rstest]
    fn all_time_window_is_unbounded(calendar: BusinessCalendar) {
        let now = at("2026-02-14T12:00:00Z");
        let window = calendar.window(TimeRange::AllTime, now);
        assert!(window.start.is_none());
        assert!(window.contains(at("2001-01-01T00:00:00Z")));
        assert!(window.contains(now));
    }

    #[rstest]
    #[case(TimeRange::Today, "2026-03-05", "2026-03-04")]
    #[case(TimeRange::Week, "2026-03-05", "2026-02-23")]
    #[case(TimeRange::Month, "2026-03-05", "2026-02-01")]
    #[case(TimeRange::AllTime, "2026-03-05", "2026-03-04")]
    fn previous_period_start(
        calendar: BusinessCalendar,
        #[case] range: TimeRange,
        #[case] today: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(calendar.previous_period_start(range, day(today)), day(expected));
    }

    #[rstest]
    #[case("today", TimeRange::Today)]
    #[case("all_time", TimeRange::AllTime)]
    #[case("all-time", TimeRange::AllTime)]
    fn parses_ranges(#[case] raw: &str, #[case] expected: TimeRange) {
        assert_eq!(raw.parse::<TimeRange>(), Ok(expected));
    }

    #[rstest]
    fn rejects_out_of_range_offset() {
        assert!(BusinessCalendar::with_offset_minutes(25 * 60).is_none());
    }
}
