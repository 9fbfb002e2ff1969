//! Date-range and predefined-period value objects.
//!
//! Records carry UTC instants; day bucketing and period expansion are
//! anchored to *local* day boundaries. Every function that needs a calendar
//! takes the timezone explicitly so production code can pass `Local` while
//! tests pin a fixed offset.

use chrono::{
    DateTime, Datelike, Days, LocalResult, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Utc,
};
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, DomainResult};

/// Inclusive `[start, end]` pair of instants.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl DateRange {
    /// Create a range. Invariant: `start <= end`.
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> DomainResult<Self> {
        if start > end {
            return Err(DomainError::validation(format!(
                "date range start {start} is after end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// Range covering a single calendar day in `tz`.
    pub fn single_day<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> Self {
        Self {
            start: day_start_utc(day, tz),
            end: day_end_utc(day, tz),
        }
    }

    /// Range from the start of `first` to the end of `last` in `tz`.
    ///
    /// The days are reordered if given backwards, so this cannot produce an
    /// inverted range.
    pub fn over_days<Tz: TimeZone>(first: NaiveDate, last: NaiveDate, tz: &Tz) -> Self {
        let (first, last) = if first <= last { (first, last) } else { (last, first) };
        Self {
            start: day_start_utc(first, tz),
            end: day_end_utc(last, tz),
        }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    /// Inclusive containment on both ends.
    pub fn contains(&self, instant: DateTime<Utc>) -> bool {
        self.start <= instant && instant <= self.end
    }

    /// The calendar days this range covers in `tz`, in order.
    pub fn days<Tz: TimeZone>(&self, tz: &Tz) -> Vec<NaiveDate> {
        let first = self.start.with_timezone(tz).date_naive();
        let last = self.end.with_timezone(tz).date_naive();

        let mut days = Vec::new();
        let mut day = first;
        while day <= last {
            days.push(day);
            match day.succ_opt() {
                Some(next) => day = next,
                None => break,
            }
        }
        days
    }
}

/// Named shorthand for a date range relative to the current instant.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PredefinedPeriod {
    Today,
    Yesterday,
    LastSevenDays,
    LastThirtyDays,
    CurrentMonth,
}

impl PredefinedPeriod {
    pub const ALL: [PredefinedPeriod; 5] = [
        PredefinedPeriod::Today,
        PredefinedPeriod::Yesterday,
        PredefinedPeriod::LastSevenDays,
        PredefinedPeriod::LastThirtyDays,
        PredefinedPeriod::CurrentMonth,
    ];

    /// Display label for the period selector.
    pub fn label(&self) -> &'static str {
        match self {
            PredefinedPeriod::Today => "today",
            PredefinedPeriod::Yesterday => "yesterday",
            PredefinedPeriod::LastSevenDays => "last 7 days",
            PredefinedPeriod::LastThirtyDays => "last 30 days",
            PredefinedPeriod::CurrentMonth => "current month",
        }
    }

    /// Expand to a concrete range anchored to local-day boundaries of `now`.
    ///
    /// `CurrentMonth` runs from the first day of the month through the end of
    /// the current day: the backing store is day-bucketed, and the month's
    /// future days hold no records.
    pub fn resolve<Tz: TimeZone>(&self, now: &DateTime<Tz>) -> DateRange {
        let tz = now.timezone();
        let today = now.date_naive();

        let (first, last) = match self {
            PredefinedPeriod::Today => (today, today),
            PredefinedPeriod::Yesterday => {
                let y = today.checked_sub_days(Days::new(1)).unwrap_or(today);
                (y, y)
            }
            PredefinedPeriod::LastSevenDays => {
                (today.checked_sub_days(Days::new(6)).unwrap_or(today), today)
            }
            PredefinedPeriod::LastThirtyDays => {
                (today.checked_sub_days(Days::new(29)).unwrap_or(today), today)
            }
            PredefinedPeriod::CurrentMonth => (today.with_day0(0).unwrap_or(today), today),
        };

        DateRange::over_days(first, last, &tz)
    }
}

fn day_start_utc<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    local_instant_utc(day.and_time(NaiveTime::MIN), tz)
}

fn day_end_utc<Tz: TimeZone>(day: NaiveDate, tz: &Tz) -> DateTime<Utc> {
    let last_milli =
        NaiveTime::from_hms_milli_opt(23, 59, 59, 999).expect("valid wall-clock time");
    local_instant_utc(day.and_time(last_milli), tz)
}

fn local_instant_utc<Tz: TimeZone>(naive: NaiveDateTime, tz: &Tz) -> DateTime<Utc> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(instant) => instant.with_timezone(&Utc),
        // DST fold: the wall-clock time occurs twice; take the first.
        LocalResult::Ambiguous(earliest, _) => earliest.with_timezone(&Utc),
        // DST gap: the wall-clock time does not exist in this zone.
        LocalResult::None => Utc.from_utc_datetime(&naive),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(2 * 3600).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        tz().with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    #[test]
    fn new_rejects_inverted_range() {
        let start = at(2024, 5, 17, 12, 0).with_timezone(&Utc);
        let end = at(2024, 5, 16, 12, 0).with_timezone(&Utc);
        let err = DateRange::new(start, end).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn contains_is_inclusive_on_both_ends() {
        let range = DateRange::single_day(NaiveDate::from_ymd_opt(2024, 5, 17).unwrap(), &tz());
        assert!(range.contains(range.start()));
        assert!(range.contains(range.end()));
        assert!(!range.contains(range.start() - chrono::Duration::milliseconds(1)));
        assert!(!range.contains(range.end() + chrono::Duration::milliseconds(1)));
    }

    #[test]
    fn days_enumerates_covered_calendar_days() {
        let first = NaiveDate::from_ymd_opt(2024, 5, 16).unwrap();
        let last = NaiveDate::from_ymd_opt(2024, 5, 18).unwrap();
        let range = DateRange::over_days(first, last, &tz());

        let days = range.days(&tz());
        assert_eq!(days.len(), 3);
        assert_eq!(days[0], first);
        assert_eq!(days[2], last);
    }

    #[test]
    fn over_days_reorders_backwards_input() {
        let first = NaiveDate::from_ymd_opt(2024, 5, 18).unwrap();
        let last = NaiveDate::from_ymd_opt(2024, 5, 16).unwrap();
        let range = DateRange::over_days(first, last, &tz());
        assert!(range.start() <= range.end());
        assert_eq!(range.days(&tz()).len(), 3);
    }

    #[test]
    fn today_resolves_to_local_day_boundaries() {
        let now = at(2024, 5, 17, 15, 30);
        let range = PredefinedPeriod::Today.resolve(&now);

        let local_start = range.start().with_timezone(&tz());
        let local_end = range.end().with_timezone(&tz());
        assert_eq!(local_start.date_naive(), now.date_naive());
        assert_eq!((local_start.hour(), local_start.minute()), (0, 0));
        assert_eq!(local_end.date_naive(), now.date_naive());
        assert_eq!(
            (local_end.hour(), local_end.minute(), local_end.second()),
            (23, 59, 59)
        );
    }

    #[test]
    fn yesterday_is_a_single_previous_day() {
        let now = at(2024, 5, 17, 9, 0);
        let range = PredefinedPeriod::Yesterday.resolve(&now);
        let days = range.days(&tz());
        assert_eq!(days, vec![NaiveDate::from_ymd_opt(2024, 5, 16).unwrap()]);
    }

    #[test]
    fn last_seven_days_covers_seven_distinct_days_ending_today() {
        let now = at(2024, 5, 17, 9, 0);
        let range = PredefinedPeriod::LastSevenDays.resolve(&now);
        let days = range.days(&tz());
        assert_eq!(days.len(), 7);
        assert_eq!(*days.last().unwrap(), now.date_naive());
    }

    #[test]
    fn current_month_starts_on_the_first_and_ends_today() {
        let now = at(2024, 5, 17, 9, 0);
        let range = PredefinedPeriod::CurrentMonth.resolve(&now);
        let days = range.days(&tz());
        assert_eq!(days[0], NaiveDate::from_ymd_opt(2024, 5, 1).unwrap());
        assert_eq!(*days.last().unwrap(), now.date_naive());
        assert_eq!(days.len(), 17);
    }

    #[test]
    fn period_labels_are_distinct() {
        let mut labels: Vec<_> = PredefinedPeriod::ALL.iter().map(|p| p.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), PredefinedPeriod::ALL.len());
    }
}
