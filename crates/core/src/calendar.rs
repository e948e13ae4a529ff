//! Calendar eligibility for rotation scheduling.
//!
//! Every Sunday is a blackout day. A Saturday is a blackout day when its day-of-month falls in
//! `15..=21`. Since the first Saturday of any month lands on day 1 to 7, this is always the
//! month's third Saturday.

use crate::constants::DATE_FORMAT;
use crate::error::{SchedulingError, SchedulingResult};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::Serialize;

/// An inclusive, validated range of calendar dates (`start <= end`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateWindow {
    /// # Errors
    ///
    /// Returns [`SchedulingError::EndBeforeStart`] if `end` precedes `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> SchedulingResult<Self> {
        if end < start {
            return Err(SchedulingError::EndBeforeStart { start, end });
        }
        Ok(Self { start, end })
    }

    /// Parses both bounds from `YYYY-MM-DD` text.
    ///
    /// # Errors
    ///
    /// Returns [`SchedulingError`] if:
    /// - either bound is blank ([`SchedulingError::InvalidInput`]),
    /// - either bound is not a calendar date ([`SchedulingError::InvalidDate`]),
    /// - the end precedes the start ([`SchedulingError::EndBeforeStart`]).
    pub fn parse(start: &str, end: &str) -> SchedulingResult<Self> {
        let start = parse_date("start_date", start)?;
        let end = parse_date("end_date", end)?;
        Self::new(start, end)
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of dates in the window, both bounds included.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    /// Every date in the window, ascending.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> {
        let end = self.end;
        std::iter::successors(Some(self.start), |d| d.succ_opt()).take_while(move |d| *d <= end)
    }
}

/// Parses a required `YYYY-MM-DD` value named `field`.
///
/// # Errors
///
/// Returns [`SchedulingError::InvalidInput`] when blank, [`SchedulingError::InvalidDate`] when
/// the text is not a calendar date.
pub fn parse_date(field: &'static str, value: &str) -> SchedulingResult<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(SchedulingError::InvalidInput(format!("{field} is required")));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| SchedulingError::InvalidDate {
        field,
        value: trimmed.to_string(),
    })
}

/// True for days that never receive rotation slots.
pub fn is_blackout_day(date: NaiveDate) -> bool {
    match date.weekday() {
        Weekday::Sun => true,
        Weekday::Sat => (15..=21).contains(&date.day()),
        _ => false,
    }
}

/// The eligible days of `window`, in chronological order.
pub fn candidate_days(window: &DateWindow) -> Vec<NaiveDate> {
    window.days().filter(|d| !is_blackout_day(*d)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn every_sunday_is_a_blackout_day() {
        let window = DateWindow::new(date(2024, 1, 1), date(2025, 12, 31)).unwrap();
        for day in window.days().filter(|d| d.weekday() == Weekday::Sun) {
            assert!(is_blackout_day(day), "{day} should be excluded");
        }
    }

    #[test]
    fn saturdays_are_excluded_only_on_days_15_to_21() {
        let window = DateWindow::new(date(2024, 1, 1), date(2025, 12, 31)).unwrap();
        for day in window.days().filter(|d| d.weekday() == Weekday::Sat) {
            let expected = (15..=21).contains(&day.day());
            assert_eq!(is_blackout_day(day), expected, "{day}");
        }
    }

    #[test]
    fn weekdays_are_never_excluded() {
        let window = DateWindow::new(date(2025, 3, 1), date(2025, 3, 31)).unwrap();
        for day in window.days() {
            if !matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                assert!(!is_blackout_day(day), "{day}");
            }
        }
    }

    #[test]
    fn excluded_saturday_is_the_third_by_count() {
        let window = DateWindow::new(date(2020, 1, 1), date(2030, 12, 31)).unwrap();
        for day in window.days().filter(|d| d.weekday() == Weekday::Sat) {
            let ordinal = (day.day() - 1) / 7 + 1;
            assert_eq!(is_blackout_day(day), ordinal == 3, "{day}");
        }
        // March 2025: Saturdays fall on 1, 8, 15, 22, 29.
        assert!(is_blackout_day(date(2025, 3, 15)));
        assert!(!is_blackout_day(date(2025, 3, 22)));
    }

    #[test]
    fn candidate_days_are_ascending_and_skip_blackouts() {
        // 2025-03-10 (Mon) .. 2025-03-23 (Sun)
        let window = DateWindow::new(date(2025, 3, 10), date(2025, 3, 23)).unwrap();
        let days = candidate_days(&window);

        assert!(days.windows(2).all(|w| w[0] < w[1]));
        assert!(!days.contains(&date(2025, 3, 15)));
        assert!(!days.contains(&date(2025, 3, 16)));
        assert!(!days.contains(&date(2025, 3, 23)));
        assert!(days.contains(&date(2025, 3, 22)));
        assert_eq!(days.len(), 11);
    }

    #[test]
    fn single_day_window_is_inclusive() {
        let window = DateWindow::parse("2025-03-12", "2025-03-12").unwrap();
        assert_eq!(candidate_days(&window), vec![date(2025, 3, 12)]);
    }

    #[test]
    fn mid_month_saturday_window_has_no_candidates() {
        let window = DateWindow::parse("2025-03-15", "2025-03-15").unwrap();
        assert!(candidate_days(&window).is_empty());
    }

    #[test]
    fn window_spans_month_and_year_boundaries() {
        let window = DateWindow::parse("2024-12-30", "2025-01-02").unwrap();
        assert_eq!(window.days().count(), 4);
        assert_eq!(window.len_days(), 4);
        assert_eq!(candidate_days(&window).len(), 4);
    }

    #[test]
    fn parse_rejects_end_before_start() {
        let err = DateWindow::parse("2025-03-07", "2025-03-03").unwrap_err();
        assert!(matches!(err, SchedulingError::EndBeforeStart { .. }));
    }

    #[test]
    fn parse_names_the_bad_field() {
        match DateWindow::parse("2025-03-01", "2025-02-30").unwrap_err() {
            SchedulingError::InvalidDate { field, value } => {
                assert_eq!(field, "end_date");
                assert_eq!(value, "2025-02-30");
            }
            other => panic!("expected InvalidDate, got {other:?}"),
        }
        match DateWindow::parse("03/01/2025", "2025-03-02").unwrap_err() {
            SchedulingError::InvalidDate { field, .. } => assert_eq!(field, "start_date"),
            other => panic!("expected InvalidDate, got {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_missing_dates() {
        assert!(matches!(
            DateWindow::parse("", "2025-03-02"),
            Err(SchedulingError::InvalidInput(_))
        ));
    }
}
