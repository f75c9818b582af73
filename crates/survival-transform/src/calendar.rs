//! Calendar month arithmetic for person-time splitting.
//!
//! A follow-up interval `[start, end]` touches every calendar month from the
//! first day of `start`'s month through the last day of `end`'s month. Each
//! touched month receives the number of days the subject was observed in it:
//!
//! | Month position        | Exposure days                  |
//! |-----------------------|--------------------------------|
//! | inside the interval   | days in month                  |
//! | start month only      | days in month − start day + 1  |
//! | end month only        | end day                        |
//! | start and end month   | end day − start day + 1        |
//! | begins after `end`    | 0                              |

use chrono::{Datelike, NaiveDate};

use survival_model::MonthLabel;

/// Returns true if the given year is a leap year.
pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

/// Number of days in the given month.
pub fn days_in_month(month: MonthLabel) -> u32 {
    match month.month() {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        _ => {
            if is_leap_year(month.year()) {
                29
            } else {
                28
            }
        }
    }
}

/// First calendar day of the month.
pub fn first_day(month: MonthLabel) -> NaiveDate {
    NaiveDate::from_ymd_opt(month.year(), month.month(), 1).unwrap_or(NaiveDate::MIN)
}

/// Last calendar day of the month.
pub fn last_day(month: MonthLabel) -> NaiveDate {
    NaiveDate::from_ymd_opt(month.year(), month.month(), days_in_month(month))
        .unwrap_or(NaiveDate::MAX)
}

/// The month following `month`.
pub fn next_month(month: MonthLabel) -> Option<MonthLabel> {
    if month.month() == 12 {
        MonthLabel::new(month.year().checked_add(1)?, 1)
    } else {
        MonthLabel::new(month.year(), month.month() + 1)
    }
}

/// Iterator over consecutive calendar months, both ends inclusive.
#[derive(Debug, Clone)]
pub struct MonthSpan {
    next: Option<MonthLabel>,
    last: MonthLabel,
}

impl Iterator for MonthSpan {
    type Item = MonthLabel;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next.filter(|month| *month <= self.last)?;
        self.next = next_month(current);
        Some(current)
    }
}

/// Months touched by `[start, end]` in chronological order.
///
/// Empty when `end` falls in a month before `start`'s month.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use survival_transform::calendar::month_span;
///
/// let start = NaiveDate::from_ymd_opt(2020, 12, 20).unwrap();
/// let end = NaiveDate::from_ymd_opt(2021, 2, 3).unwrap();
/// let labels: Vec<String> = month_span(start, end).map(|m| m.to_string()).collect();
/// assert_eq!(labels, vec!["Dec-20", "Jan-21", "Feb-21"]);
/// ```
pub fn month_span(start: NaiveDate, end: NaiveDate) -> MonthSpan {
    MonthSpan {
        next: Some(MonthLabel::of(start)),
        last: MonthLabel::of(end),
    }
}

/// Days of `month` during which a subject followed over `[start, end]` was
/// observed.
pub fn exposure_days(month: MonthLabel, start: NaiveDate, end: NaiveDate) -> u32 {
    if first_day(month) > end {
        return 0;
    }
    let is_start = month == MonthLabel::of(start);
    let is_end = month == MonthLabel::of(end);
    match (is_start, is_end) {
        (true, true) => (end.day() + 1).saturating_sub(start.day()),
        (true, false) => days_in_month(month) - start.day() + 1,
        (false, true) => end.day(),
        (false, false) => days_in_month(month),
    }
}

/// Inclusive length of `[start, end]` in days; the sum every subject's
/// monthly exposure must match.
pub fn inclusive_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn month(y: i32, m: u32) -> MonthLabel {
        MonthLabel::new(y, m).unwrap()
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(month(2021, 1)), 31);
        assert_eq!(days_in_month(month(2021, 4)), 30);
        assert_eq!(days_in_month(month(2021, 2)), 28);
        assert_eq!(days_in_month(month(2020, 2)), 29);
        assert_eq!(days_in_month(month(1900, 2)), 28);
        assert_eq!(days_in_month(month(2000, 2)), 29);
    }

    #[test]
    fn test_month_bounds() {
        assert_eq!(first_day(month(2021, 2)), ymd(2021, 2, 1));
        assert_eq!(last_day(month(2021, 2)), ymd(2021, 2, 28));
        assert_eq!(last_day(month(2024, 2)), ymd(2024, 2, 29));
    }

    #[test]
    fn test_next_month_rolls_year() {
        assert_eq!(next_month(month(2020, 12)), Some(month(2021, 1)));
        assert_eq!(next_month(month(2021, 6)), Some(month(2021, 7)));
    }

    #[test]
    fn test_month_span_single_month() {
        let months: Vec<MonthLabel> = month_span(ymd(2021, 1, 15), ymd(2021, 1, 20)).collect();
        assert_eq!(months, vec![month(2021, 1)]);
    }

    #[test]
    fn test_month_span_inverted_is_empty() {
        assert_eq!(month_span(ymd(2021, 3, 1), ymd(2021, 1, 31)).count(), 0);
    }

    #[test]
    fn test_exposure_days_branches() {
        let start = ymd(2021, 1, 15);
        let end = ymd(2021, 3, 10);
        assert_eq!(exposure_days(month(2021, 1), start, end), 17);
        assert_eq!(exposure_days(month(2021, 2), start, end), 28);
        assert_eq!(exposure_days(month(2021, 3), start, end), 10);
        assert_eq!(exposure_days(month(2021, 4), start, end), 0);
    }

    #[test]
    fn test_exposure_days_same_month() {
        let day = ymd(2021, 1, 15);
        assert_eq!(exposure_days(month(2021, 1), day, ymd(2021, 1, 20)), 6);
        assert_eq!(exposure_days(month(2021, 1), day, day), 1);
    }

    #[test]
    fn test_inclusive_days() {
        assert_eq!(inclusive_days(ymd(2021, 1, 15), ymd(2021, 3, 10)), 55);
        assert_eq!(inclusive_days(ymd(2021, 1, 15), ymd(2021, 1, 15)), 1);
    }
}
