//! Calendar month labels for monthly exposure records.

use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// A calendar month stamped with its year.
///
/// Ordering is chronological (year, then month). Displays as the month
/// abbreviation followed by a two-digit year, e.g. `Jan-21`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthLabel {
    year: i32,
    month: u32,
}

impl MonthLabel {
    /// Builds a label, returning `None` when `month` is outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month containing `date`.
    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Three-letter English month abbreviation.
    pub fn abbreviation(&self) -> &'static str {
        MONTH_ABBREVIATIONS[(self.month - 1) as usize]
    }
}

impl fmt::Display for MonthLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}-{:02}",
            self.abbreviation(),
            self.year.rem_euclid(100)
        )
    }
}

impl FromStr for MonthLabel {
    type Err = String;

    /// Parses the `Mon-YY` form. Two-digit years are read as 20YY.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let (name, year) = trimmed
            .split_once('-')
            .ok_or_else(|| format!("Unknown month label: {s}"))?;
        let month = MONTH_ABBREVIATIONS
            .iter()
            .position(|abbr| abbr.eq_ignore_ascii_case(name))
            .ok_or_else(|| format!("Unknown month label: {s}"))?;
        if year.len() != 2 || !year.bytes().all(|b| b.is_ascii_digit()) {
            return Err(format!("Unknown month label: {s}"));
        }
        let year: i32 = year
            .parse()
            .map_err(|_| format!("Unknown month label: {s}"))?;
        Ok(Self {
            year: 2000 + year,
            month: month as u32 + 1,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_abbreviation_and_two_digit_year() {
        let label = MonthLabel::of(NaiveDate::from_ymd_opt(2021, 1, 15).unwrap());
        assert_eq!(label.to_string(), "Jan-21");
        assert_eq!(MonthLabel::new(2009, 12).unwrap().to_string(), "Dec-09");
    }

    #[test]
    fn orders_chronologically_across_years() {
        let dec = MonthLabel::new(2020, 12).unwrap();
        let jan = MonthLabel::new(2021, 1).unwrap();
        let feb = MonthLabel::new(2021, 2).unwrap();
        assert!(dec < jan);
        assert!(jan < feb);
    }

    #[test]
    fn parses_display_form() {
        let label: MonthLabel = "Mar-21".parse().unwrap();
        assert_eq!(label, MonthLabel::new(2021, 3).unwrap());
        assert!("March-21".parse::<MonthLabel>().is_err());
        assert!("Mar-2021".parse::<MonthLabel>().is_err());
    }

    #[test]
    fn rejects_signed_two_character_year() {
        assert!("Jan--1".parse::<MonthLabel>().is_err());
        assert!("Jan-+1".parse::<MonthLabel>().is_err());
        assert_eq!(
            "Jan-01".parse::<MonthLabel>(),
            Ok(MonthLabel::new(2001, 1).unwrap())
        );
    }

    #[test]
    fn rejects_out_of_range_month() {
        assert!(MonthLabel::new(2021, 0).is_none());
        assert!(MonthLabel::new(2021, 13).is_none());
    }
}
