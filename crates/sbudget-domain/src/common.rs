//! Shared traits and calendar-month utilities for budgeting primitives.

use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Supplies a common contract for retrieving numeric amounts.
pub trait Amounted {
    fn amount(&self) -> f64;
}

/// Converts an entity into a user-facing display label.
pub trait Displayable {
    fn display_label(&self) -> String;
}

/// Sums the amounts of every item yielded by `items`.
pub fn total_amount<'a, T, I>(items: I) -> f64
where
    T: Amounted + 'a,
    I: IntoIterator<Item = &'a T>,
{
    items.into_iter().map(Amounted::amount).sum()
}

/// A calendar month, the aggregation window used by budget and history views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Builds a month, returning `None` when `month` is outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        if (1..=12).contains(&month) {
            Some(Self { year, month })
        } else {
            None
        }
    }

    /// The month that contains `date`.
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

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    pub fn first_day(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Moves the month forward (positive) or backward (negative) by `months`.
    pub fn shift(&self, months: i32) -> Self {
        let index = self.year * 12 + self.month as i32 - 1 + months;
        Self {
            year: index.div_euclid(12),
            month: index.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn previous(&self) -> Self {
        self.shift(-1)
    }

    pub fn next(&self) -> Self {
        self.shift(1)
    }

    /// Returns the `count` most recent months ending with the month of `today`,
    /// newest first.
    pub fn recent(today: NaiveDate, count: usize) -> Vec<Month> {
        let current = Month::of(today);
        (0..count as i32).map(|offset| current.shift(-offset)).collect()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = MonthParseError;

    /// Parses `YYYY-MM`.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let (year, month) = value
            .trim()
            .split_once('-')
            .ok_or_else(|| MonthParseError(value.to_string()))?;
        let year: i32 = year.parse().map_err(|_| MonthParseError(value.to_string()))?;
        let month: u32 = month
            .parse()
            .map_err(|_| MonthParseError(value.to_string()))?;
        Month::new(year, month).ok_or_else(|| MonthParseError(value.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthParseError(pub String);

impl fmt::Display for MonthParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "`{}` is not a month, expected YYYY-MM", self.0)
    }
}

impl std::error::Error for MonthParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn shift_wraps_across_years() {
        let january = Month::new(2024, 1).unwrap();
        assert_eq!(january.previous(), Month::new(2023, 12).unwrap());
        assert_eq!(january.shift(13), Month::new(2025, 2).unwrap());
        assert_eq!(january.shift(-25), Month::new(2021, 12).unwrap());
    }

    #[test]
    fn contains_checks_year_and_month() {
        let month = Month::new(2024, 3).unwrap();
        assert!(month.contains(date(2024, 3, 31)));
        assert!(!month.contains(date(2023, 3, 15)));
        assert!(!month.contains(date(2024, 4, 1)));
    }

    #[test]
    fn recent_lists_newest_first() {
        let months = Month::recent(date(2024, 2, 10), 12);
        assert_eq!(months.len(), 12);
        assert_eq!(months[0], Month::new(2024, 2).unwrap());
        assert_eq!(months[1], Month::new(2024, 1).unwrap());
        assert_eq!(months[11], Month::new(2023, 3).unwrap());
    }

    #[test]
    fn parses_and_displays_year_month() {
        let month: Month = "2024-07".parse().unwrap();
        assert_eq!(month.to_string(), "2024-07");
        assert_eq!(month.first_day(), date(2024, 7, 1));
        assert!("2024-13".parse::<Month>().is_err());
        assert!("july".parse::<Month>().is_err());
    }
}
