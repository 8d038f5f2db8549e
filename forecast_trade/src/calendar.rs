//! Business-day calendar shared by the input series and the forecast axis

use crate::error::{ForecastError, Result};
use chrono::{Datelike, NaiveDate, Weekday};
use std::collections::BTreeSet;

/// Weekday calendar with an optional set of market holidays
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusinessCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl BusinessCalendar {
    /// Calendar that only skips weekends
    pub fn weekdays() -> Self {
        Self::default()
    }

    /// Calendar that skips weekends and the given holidays
    pub fn with_holidays<I: IntoIterator<Item = NaiveDate>>(holidays: I) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }

    /// Whether observations are expected on `date`
    pub fn is_business_day(&self, date: NaiveDate) -> bool {
        !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) && !self.holidays.contains(&date)
    }

    /// First business day strictly after `date`
    pub fn next_business_day(&self, date: NaiveDate) -> Result<NaiveDate> {
        let mut current = date;
        loop {
            current = current.succ_opt().ok_or_else(|| {
                ForecastError::InvalidSeries(format!("no calendar day after {}", current))
            })?;
            if self.is_business_day(current) {
                return Ok(current);
            }
        }
    }

    /// The `count` consecutive business days strictly after `date`
    pub fn business_days_after(&self, date: NaiveDate, count: usize) -> Result<Vec<NaiveDate>> {
        let mut days = Vec::with_capacity(count);
        let mut current = date;
        for _ in 0..count {
            current = self.next_business_day(current)?;
            days.push(current);
        }
        Ok(days)
    }

    /// The `count` consecutive business days starting at `start` (inclusive
    /// when `start` is itself a business day)
    pub fn business_days_from(&self, start: NaiveDate, count: usize) -> Result<Vec<NaiveDate>> {
        if count == 0 {
            return Ok(Vec::new());
        }
        let first = if self.is_business_day(start) {
            start
        } else {
            self.next_business_day(start)?
        };
        let mut days = vec![first];
        days.extend(self.business_days_after(first, count - 1)?);
        Ok(days)
    }

    /// Registered holidays
    pub fn holidays(&self) -> impl Iterator<Item = &NaiveDate> {
        self.holidays.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_friday_rolls_to_monday() {
        let calendar = BusinessCalendar::weekdays();
        // 2024-03-01 is a Friday
        assert_eq!(
            calendar.next_business_day(date("2024-03-01")).unwrap(),
            date("2024-03-04")
        );
    }

    #[test]
    fn test_holidays_are_skipped() {
        let calendar = BusinessCalendar::with_holidays(vec![date("2024-03-04")]);
        assert!(!calendar.is_business_day(date("2024-03-04")));
        assert_eq!(
            calendar.next_business_day(date("2024-03-01")).unwrap(),
            date("2024-03-05")
        );
    }

    #[test]
    fn test_business_days_after_skips_weekends() {
        let calendar = BusinessCalendar::weekdays();
        let days = calendar.business_days_after(date("2024-03-06"), 5).unwrap();
        assert_eq!(
            days,
            vec![
                date("2024-03-07"),
                date("2024-03-08"),
                date("2024-03-11"),
                date("2024-03-12"),
                date("2024-03-13"),
            ]
        );
    }

    #[test]
    fn test_business_days_from_weekend_start() {
        let calendar = BusinessCalendar::weekdays();
        // 2024-03-09 is a Saturday
        let days = calendar.business_days_from(date("2024-03-09"), 2).unwrap();
        assert_eq!(days, vec![date("2024-03-11"), date("2024-03-12")]);
        assert!(calendar.business_days_from(date("2024-03-09"), 0).unwrap().is_empty());
    }
}
