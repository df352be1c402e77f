//! Calendar quarter keys.

use crate::{Date, PrimeError, Result};
use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// A `(year, quarter)` calendar period.
///
/// Keys order chronologically and serialize as their label, `"{year}_q{quarter}"`,
/// which is also the top-level key of the persisted cross-section document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct PeriodKey {
    year: i32,
    quarter: u8,
}

impl PeriodKey {
    /// Creates a period key.
    ///
    /// # Errors
    ///
    /// Returns [`PrimeError::InvalidPeriod`] if `quarter` is not in `1..=4`.
    pub fn new(year: i32, quarter: u8) -> Result<Self> {
        if !(1..=4).contains(&quarter) {
            return Err(PrimeError::InvalidPeriod(format!(
                "quarter {quarter} out of range 1..=4"
            )));
        }
        Ok(Self { year, quarter })
    }

    /// Returns the period containing `date`; quarter = ceil(month / 3).
    pub fn from_date(date: Date) -> Self {
        Self {
            year: date.year(),
            quarter: date.month().div_ceil(3) as u8,
        }
    }

    /// Returns the calendar year.
    pub const fn year(&self) -> i32 {
        self.year
    }

    /// Returns the quarter number (1-4).
    pub const fn quarter(&self) -> u8 {
        self.quarter
    }

    /// Returns the `"{year}_q{quarter}"` label.
    pub fn label(&self) -> String {
        self.to_string()
    }

    /// Returns the immediately preceding quarter; Q1's predecessor is Q4 of the prior year.
    pub const fn previous(&self) -> Self {
        if self.quarter == 1 {
            Self {
                year: self.year - 1,
                quarter: 4,
            }
        } else {
            Self {
                year: self.year,
                quarter: self.quarter - 1,
            }
        }
    }

    /// Returns the immediately following quarter.
    pub const fn next(&self) -> Self {
        if self.quarter == 4 {
            Self {
                year: self.year + 1,
                quarter: 1,
            }
        } else {
            Self {
                year: self.year,
                quarter: self.quarter + 1,
            }
        }
    }

    /// Returns the anchor date used for holding-period returns.
    ///
    /// This is the last day of the quarter's *first* month (Jan 31, Apr 30,
    /// Jul 31, Oct 31), not the calendar quarter end.
    pub fn period_end(&self) -> Option<Date> {
        let (month, day) = match self.quarter {
            1 => (1, 31),
            2 => (4, 30),
            3 => (7, 31),
            _ => (10, 31),
        };
        Date::from_ymd_opt(self.year, month, day)
    }
}

impl fmt::Display for PeriodKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_q{}", self.year, self.quarter)
    }
}

impl FromStr for PeriodKey {
    type Err = PrimeError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || PrimeError::InvalidPeriod(s.to_string());
        let (year, quarter) = s.split_once("_q").ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let quarter = quarter.parse::<u8>().map_err(|_| invalid())?;
        Self::new(year, quarter)
    }
}

impl From<PeriodKey> for String {
    fn from(key: PeriodKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for PeriodKey {
    type Error = PrimeError;

    fn try_from(s: String) -> Result<Self> {
        s.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_from_date_quarters() {
        assert_eq!(PeriodKey::from_date(date(2023, 1, 15)).quarter(), 1);
        assert_eq!(PeriodKey::from_date(date(2023, 3, 31)).quarter(), 1);
        assert_eq!(PeriodKey::from_date(date(2023, 4, 1)).quarter(), 2);
        assert_eq!(PeriodKey::from_date(date(2023, 9, 30)).quarter(), 3);
        assert_eq!(PeriodKey::from_date(date(2023, 12, 31)).quarter(), 4);
    }

    #[test]
    fn test_label_round_trip() {
        let key = PeriodKey::new(2019, 3).unwrap();
        assert_eq!(key.label(), "2019_q3");
        assert_eq!("2019_q3".parse::<PeriodKey>().unwrap(), key);
    }

    #[test]
    fn test_invalid_labels() {
        assert!("2019-q3".parse::<PeriodKey>().is_err());
        assert!("2019_q5".parse::<PeriodKey>().is_err());
        assert!("abcd_q1".parse::<PeriodKey>().is_err());
        assert!(PeriodKey::new(2019, 0).is_err());
    }

    #[test]
    fn test_previous_wraps_year() {
        let q1 = PeriodKey::new(2020, 1).unwrap();
        assert_eq!(q1.previous(), PeriodKey::new(2019, 4).unwrap());
        assert_eq!(
            PeriodKey::new(2020, 3).unwrap().previous(),
            PeriodKey::new(2020, 2).unwrap()
        );
        assert_eq!(q1.previous().next(), q1);
    }

    #[test]
    fn test_period_end_uses_first_month() {
        let ends: Vec<Date> = (1..=4)
            .map(|q| PeriodKey::new(2021, q).unwrap().period_end().unwrap())
            .collect();
        assert_eq!(
            ends,
            vec![
                date(2021, 1, 31),
                date(2021, 4, 30),
                date(2021, 7, 31),
                date(2021, 10, 31)
            ]
        );
    }

    #[test]
    fn test_ordering_is_chronological() {
        let mut keys = vec![
            PeriodKey::new(2021, 1).unwrap(),
            PeriodKey::new(2020, 4).unwrap(),
            PeriodKey::new(2020, 2).unwrap(),
        ];
        keys.sort();
        assert_eq!(
            keys.iter().map(PeriodKey::label).collect::<Vec<_>>(),
            vec!["2020_q2", "2020_q4", "2021_q1"]
        );
    }

    #[test]
    fn test_serde_as_label() {
        let key = PeriodKey::new(2022, 4).unwrap();
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"2022_q4\"");
        let back: PeriodKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}
