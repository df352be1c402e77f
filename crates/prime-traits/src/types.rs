//! Common types used throughout the prime workspace.
//!
//! This module defines the date and symbol aliases and [`EventSeries`], the
//! ordered representation of an irregularly sampled fundamental metric.

use crate::{PrimeError, Result};
use serde::{Deserialize, Serialize};

// Re-export date type from chrono
pub use chrono::NaiveDate as Date;

/// A market symbol identifier.
///
/// Typically a ticker such as "NVDA" or "ASML".
pub type Symbol = String;

/// Validates a ticker symbol.
///
/// Blank symbols are a configuration mistake rather than missing data, so
/// they are rejected immediately instead of yielding an empty result.
///
/// # Errors
///
/// Returns [`PrimeError::InvalidSymbol`] if the symbol is empty or whitespace.
pub fn validate_symbol(symbol: &str) -> Result<&str> {
    if symbol.trim().is_empty() {
        return Err(PrimeError::InvalidSymbol(symbol.to_string()));
    }
    Ok(symbol)
}

/// A single dated value of a fundamental metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation<T> {
    /// Observation date.
    pub date: Date,
    /// Observed value.
    pub value: T,
}

impl<T> Observation<T> {
    /// Creates a new observation.
    pub const fn new(date: Date, value: T) -> Self {
        Self { date, value }
    }
}

/// A date-ordered series of observations for one metric of one ticker.
///
/// Construction sorts the observations ascending by date and keeps only the
/// first observation for any repeated date, so lookups can rely on a strictly
/// increasing timeline.
///
/// # Example
///
/// ```
/// use prime_traits::{Date, EventSeries};
///
/// let d = |m| Date::from_ymd_opt(2023, m, 1).unwrap();
/// let series = EventSeries::from_pairs([(d(6), 2.0), (d(1), 1.0)]);
///
/// assert_eq!(series.get(d(1)), Some(&1.0));
/// assert_eq!(series.as_of(d(3)).map(|o| o.value), Some(1.0));
/// assert!(series.as_of(Date::from_ymd_opt(2022, 12, 31).unwrap()).is_none());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EventSeries<T = f64> {
    observations: Vec<Observation<T>>,
}

impl<T> EventSeries<T> {
    /// Creates a series from observations in any order.
    pub fn new(mut observations: Vec<Observation<T>>) -> Self {
        observations.sort_by_key(|o| o.date);
        observations.dedup_by(|later, earlier| later.date == earlier.date);
        Self { observations }
    }

    /// Creates a series from `(date, value)` pairs in any order.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (Date, T)>) -> Self {
        Self::new(
            pairs
                .into_iter()
                .map(|(date, value)| Observation::new(date, value))
                .collect(),
        )
    }

    /// Creates an empty series.
    pub const fn empty() -> Self {
        Self {
            observations: Vec::new(),
        }
    }

    /// Returns the number of observations.
    pub fn len(&self) -> usize {
        self.observations.len()
    }

    /// Returns whether the series has no observations.
    pub fn is_empty(&self) -> bool {
        self.observations.is_empty()
    }

    /// Returns the observations in ascending date order.
    pub fn observations(&self) -> &[Observation<T>] {
        &self.observations
    }

    /// Iterates over the observations in ascending date order.
    pub fn iter(&self) -> std::slice::Iter<'_, Observation<T>> {
        self.observations.iter()
    }

    /// Returns the value observed exactly on `date`.
    pub fn get(&self, date: Date) -> Option<&T> {
        self.observations
            .binary_search_by_key(&date, |o| o.date)
            .ok()
            .map(|idx| &self.observations[idx].value)
    }

    /// Returns the latest observation dated on or before `date`.
    ///
    /// This is the backward as-of lookup: it never looks past `date`.
    pub fn as_of(&self, date: Date) -> Option<&Observation<T>> {
        let idx = self.observations.partition_point(|o| o.date <= date);
        idx.checked_sub(1).map(|i| &self.observations[i])
    }
}

impl<T> Default for EventSeries<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> FromIterator<Observation<T>> for EventSeries<T> {
    fn from_iter<I: IntoIterator<Item = Observation<T>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, T> IntoIterator for &'a EventSeries<T> {
    type Item = &'a Observation<T>;
    type IntoIter = std::slice::Iter<'a, Observation<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.observations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_validate_symbol() {
        assert_eq!(validate_symbol("NVDA").unwrap(), "NVDA");
        assert!(matches!(
            validate_symbol(""),
            Err(PrimeError::InvalidSymbol(_))
        ));
        assert!(matches!(
            validate_symbol("   "),
            Err(PrimeError::InvalidSymbol(_))
        ));
    }

    #[test]
    fn test_series_sorted_on_construction() {
        let series = EventSeries::from_pairs([
            (date(2023, 6, 1), 3.0),
            (date(2021, 6, 1), 1.0),
            (date(2022, 6, 1), 2.0),
        ]);
        let dates: Vec<Date> = series.iter().map(|o| o.date).collect();
        assert_eq!(
            dates,
            vec![date(2021, 6, 1), date(2022, 6, 1), date(2023, 6, 1)]
        );
    }

    #[test]
    fn test_series_duplicate_dates_keep_first() {
        let series = EventSeries::from_pairs([
            (date(2023, 1, 1), 1.0),
            (date(2023, 1, 1), 9.0),
        ]);
        assert_eq!(series.len(), 1);
        assert_eq!(series.get(date(2023, 1, 1)), Some(&1.0));
    }

    #[test]
    fn test_exact_get() {
        let series = EventSeries::from_pairs([(date(2023, 1, 1), 1.0)]);
        assert_eq!(series.get(date(2023, 1, 1)), Some(&1.0));
        assert_eq!(series.get(date(2023, 1, 2)), None);
    }

    #[test]
    fn test_as_of_backward() {
        let series = EventSeries::from_pairs([
            (date(2022, 1, 1), 0.10),
            (date(2023, 1, 1), 0.20),
        ]);

        assert_eq!(series.as_of(date(2023, 6, 1)).map(|o| o.value), Some(0.20));
        assert_eq!(series.as_of(date(2023, 1, 1)).map(|o| o.value), Some(0.20));
        assert_eq!(series.as_of(date(2022, 12, 31)).map(|o| o.value), Some(0.10));
        assert!(series.as_of(date(2021, 6, 1)).is_none());
    }

    #[test]
    fn test_empty_series() {
        let series: EventSeries = EventSeries::default();
        assert!(series.is_empty());
        assert!(series.as_of(date(2024, 1, 1)).is_none());
    }
}
