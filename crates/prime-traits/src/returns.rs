//! Daily price history and trailing compounded returns.
//!
//! Return windows are half-open: a window of `horizon` days anchored at `t`
//! covers closes dated in `[t - horizon, t)`, so the anchor day itself is
//! never used.

use crate::Date;
use chrono::Duration;
use serde::{Deserialize, Serialize};

/// Number of calendar days probed when looking for the nearest trading day,
/// the requested date included.
pub const TRADING_DAY_PROBES: u32 = 3;

/// A daily closing price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading date.
    pub date: Date,
    /// Closing price (split-adjusted).
    pub close: f64,
}

/// Daily closing prices of one ticker, ascending by date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PriceHistory {
    points: Vec<PricePoint>,
}

impl PriceHistory {
    /// Creates a history from points in any order.
    ///
    /// Non-finite or non-positive closes are discarded; the first point for
    /// a repeated date wins.
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.retain(|p| p.close.is_finite() && p.close > 0.0);
        points.sort_by_key(|p| p.date);
        points.dedup_by(|later, earlier| later.date == earlier.date);
        Self { points }
    }

    /// Returns the number of trading days.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Returns whether the history is empty.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Returns the close on `date` exactly.
    pub fn close_on(&self, date: Date) -> Option<f64> {
        self.points
            .binary_search_by_key(&date, |p| p.date)
            .ok()
            .map(|idx| self.points[idx].close)
    }

    /// Returns the close on the nearest trading day at or before `date`.
    ///
    /// Probes `date` and then steps back one calendar day at a time, for at
    /// most [`TRADING_DAY_PROBES`] attempts; beyond that the price is missing.
    pub fn close_near(&self, date: Date) -> Option<f64> {
        (0..TRADING_DAY_PROBES)
            .filter_map(|back| date.checked_sub_signed(Duration::days(i64::from(back))))
            .find_map(|day| self.close_on(day))
    }

    /// Returns the closes dated in `[from, to)`.
    pub fn window(&self, from: Date, to: Date) -> &[PricePoint] {
        let start = self.points.partition_point(|p| p.date < from);
        let end = self.points.partition_point(|p| p.date < to);
        &self.points[start..end.max(start)]
    }

    /// Returns the compounded return over `[anchor - horizon_days, anchor)`.
    ///
    /// This is the product of `(1 + daily return)` minus one. At least two
    /// closes are needed inside the window to produce one daily return.
    pub fn compounded_return(&self, anchor: Date, horizon_days: u32) -> Option<f64> {
        let from = anchor.checked_sub_signed(Duration::days(i64::from(horizon_days)))?;
        compound(self.window(from, anchor))
    }
}

impl FromIterator<PricePoint> for PriceHistory {
    fn from_iter<I: IntoIterator<Item = PricePoint>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Compounds the daily returns of consecutive closes.
fn compound(points: &[PricePoint]) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }
    let growth = points
        .windows(2)
        .map(|w| w[1].close / w[0].close)
        .product::<f64>();
    let ret = growth - 1.0;
    ret.is_finite().then_some(ret)
}
