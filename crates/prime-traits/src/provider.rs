//! Metric provider capability.
//!
//! This module defines [`MetricProvider`], the only interface through which
//! the alignment core sees market data, together with an in-memory
//! implementation for fixtures and a memoizing decorator for return windows.

use crate::{
    Cache, Date, EventSeries, PriceHistory, PricePoint, Symbol,
    cache::{get_json, put_json},
};
use std::{
    collections::HashMap,
    fmt,
    sync::atomic::{AtomicUsize, Ordering},
};
use tracing::trace;

/// Supplies the raw fundamental and price-derived series of a ticker.
///
/// Implementations absorb their own failures: a series that cannot be fetched
/// is returned empty, and a return window that cannot be computed is `None`.
/// Downstream joins then drop the affected rows instead of aborting the run.
pub trait MetricProvider {
    /// Reported earnings per share, one observation per report date.
    fn eps_series(&self, symbol: &str) -> EventSeries;

    /// Price/earnings ratio on each EPS report date; individual entries may be missing.
    fn pe_series(&self, symbol: &str) -> EventSeries<Option<f64>>;

    /// Annual total revenue; unparseable values are `None`.
    fn revenue_series(&self, symbol: &str) -> EventSeries<Option<f64>>;

    /// Compounded return over `[anchor - horizon_days, anchor)`.
    fn return_window(&self, symbol: &str, anchor: Date, horizon_days: u32) -> Option<f64>;
}

impl<P: MetricProvider + ?Sized> MetricProvider for &P {
    fn eps_series(&self, symbol: &str) -> EventSeries {
        (**self).eps_series(symbol)
    }

    fn pe_series(&self, symbol: &str) -> EventSeries<Option<f64>> {
        (**self).pe_series(symbol)
    }

    fn revenue_series(&self, symbol: &str) -> EventSeries<Option<f64>> {
        (**self).revenue_series(symbol)
    }

    fn return_window(&self, symbol: &str, anchor: Date, horizon_days: u32) -> Option<f64> {
        (**self).return_window(symbol, anchor, horizon_days)
    }
}

impl<P: MetricProvider + ?Sized> MetricProvider for Box<P> {
    fn eps_series(&self, symbol: &str) -> EventSeries {
        (**self).eps_series(symbol)
    }

    fn pe_series(&self, symbol: &str) -> EventSeries<Option<f64>> {
        (**self).pe_series(symbol)
    }

    fn revenue_series(&self, symbol: &str) -> EventSeries<Option<f64>> {
        (**self).revenue_series(symbol)
    }

    fn return_window(&self, symbol: &str, anchor: Date, horizon_days: u32) -> Option<f64> {
        (**self).return_window(symbol, anchor, horizon_days)
    }
}

/// Identity of a return window.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ReturnWindowKey {
    /// Ticker symbol.
    pub symbol: Symbol,
    /// Exclusive end of the window.
    pub anchor: Date,
    /// Window length in calendar days.
    pub horizon_days: u32,
}

impl ReturnWindowKey {
    /// Creates a key.
    pub fn new(symbol: impl Into<Symbol>, anchor: Date, horizon_days: u32) -> Self {
        Self {
            symbol: symbol.into(),
            anchor,
            horizon_days,
        }
    }

    /// Returns the cache key string for this window.
    pub fn cache_key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReturnWindowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "return_{}_{}_{}",
            self.symbol, self.anchor, self.horizon_days
        )
    }
}

/// Memoizes [`MetricProvider::return_window`] in an injected [`Cache`].
///
/// Only resolved windows are stored, so a transient provider failure is
/// retried on the next request instead of being remembered.
#[derive(Debug)]
pub struct CachedReturns<P, C> {
    inner: P,
    cache: C,
}

impl<P: MetricProvider, C: Cache> CachedReturns<P, C> {
    /// Wraps `inner`, storing return windows in `cache`.
    pub const fn new(inner: P, cache: C) -> Self {
        Self { inner, cache }
    }

    /// Returns the wrapped provider.
    pub const fn inner(&self) -> &P {
        &self.inner
    }
}

impl<P: MetricProvider, C: Cache> MetricProvider for CachedReturns<P, C> {
    fn eps_series(&self, symbol: &str) -> EventSeries {
        self.inner.eps_series(symbol)
    }

    fn pe_series(&self, symbol: &str) -> EventSeries<Option<f64>> {
        self.inner.pe_series(symbol)
    }

    fn revenue_series(&self, symbol: &str) -> EventSeries<Option<f64>> {
        self.inner.revenue_series(symbol)
    }

    fn return_window(&self, symbol: &str, anchor: Date, horizon_days: u32) -> Option<f64> {
        let key = ReturnWindowKey::new(symbol, anchor, horizon_days).cache_key();
        if let Some(hit) = get_json::<f64, _>(&self.cache, &key) {
            trace!(%key, "return window cache hit");
            return Some(hit);
        }
        let value = self.inner.return_window(symbol, anchor, horizon_days)?;
        put_json(&self.cache, &key, &value);
        Some(value)
    }
}

#[derive(Debug, Default)]
struct TickerFixture {
    eps: Vec<(Date, f64)>,
    pe: Vec<(Date, Option<f64>)>,
    revenue: Vec<(Date, Option<f64>)>,
    prices: PriceHistory,
    returns: HashMap<(Date, u32), f64>,
}

/// In-memory provider over fixed data.
///
/// Explicit return windows take precedence; otherwise windows are compounded
/// from the ticker's price history. Unknown tickers yield empty series.
///
/// # Example
///
/// ```
/// use prime_traits::{Date, MetricProvider, StaticProvider};
///
/// let d = Date::from_ymd_opt(2023, 5, 24).unwrap();
/// let provider = StaticProvider::new()
///     .with_eps("NVDA", [(d, 1.09)])
///     .with_return("NVDA", d, 180, 0.42);
///
/// assert_eq!(provider.eps_series("NVDA").len(), 1);
/// assert_eq!(provider.return_window("NVDA", d, 180), Some(0.42));
/// assert!(provider.eps_series("AMD").is_empty());
/// ```
#[derive(Debug, Default)]
pub struct StaticProvider {
    tickers: HashMap<Symbol, TickerFixture>,
    return_calls: AtomicUsize,
}

impl StaticProvider {
    /// Creates an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    fn ticker(&mut self, symbol: &str) -> &mut TickerFixture {
        self.tickers.entry(symbol.to_string()).or_default()
    }

    /// Sets the EPS observations of `symbol`.
    #[must_use]
    pub fn with_eps(mut self, symbol: &str, eps: impl IntoIterator<Item = (Date, f64)>) -> Self {
        self.ticker(symbol).eps = eps.into_iter().collect();
        self
    }

    /// Sets the P/E observations of `symbol`.
    #[must_use]
    pub fn with_pe(
        mut self,
        symbol: &str,
        pe: impl IntoIterator<Item = (Date, Option<f64>)>,
    ) -> Self {
        self.ticker(symbol).pe = pe.into_iter().collect();
        self
    }

    /// Sets the annual revenue observations of `symbol`.
    #[must_use]
    pub fn with_revenue(
        mut self,
        symbol: &str,
        revenue: impl IntoIterator<Item = (Date, Option<f64>)>,
    ) -> Self {
        self.ticker(symbol).revenue = revenue.into_iter().collect();
        self
    }

    /// Sets the daily closes of `symbol`.
    #[must_use]
    pub fn with_prices(
        mut self,
        symbol: &str,
        prices: impl IntoIterator<Item = PricePoint>,
    ) -> Self {
        self.ticker(symbol).prices = prices.into_iter().collect();
        self
    }

    /// Fixes the return of one window of `symbol`.
    #[must_use]
    pub fn with_return(
        mut self,
        symbol: &str,
        anchor: Date,
        horizon_days: u32,
        value: f64,
    ) -> Self {
        self.ticker(symbol)
            .returns
            .insert((anchor, horizon_days), value);
        self
    }

    /// Returns how many return windows have been requested so far.
    pub fn return_calls(&self) -> usize {
        self.return_calls.load(Ordering::Relaxed)
    }
}

impl MetricProvider for StaticProvider {
    fn eps_series(&self, symbol: &str) -> EventSeries {
        self.tickers
            .get(symbol)
            .map(|t| EventSeries::from_pairs(t.eps.iter().copied()))
            .unwrap_or_default()
    }

    fn pe_series(&self, symbol: &str) -> EventSeries<Option<f64>> {
        self.tickers
            .get(symbol)
            .map(|t| EventSeries::from_pairs(t.pe.iter().copied()))
            .unwrap_or_default()
    }

    fn revenue_series(&self, symbol: &str) -> EventSeries<Option<f64>> {
        self.tickers
            .get(symbol)
            .map(|t| EventSeries::from_pairs(t.revenue.iter().copied()))
            .unwrap_or_default()
    }

    fn return_window(&self, symbol: &str, anchor: Date, horizon_days: u32) -> Option<f64> {
        self.return_calls.fetch_add(1, Ordering::Relaxed);
        let ticker = self.tickers.get(symbol)?;
        ticker
            .returns
            .get(&(anchor, horizon_days))
            .copied()
            .or_else(|| ticker.prices.compounded_return(anchor, horizon_days))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryCache;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_static_provider_unknown_ticker_is_empty() {
        let provider = StaticProvider::new();
        assert!(provider.eps_series("NVDA").is_empty());
        assert!(provider.pe_series("NVDA").is_empty());
        assert!(provider.revenue_series("NVDA").is_empty());
        assert!(provider.return_window("NVDA", date(2023, 1, 1), 90).is_none());
    }

    #[test]
    fn test_static_provider_compounds_prices() {
        let provider = StaticProvider::new().with_prices(
            "MU",
            [
                PricePoint {
                    date: date(2023, 1, 2),
                    close: 50.0,
                },
                PricePoint {
                    date: date(2023, 1, 3),
                    close: 55.0,
                },
            ],
        );
        let ret = provider.return_window("MU", date(2023, 1, 4), 10).unwrap();
        assert!((ret - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_return_window_key_format() {
        let key = ReturnWindowKey::new("AMD", date(2023, 4, 30), 90);
        assert_eq!(key.cache_key(), "return_AMD_2023-04-30_90");
    }

    #[test]
    fn test_cached_returns_memoizes_hits() {
        let d = date(2023, 5, 24);
        let provider = StaticProvider::new().with_return("NVDA", d, 180, 0.25);
        let cached = CachedReturns::new(provider, MemoryCache::new());

        assert_eq!(cached.return_window("NVDA", d, 180), Some(0.25));
        assert_eq!(cached.return_window("NVDA", d, 180), Some(0.25));
        assert_eq!(cached.inner().return_calls(), 1);
    }

    #[test]
    fn test_cached_returns_does_not_remember_misses() {
        let d = date(2023, 5, 24);
        let cached = CachedReturns::new(StaticProvider::new(), MemoryCache::new());

        assert!(cached.return_window("NVDA", d, 180).is_none());
        assert!(cached.return_window("NVDA", d, 180).is_none());
        assert_eq!(cached.inner().return_calls(), 2);
    }
}
