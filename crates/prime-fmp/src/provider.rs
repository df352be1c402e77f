//! [`MetricProvider`] backed by the FMP API.

use crate::{
    FmpClient, Result,
    error::FmpError,
    types::{EarningsReport, HistoricalPrice, IncomeStatement, Period},
};
use prime_traits::{
    Cache, Date, EventSeries, MetricProvider, PriceHistory, PricePoint, Symbol,
    cache::{get_json, put_json},
};
use serde::{Serialize, de::DeserializeOwned};
use std::{
    collections::HashMap,
    future::Future,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, warn};

/// Default first date of the requested price history.
pub const DEFAULT_PRICE_HISTORY_FROM: &str = "2005-01-01";

/// Fetches earnings, income statements and daily prices from FMP.
///
/// Raw responses are stored in the injected [`Cache`] under one key per
/// endpoint and ticker, so repeated runs only hit the network for tickers
/// not seen before. Fetch failures are logged and surface as empty series.
///
/// Requests are made on a private current-thread runtime; every method
/// blocks until its response is available.
#[derive(Debug)]
pub struct FmpProvider<C> {
    client: FmpClient,
    runtime: Runtime,
    cache: C,
    price_history_from: Date,
    prices: PriceMemo,
}

impl<C: Cache> FmpProvider<C> {
    /// Creates a provider around `client`, caching responses in `cache`.
    ///
    /// # Errors
    ///
    /// Returns [`FmpError::Runtime`] if the blocking runtime cannot be built.
    pub fn new(client: FmpClient, cache: C) -> Result<Self> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(FmpError::Runtime)?;
        Ok(Self {
            client,
            runtime,
            cache,
            price_history_from: default_price_history_from(),
            prices: PriceMemo::default(),
        })
    }

    /// Creates a provider with the API key from the environment.
    ///
    /// # Errors
    ///
    /// Returns [`FmpError::MissingApiKey`] if `FMP_API_KEY` is unset.
    pub fn from_env(cache: C) -> Result<Self> {
        Self::new(FmpClient::from_env()?, cache)
    }

    /// Sets the first date of the requested price history.
    #[must_use]
    pub fn with_price_history_from(mut self, from: Date) -> Self {
        self.price_history_from = from;
        self
    }

    /// Returns the response cache.
    pub const fn cache(&self) -> &C {
        &self.cache
    }

    fn cached<T, F>(&self, key: &str, fetch: F) -> Vec<T>
    where
        T: Serialize + DeserializeOwned,
        F: Future<Output = Result<Vec<T>>>,
    {
        if let Some(hit) = get_json::<Vec<T>, _>(&self.cache, key) {
            debug!(key, "response cache hit");
            return hit;
        }
        match self.runtime.block_on(fetch) {
            Ok(items) => {
                put_json(&self.cache, key, &items);
                items
            }
            Err(e) => {
                warn!(key, error = %e, "FMP fetch failed");
                Vec::new()
            }
        }
    }

    fn earnings(&self, symbol: &str) -> Vec<EarningsReport> {
        self.cached(
            &format!("fmp_earnings_{symbol}"),
            self.client.earnings(symbol, None),
        )
    }

    fn income_statements(&self, symbol: &str) -> Vec<IncomeStatement> {
        self.cached(
            &format!("fmp_income_annual_{symbol}"),
            self.client.income_statement(symbol, Period::Annual, None),
        )
    }

    fn price_history(&self, symbol: &str) -> Arc<PriceHistory> {
        self.prices.get_or_fetch(symbol, || {
            let from = self.price_history_from.format("%Y-%m-%d").to_string();
            let raw: Vec<HistoricalPrice> = self.cached(
                &format!("fmp_prices_{symbol}_{from}"),
                self.client.historical_prices(symbol, Some(&from), None),
            );
            let history = price_history(&raw);
            debug!(symbol, points = history.len(), "loaded price history");
            history
        })
    }
}

/// Per-ticker price histories, loaded once.
///
/// The lock is only held for lookups and inserts, never across a fetch.
/// Concurrent first requests for one ticker may both fetch; the first
/// insert wins.
#[derive(Debug, Default)]
struct PriceMemo(Mutex<HashMap<Symbol, Arc<PriceHistory>>>);

impl PriceMemo {
    fn lock(&self) -> MutexGuard<'_, HashMap<Symbol, Arc<PriceHistory>>> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn get_or_fetch(
        &self,
        symbol: &str,
        fetch: impl FnOnce() -> PriceHistory,
    ) -> Arc<PriceHistory> {
        if let Some(history) = self.lock().get(symbol) {
            return Arc::clone(history);
        }
        let fetched = Arc::new(fetch());
        Arc::clone(self.lock().entry(symbol.to_string()).or_insert(fetched))
    }
}

fn default_price_history_from() -> Date {
    Date::parse_from_str(DEFAULT_PRICE_HISTORY_FROM, "%Y-%m-%d").unwrap_or_default()
}

fn price_history(raw: &[HistoricalPrice]) -> PriceHistory {
    raw.iter()
        .filter_map(|p| {
            Some(PricePoint {
                date: p.parsed_date()?,
                close: p.close?,
            })
        })
        .collect()
}

fn eps_series(reports: &[EarningsReport]) -> EventSeries {
    EventSeries::from_pairs(
        reports
            .iter()
            .filter_map(|r| Some((r.parsed_date()?, r.eps_actual?))),
    )
}

/// P/E on each EPS date from the close on the nearest trading day at or before it.
///
/// A zero EPS yields a P/E of exactly 0, which ranks last.
fn pe_series(eps: &EventSeries, prices: &PriceHistory) -> EventSeries<Option<f64>> {
    EventSeries::from_pairs(eps.iter().map(|obs| {
        let pe = prices.close_near(obs.date).map(|close| {
            if obs.value == 0.0 {
                0.0
            } else {
                close / obs.value
            }
        });
        (obs.date, pe)
    }))
}

fn revenue_series(statements: &[IncomeStatement]) -> EventSeries<Option<f64>> {
    EventSeries::from_pairs(
        statements
            .iter()
            .filter_map(|s| Some((s.parsed_date()?, s.revenue))),
    )
}

impl<C: Cache> MetricProvider for FmpProvider<C> {
    fn eps_series(&self, symbol: &str) -> EventSeries {
        eps_series(&self.earnings(symbol))
    }

    fn pe_series(&self, symbol: &str) -> EventSeries<Option<f64>> {
        let eps = self.eps_series(symbol);
        if eps.is_empty() {
            return EventSeries::empty();
        }
        pe_series(&eps, &self.price_history(symbol))
    }

    fn revenue_series(&self, symbol: &str) -> EventSeries<Option<f64>> {
        revenue_series(&self.income_statements(symbol))
    }

    fn return_window(&self, symbol: &str, anchor: Date, horizon_days: u32) -> Option<f64> {
        self.price_history(symbol)
            .compounded_return(anchor, horizon_days)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prime_traits::MemoryCache;

    fn date(y: i32, m: u32, d: u32) -> Date {
        Date::from_ymd_opt(y, m, d).unwrap()
    }

    fn report(date: &str, eps: Option<f64>) -> EarningsReport {
        EarningsReport {
            date: date.to_string(),
            symbol: "NVDA".to_string(),
            eps_actual: eps,
            eps_estimated: None,
            revenue_actual: None,
        }
    }

    fn price(date: &str, close: f64) -> HistoricalPrice {
        HistoricalPrice {
            date: date.to_string(),
            open: None,
            high: None,
            low: None,
            close: Some(close),
            volume: None,
        }
    }

    fn offline_provider(cache: MemoryCache) -> FmpProvider<MemoryCache> {
        // Unroutable key; every test pre-populates the cache
        FmpProvider::new(FmpClient::new("offline"), cache).unwrap()
    }

    #[test]
    fn test_eps_series_skips_unreported() {
        let series = eps_series(&[
            report("2025-11-19", None),
            report("2025-08-27", Some(1.05)),
            report("bad-date", Some(1.0)),
            report("2025-05-28", Some(0.81)),
        ]);
        assert_eq!(series.len(), 2);
        assert_eq!(series.get(date(2025, 8, 27)), Some(&1.05));
    }

    #[test]
    fn test_pe_probes_back_to_trading_day() {
        // 2023-07-02 is a Sunday; Friday 2023-06-30 is within the 3-day probe
        let eps = EventSeries::from_pairs([
            (date(2023, 7, 2), 2.0),
            (date(2023, 7, 12), 0.0),
            (date(2023, 7, 20), 1.0),
        ]);
        let prices = price_history(&[
            price("2023-06-30", 100.0),
            price("2023-07-11", 90.0),
        ]);
        let pe = pe_series(&eps, &prices);

        assert_eq!(pe.get(date(2023, 7, 2)), Some(&Some(50.0)));
        assert_eq!(pe.get(date(2023, 7, 12)), Some(&Some(0.0)));
        assert_eq!(pe.get(date(2023, 7, 20)), Some(&None));
    }

    #[test]
    fn test_revenue_series_keeps_unparsed_values_as_none() {
        let statements: Vec<IncomeStatement> = serde_json::from_str(
            r#"[
                {"date": "2024-01-28", "revenue": 60922000000},
                {"date": "2023-01-29", "revenue": "n/a"}
            ]"#,
        )
        .unwrap();
        let series = revenue_series(&statements);
        assert_eq!(series.len(), 2);
        assert_eq!(series.get(date(2023, 1, 29)), Some(&None));
        assert_eq!(series.get(date(2024, 1, 28)), Some(&Some(60_922_000_000.0)));
    }

    #[test]
    fn test_provider_reads_cached_responses() {
        let cache = MemoryCache::new();
        put_json(
            &cache,
            "fmp_earnings_MU",
            &vec![report("2023-06-28", Some(-1.43))],
        );
        put_json(
            &cache,
            "fmp_prices_MU_2005-01-01",
            &vec![price("2023-06-27", 64.0), price("2023-06-28", 66.0)],
        );
        let provider = offline_provider(cache);

        assert_eq!(provider.eps_series("MU").len(), 1);
        let pe = provider.pe_series("MU");
        let expected = 66.0 / -1.43;
        assert_eq!(pe.get(date(2023, 6, 28)), Some(&Some(expected)));

        let ret = provider.return_window("MU", date(2023, 6, 29), 5).unwrap();
        assert!((ret - (66.0 / 64.0 - 1.0)).abs() < 1e-12);
    }

    #[test]
    fn test_price_memo_is_unlocked_while_fetching() {
        let memo = PriceMemo::default();
        let first = memo.get_or_fetch("NVDA", || {
            assert!(memo.0.try_lock().is_ok());
            price_history(&[price("2023-01-03", 10.0)])
        });
        assert_eq!(first.len(), 1);

        let again = memo.get_or_fetch("NVDA", || panic!("fetched twice"));
        assert!(Arc::ptr_eq(&first, &again));
    }

    #[test]
    fn test_custom_price_history_start_changes_cache_key() {
        let cache = MemoryCache::new();
        put_json(
            &cache,
            "fmp_prices_AMD_2015-01-01",
            &vec![price("2023-01-03", 10.0), price("2023-01-04", 11.0)],
        );
        let provider = offline_provider(cache).with_price_history_from(date(2015, 1, 1));
        let ret = provider.return_window("AMD", date(2023, 1, 5), 10).unwrap();
        assert!((ret - 0.1).abs() < 1e-12);
    }
}
