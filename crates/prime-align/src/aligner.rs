//! Temporal alignment of a ticker's fundamental series onto its EPS timeline.

use crate::growth::yoy_growth;
use prime_traits::{
    AlignedRow, Date, MetricProvider, MetricSnapshot, Result, validate_symbol,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Configuration for the temporal aligner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlignerConfig {
    /// Trailing window of the short return, in calendar days (default: 180 ≈ 6 months)
    pub short_horizon_days: u32,

    /// Trailing window of the long return, in calendar days (default: 360 ≈ 12 months)
    pub long_horizon_days: u32,
}

impl Default for AlignerConfig {
    fn default() -> Self {
        Self {
            short_horizon_days: 180,
            long_horizon_days: 360,
        }
    }
}

/// Builds the point-in-time rows of one ticker.
///
/// Every EPS report date becomes a candidate row. The P/E ratio and both
/// trailing returns must exist for that exact date; revenue growth is
/// attached as of the date, i.e. from the latest annual observation dated on
/// or before it, so a row never sees revenue published after it. Candidates
/// with any unresolved metric are dropped.
///
/// # Example
///
/// ```
/// use prime_align::TemporalAligner;
/// use prime_traits::{Date, StaticProvider};
///
/// let d = |y, m, day| Date::from_ymd_opt(y, m, day).unwrap();
/// let provider = StaticProvider::new()
///     .with_eps("MU", [(d(2023, 6, 28), -1.43)])
///     .with_pe("MU", [(d(2023, 6, 28), Some(-45.2))])
///     .with_revenue("MU", [(d(2021, 9, 2), Some(27.7)), (d(2022, 9, 1), Some(30.8))])
///     .with_return("MU", d(2023, 6, 28), 180, 0.31)
///     .with_return("MU", d(2023, 6, 28), 360, 0.05);
///
/// let rows = TemporalAligner::new(&provider).align("MU").unwrap();
/// assert_eq!(rows.len(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct TemporalAligner<P> {
    provider: P,
    config: AlignerConfig,
}

impl<P: MetricProvider> TemporalAligner<P> {
    /// Creates an aligner with the default horizons.
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, AlignerConfig::default())
    }

    /// Creates an aligner with the given configuration.
    pub const fn with_config(provider: P, config: AlignerConfig) -> Self {
        Self { provider, config }
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &AlignerConfig {
        &self.config
    }

    /// Returns the underlying provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    /// Aligns every metric of `symbol` onto its EPS report dates.
    ///
    /// Rows are strictly ascending by date. An empty result is a valid
    /// outcome: it is what a ticker with no EPS history, or whose P/E or
    /// revenue could not be fetched, produces.
    ///
    /// # Errors
    ///
    /// Returns [`prime_traits::PrimeError::InvalidSymbol`] for a blank symbol.
    pub fn align(&self, symbol: &str) -> Result<Vec<AlignedRow>> {
        let symbol = validate_symbol(symbol)?;

        let eps = self.provider.eps_series(symbol);
        if eps.is_empty() {
            debug!(symbol, "no EPS history");
            return Ok(Vec::new());
        }
        let pe = self.provider.pe_series(symbol);
        let growth = yoy_growth(&self.provider.revenue_series(symbol));

        let mut rows = Vec::with_capacity(eps.len());
        let mut dropped = 0usize;
        for obs in &eps {
            let date = obs.date;
            let row = finite(obs.value).and_then(|reported_eps| {
                let pe_ratio = pe.get(date).copied().flatten().and_then(finite)?;
                let yoy_return = growth.as_of(date).and_then(|g| g.value).and_then(finite)?;
                let quarterly_return_6m =
                    self.trailing_return(symbol, date, self.config.short_horizon_days)?;
                let quarterly_return_1y =
                    self.trailing_return(symbol, date, self.config.long_horizon_days)?;
                Some(AlignedRow {
                    date,
                    metrics: MetricSnapshot {
                        reported_eps,
                        pe_ratio,
                        quarterly_return_6m,
                        quarterly_return_1y,
                        yoy_return,
                    },
                })
            });
            match row {
                Some(row) => rows.push(row),
                None => dropped += 1,
            }
        }

        debug!(symbol, rows = rows.len(), dropped, "aligned ticker");
        Ok(rows)
    }

    fn trailing_return(&self, symbol: &str, anchor: Date, horizon_days: u32) -> Option<f64> {
        self.provider
            .return_window(symbol, anchor, horizon_days)
            .and_then(finite)
    }
}

/// Non-finite values are treated as missing.
fn finite(value: f64) -> Option<f64> {
    value.is_finite().then_some(value)
}
