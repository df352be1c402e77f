//! Lagged portfolio evaluation.

use prime_traits::{MetricProvider, PeriodKey, Selections};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Configuration for the portfolio evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvaluatorConfig {
    /// Length of the holding window in calendar days (default: 90)
    pub holding_days: u32,
    /// Earliest year evaluated; earlier periods are skipped (default: 2013)
    pub min_year: i32,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            holding_days: 90,
            min_year: 2013,
        }
    }
}

/// Realized return of each period's portfolio, chosen one period earlier.
///
/// The portfolio held in period `P` is the selection made in `P.previous()`.
/// Each held ticker contributes its compounded return over the
/// `holding_days` window ending at `P`'s period-end date, and the period
/// return is the plain sum of those contributions.
#[derive(Debug, Clone)]
pub struct PortfolioEvaluator<P> {
    provider: P,
    config: EvaluatorConfig,
}

impl<P: MetricProvider> PortfolioEvaluator<P> {
    /// Creates an evaluator with the default configuration.
    pub fn new(provider: P) -> Self {
        Self::with_config(provider, EvaluatorConfig::default())
    }

    /// Creates an evaluator with the given configuration.
    pub const fn with_config(provider: P, config: EvaluatorConfig) -> Self {
        Self { provider, config }
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &EvaluatorConfig {
        &self.config
    }

    /// Evaluates every period of `selections` from `min_year` on.
    ///
    /// A period whose predecessor has no selection returns 0.
    pub fn evaluate(&self, selections: &Selections) -> BTreeMap<PeriodKey, f64> {
        selections
            .keys()
            .filter(|period| period.year() >= self.config.min_year)
            .map(|&period| (period, self.period_return(period, selections)))
            .collect()
    }

    /// Realized return of the portfolio held during `period`.
    pub fn period_return(&self, period: PeriodKey, selections: &Selections) -> f64 {
        let Some(held) = selections.get(&period.previous()) else {
            debug!(%period, "no prior selection");
            return 0.0;
        };
        let Some(anchor) = period.period_end() else {
            warn!(%period, "period has no calendar end date");
            return 0.0;
        };

        let total: f64 = held
            .iter()
            .map(|symbol| {
                self.provider
                    .return_window(symbol, anchor, self.config.holding_days)
                    .filter(|r| r.is_finite())
                    .unwrap_or_else(|| {
                        warn!(
                            %period,
                            symbol = %symbol,
                            %anchor,
                            "holding return unavailable, counting 0"
                        );
                        0.0
                    })
            })
            .sum();
        debug!(%period, held = ?held, total, "evaluated period");
        total
    }
}
