//! Performance statistics over evaluated period returns.

use ndarray::Array1;
use prime_traits::PeriodKey;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Evaluation periods per year, used to annualize the Sharpe ratio.
pub const PERIODS_PER_YEAR: usize = 4;

/// Summary statistics of a sequence of period returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Number of evaluated periods
    pub n_periods: usize,
    /// Compounded return over all periods
    pub total_return: f64,
    /// Compounded return after each period
    pub cumulative_returns: Vec<f64>,
    /// Arithmetic mean period return
    pub mean_return: f64,
    /// Sample standard deviation of period returns
    pub volatility: f64,
    /// Sharpe ratio (annualized, zero risk-free rate)
    pub sharpe_ratio: f64,
    /// Maximum drawdown of the cumulative curve
    pub max_drawdown: f64,
    /// Share of periods with a positive return
    pub hit_rate: f64,
}

impl PerformanceSummary {
    /// Summarizes period returns in chronological order.
    pub fn from_period_returns(returns: &BTreeMap<PeriodKey, f64>) -> Self {
        Self::from_returns(returns.values().copied())
    }

    /// Summarizes a chronological sequence of period returns.
    ///
    /// Non-finite returns are ignored.
    pub fn from_returns(returns: impl IntoIterator<Item = f64>) -> Self {
        let returns: Array1<f64> = returns.into_iter().filter(|r| r.is_finite()).collect();
        let n_periods = returns.len();

        let mut cumulative_returns = Vec::with_capacity(n_periods);
        let mut cum_ret = 0.0;
        for &r in &returns {
            cum_ret = (1.0 + cum_ret) * (1.0 + r) - 1.0;
            cumulative_returns.push(cum_ret);
        }

        let mean_return = returns.mean().unwrap_or(f64::NAN);
        let volatility = if n_periods < 2 {
            f64::NAN
        } else {
            returns.std(1.0)
        };
        let hit_rate = if n_periods == 0 {
            f64::NAN
        } else {
            returns.iter().filter(|&&r| r > 0.0).count() as f64 / n_periods as f64
        };

        Self {
            n_periods,
            total_return: cum_ret,
            max_drawdown: max_drawdown(&cumulative_returns),
            cumulative_returns,
            mean_return,
            volatility,
            sharpe_ratio: sharpe(mean_return, volatility, n_periods),
            hit_rate,
        }
    }
}

fn sharpe(mean: f64, std: f64, n: usize) -> f64 {
    if n < 2 || std == 0.0 || !std.is_finite() {
        return f64::NAN;
    }
    mean / std * (PERIODS_PER_YEAR as f64).sqrt()
}

/// Largest peak-to-trough decline of a cumulative return curve, relative to `1 + peak`.
fn max_drawdown(cumulative_returns: &[f64]) -> f64 {
    let mut max_dd = 0.0;
    let mut peak = 0.0;

    for &cum_ret in cumulative_returns {
        if cum_ret > peak {
            peak = cum_ret;
        }
        let dd = (peak - cum_ret) / (1.0 + peak);
        if dd > max_dd {
            max_dd = dd;
        }
    }

    max_dd
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_compounds_total_return() {
        let summary = PerformanceSummary::from_returns([0.1, -0.1, 0.2]);
        assert_eq!(summary.n_periods, 3);
        assert_relative_eq!(summary.total_return, 1.1 * 0.9 * 1.2 - 1.0, epsilon = 1e-12);
        assert_relative_eq!(summary.cumulative_returns[0], 0.1, epsilon = 1e-12);
        assert_relative_eq!(summary.mean_return, 0.2 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(summary.hit_rate, 2.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_sharpe_annualizes_by_quarters() {
        let summary = PerformanceSummary::from_returns([0.02, 0.04]);
        let std = (2.0_f64 * 0.01_f64.powi(2)).sqrt();
        assert_relative_eq!(summary.volatility, std, epsilon = 1e-12);
        assert_relative_eq!(summary.sharpe_ratio, 0.03 / std * 2.0, epsilon = 1e-9);
    }

    #[test]
    fn test_max_drawdown_relative_to_peak() {
        let summary = PerformanceSummary::from_returns([0.5, -0.2]);
        // peak 1.5 -> trough 1.2
        assert_relative_eq!(summary.max_drawdown, 0.3 / 1.5, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_inputs() {
        let empty = PerformanceSummary::from_returns([]);
        assert_eq!(empty.n_periods, 0);
        assert_eq!(empty.total_return, 0.0);
        assert!(empty.sharpe_ratio.is_nan());
        assert_eq!(empty.max_drawdown, 0.0);

        let flat = PerformanceSummary::from_returns([0.01, 0.01, f64::NAN]);
        assert_eq!(flat.n_periods, 2);
        assert!(flat.sharpe_ratio.is_nan());
    }

    #[test]
    fn test_from_period_returns_uses_chronological_order() {
        let returns = BTreeMap::from([
            (PeriodKey::new(2014, 1).unwrap(), -0.5),
            (PeriodKey::new(2013, 4).unwrap(), 1.0),
        ]);
        let summary = PerformanceSummary::from_period_returns(&returns);
        assert_relative_eq!(summary.cumulative_returns[0], 1.0);
        assert_relative_eq!(summary.max_drawdown, 0.5, epsilon = 1e-12);
    }
}
