//! Portfolio evaluation for the prime workspace.
//!
//! This crate measures how the per-period selections would have performed:
//! - [`PortfolioEvaluator`]: realized return of each period's lagged portfolio
//! - [`PerformanceSummary`]: compounded return, volatility, Sharpe ratio,
//!   drawdown and hit rate over the evaluated periods
//!
//! # Example
//!
//! ```rust
//! use prime_eval::{PerformanceSummary, PortfolioEvaluator};
//! use prime_traits::{Date, PeriodKey, Selections, StaticProvider};
//!
//! let q4 = PeriodKey::new(2022, 4).unwrap();
//! let q1 = PeriodKey::new(2023, 1).unwrap();
//! let anchor = Date::from_ymd_opt(2023, 1, 31).unwrap();
//! let provider = StaticProvider::new().with_return("NVDA", anchor, 90, 0.25);
//!
//! let selections = Selections::from([(q4, vec!["NVDA".to_string()]), (q1, vec![])]);
//! let returns = PortfolioEvaluator::new(&provider).evaluate(&selections);
//! assert_eq!(returns[&q1], 0.25);
//!
//! let summary = PerformanceSummary::from_period_returns(&returns);
//! assert_eq!(summary.n_periods, 2);
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

pub mod evaluator;
pub mod summary;

// Re-export main types
pub use evaluator::{EvaluatorConfig, PortfolioEvaluator};
pub use summary::{PERIODS_PER_YEAR, PerformanceSummary};
