//! Ranking and selection for the prime workspace.
//!
//! Each period is handled independently and without state:
//! 1. every metric is ranked across the period's tickers ([`RankTable`])
//! 2. ranks become scores, summed per ticker ([`ScoreBoard`])
//! 3. a [`Selector`] keeps the best tickers
//!
//! # Examples
//!
//! ```rust
//! use prime_rank::{RankScoreSelector, Selector, rank_period};
//! use prime_traits::{Metric, MetricSnapshot, PeriodSnapshot};
//!
//! let pe = |pe_ratio| MetricSnapshot { pe_ratio, ..MetricSnapshot::default() };
//! let snapshot: PeriodSnapshot = [("A", pe(10.0)), ("B", pe(0.0)), ("C", pe(5.0))]
//!     .into_iter()
//!     .collect();
//!
//! let rankings = rank_period(&snapshot);
//! assert_eq!(rankings[&Metric::PeRatio].symbols(), vec!["C", "A", "B"]);
//!
//! let picks = RankScoreSelector::default().select(&snapshot).unwrap();
//! assert_eq!(picks.len(), 3);
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod rank;
mod score;
mod selector;

// Re-export main types
pub use rank::{PeriodRankings, RankTable, rank_period};
pub use score::ScoreBoard;
pub use selector::{RankScoreConfig, RankScoreSelector, Selector};
