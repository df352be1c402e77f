#![doc(issue_tracker_base_url = "https://github.com/factordynamics/prime/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! # prime
//!
//! Point-in-time fundamentals ranking and stock selection.
//!
//! prime is an umbrella crate that re-exports the prime sub-crates and adds
//! the end-to-end [`PrimeModel`] on top of them.
//!
//! ## Quick Start
//!
//! ```no_run
//! use prime::fmp::{FileCache, FmpProvider};
//! use prime::{CachedReturns, PipelineConfig, PrimeModel};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PipelineConfig::default();
//! let provider = CachedReturns::new(
//!     FmpProvider::from_env(FileCache::new(".prime-cache")?)?,
//!     FileCache::new(".prime-cache")?,
//! );
//! let model = PrimeModel::new(provider, config)?;
//!
//! let cross_section = model.compose_stock_data_by_period()?;
//! let selections = model.select_stocks(&cross_section)?;
//! let returns = model.evaluate_portfolio(&selections);
//! # let _ = returns;
//! # Ok(())
//! # }
//! ```
//!
//! ## Crate Organization
//!
//! - [`traits`] - Shared types and the [`MetricProvider`] and [`Cache`] capabilities
//! - [`align`] - Temporal alignment and per-period aggregation
//! - [`rank`] - Per-metric rank tables, score boards and selectors
//! - [`eval`] - Lagged portfolio evaluation and performance summaries
//! - [`fmp`] - Financial Modeling Prep data provider
//! - [`export`] - JSON and CSV persistence of pipeline outputs
//!
//! ## Pipeline
//!
//! 1. **Align** every ticker's EPS, P/E, trailing returns and revenue growth
//!    onto its EPS report dates
//! 2. **Aggregate** the aligned rows into calendar quarters
//! 3. **Rank** each metric within each quarter and sum the weighted scores
//! 4. **Select** the top-scoring tickers per quarter
//! 5. **Evaluate** each quarter's holdings, chosen one quarter earlier

/// Version information for the prime crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

mod config;
pub mod export;
mod pipeline;

pub use config::{DEFAULT_UNIVERSE, PipelineConfig};
pub use pipeline::PrimeModel;

// ============================================================================
// Core Types
// ============================================================================

/// Shared types and capabilities.
///
/// # Example
///
/// ```
/// use prime::traits::{PeriodKey, Date};
///
/// let date = Date::from_ymd_opt(2023, 5, 24).unwrap();
/// assert_eq!(PeriodKey::from_date(date).to_string(), "2023_q2");
/// ```
pub mod traits {
    pub use prime_traits::*;
}

pub use prime_traits::{
    AlignedRow, Cache, CachedReturns, CrossSection, Date, MemoryCache, Metric, MetricProvider,
    MetricSnapshot, PeriodKey, PeriodSnapshot, PrimeError, Result, Selections, Symbol,
};

// ============================================================================
// Alignment
// ============================================================================

/// Temporal alignment and per-period aggregation.
pub mod align {
    pub use prime_align::*;
}

pub use prime_align::{DuplicatePolicy, TemporalAligner};

// ============================================================================
// Ranking and Selection
// ============================================================================

/// Rank tables, score boards and selectors.
///
/// Within a period of `N` tickers, the ticker at rank `r` of a metric earns
/// `(N - r + 1) * weight`, where the weight is 0.5 for P/E and revenue growth
/// and 1 otherwise. The [`rank::RankScoreSelector`] keeps the tickers with the
/// highest total.
pub mod rank {
    pub use prime_rank::*;
}

pub use prime_rank::Selector;

// ============================================================================
// Evaluation
// ============================================================================

/// Lagged portfolio evaluation.
///
/// ```text
/// R(P) = sum over s in selections[P - 1] of return(s, [end(P) - 90d, end(P)))
/// ```
pub mod eval {
    pub use prime_eval::*;
}

// ============================================================================
// Data Providers
// ============================================================================

/// Financial Modeling Prep (FMP) data provider.
///
/// ## Setup
///
/// 1. Get an API key at <https://financialmodelingprep.com/>
/// 2. Set the `FMP_API_KEY` environment variable or add it to a `.env` file
pub mod fmp {
    pub use prime_fmp::*;
}

// ============================================================================
// Prelude
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```
/// use prime::prelude::*;
/// ```
pub mod prelude {
    pub use crate::{
        CrossSection, MetricProvider, PeriodKey, PipelineConfig, PrimeError, PrimeModel, Result,
        Selections, Selector,
    };
}

// ============================================================================
// Tests
// ============================================================================
