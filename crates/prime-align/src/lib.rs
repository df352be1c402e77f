//! Point-in-time alignment for the prime workspace.
//!
//! This crate turns a ticker's irregular fundamental series into rows that
//! only use information available on each row's date, and groups those rows
//! into a per-quarter cross-section:
//! - [`TemporalAligner`]: joins EPS, P/E, trailing returns and as-of revenue growth
//! - [`yoy_growth`]: year-over-year growth of consecutive annual revenue
//! - [`PeriodAggregator`]: reshapes aligned rows into a [`prime_traits::CrossSection`]
//!
//! # Example
//!
//! ```
//! use prime_align::{DuplicatePolicy, PeriodAggregator, TemporalAligner};
//! use prime_traits::StaticProvider;
//!
//! let provider = StaticProvider::new();
//! let aligner = TemporalAligner::new(&provider);
//! let aggregation = PeriodAggregator::new(DuplicatePolicy::LastWins)
//!     .aggregate(&aligner, ["NVDA", "AMD"])
//!     .unwrap();
//!
//! assert!(aggregation.cross_section.is_empty());
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

mod aggregate;
mod aligner;
mod growth;

// Re-export main types
pub use aggregate::{Aggregation, DuplicatePolicy, PeriodAggregator, PeriodConflict};
pub use aligner::{AlignerConfig, TemporalAligner};
pub use growth::yoy_growth;
