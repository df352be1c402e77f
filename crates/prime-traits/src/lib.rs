#![doc(issue_tracker_base_url = "https://github.com/factordynamics/prime/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Core types and capability traits for the prime workspace.
//!
//! This crate holds the vocabulary shared by every stage of the pipeline:
//! irregular fundamental event series, the per-ticker aligned rows, the
//! per-quarter cross-section, and the two capabilities the core consumes
//! from the outside world ([`MetricProvider`] and [`Cache`]).

/// The version of the prime-traits crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Module declarations
pub mod cache;
pub mod cross_section;
pub mod error;
pub mod metrics;
pub mod period;
pub mod provider;
pub mod returns;
pub mod types;

// Re-exports
pub use cache::{Cache, MemoryCache};
pub use cross_section::{CrossSection, PeriodSnapshot, Selections};
pub use error::{PrimeError, Result};
pub use metrics::{AlignedRow, Metric, MetricSnapshot, RankOrder};
pub use period::PeriodKey;
pub use provider::{CachedReturns, MetricProvider, ReturnWindowKey, StaticProvider};
pub use returns::{PriceHistory, PricePoint};
pub use types::{Date, EventSeries, Observation, Symbol, validate_symbol};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.contains('.'));
    }
}
