//! Financial Modeling Prep (FMP) data source for prime.
//!
//! This crate provides an async client for the
//! [Financial Modeling Prep](https://financialmodelingprep.com/) API, an
//! on-disk [`FileCache`], and [`FmpProvider`], which implements
//! [`prime_traits::MetricProvider`] on top of both.
//!
//! # Usage
//!
//! ```rust,no_run
//! use prime_fmp::{FileCache, FmpProvider};
//! use prime_traits::MetricProvider;
//!
//! let cache = FileCache::new(".prime-cache")?;
//! let provider = FmpProvider::from_env(cache)?;
//!
//! let eps = provider.eps_series("NVDA");
//! println!("{} earnings reports", eps.len());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Environment Variables
//!
//! Set `FMP_API_KEY` in your environment or `.env` file:
//!
//! ```bash
//! FMP_API_KEY=your_api_key_here
//! ```

mod cache;
mod client;
mod error;
mod provider;
mod types;

pub use cache::FileCache;
pub use client::FmpClient;
pub use error::FmpError;
pub use provider::{DEFAULT_PRICE_HISTORY_FROM, FmpProvider};
pub use types::*;

/// Result type for FMP operations.
pub type Result<T> = std::result::Result<T, FmpError>;
