//! Error types for the prime workspace.
//!
//! Provider failures and missing data are deliberately *not* represented here:
//! they surface as absent rows rather than errors. What remains are the hard
//! failures: bad input, bad configuration, explicit period conflicts and I/O.

use crate::{Date, PeriodKey};
use thiserror::Error;

/// The main error type for prime operations.
#[derive(Debug, Error)]
pub enum PrimeError {
    /// A ticker symbol was empty or blank.
    #[error("Invalid symbol: {0:?}")]
    InvalidSymbol(String),

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A period label could not be parsed.
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    /// Two aligned rows of one ticker fell into the same period.
    #[error("Period conflict for {symbol} in {period}: rows dated {first} and {second}")]
    PeriodConflict {
        /// The period both rows map to.
        period: PeriodKey,
        /// The ticker with duplicate rows.
        symbol: String,
        /// Date of the row seen first.
        first: Date,
        /// Date of the row seen second.
        second: Date,
    },

    /// Filesystem error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error from Polars operations.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),
}

impl From<String> for PrimeError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for PrimeError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

/// A specialized Result type for prime operations.
pub type Result<T> = std::result::Result<T, PrimeError>;
