//! Error types for the FMP provider.

use thiserror::Error;

/// Errors that can occur when talking to the FMP API.
#[derive(Debug, Error)]
pub enum FmpError {
    /// Missing API key.
    #[error("FMP_API_KEY environment variable not set")]
    MissingApiKey,

    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// JSON parsing failed.
    #[error("Failed to parse JSON response: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned an error.
    #[error("FMP API error: {0}")]
    Api(String),

    /// Rate limit exceeded.
    #[error("Rate limit exceeded. Free tier allows 250 requests/day.")]
    RateLimitExceeded,

    /// A `.env` file exists but could not be read.
    #[error("Environment error: {0}")]
    Env(#[from] dotenvy::Error),

    /// The blocking runtime could not be started.
    #[error("Failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(
            FmpError::MissingApiKey.to_string(),
            "FMP_API_KEY environment variable not set"
        );
        assert_eq!(
            FmpError::RateLimitExceeded.to_string(),
            "Rate limit exceeded. Free tier allows 250 requests/day."
        );
    }
}
