//! Pipeline configuration.

use chrono::NaiveDate;
use prime_align::{AlignerConfig, DuplicatePolicy};
use prime_eval::EvaluatorConfig;
use prime_rank::RankScoreConfig;
use prime_traits::{PrimeError, Result, Symbol, validate_symbol};
use serde::{Deserialize, Serialize};
use std::{collections::HashSet, fs, path::Path, path::PathBuf};

/// The default ticker universe.
pub const DEFAULT_UNIVERSE: [&str; 8] = [
    "NVDA", "AMD", "AVGO", "MRVL", "ADSK", "QCOM", "MU", "ASML",
];

/// Settings of one pipeline run.
///
/// Every field has a default, so a configuration file only needs to name the
/// settings it changes:
///
/// ```json
/// { "universe": ["NVDA", "AMD", "MU"], "top_k": 2 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Tickers to align, in tie-break order.
    pub universe: Vec<Symbol>,
    /// Tickers selected per period.
    pub top_k: usize,
    /// Short trailing return window, in calendar days.
    pub short_horizon_days: u32,
    /// Long trailing return window, in calendar days.
    pub long_horizon_days: u32,
    /// Holding window of the evaluated portfolio, in calendar days.
    pub holding_days: u32,
    /// Earliest evaluated year.
    pub min_eval_year: i32,
    /// Handling of a ticker with several rows in one period.
    pub duplicate_policy: DuplicatePolicy,
    /// Directory of the on-disk response cache; `None` disables it.
    pub cache_dir: Option<PathBuf>,
    /// First date of the requested price history.
    pub price_history_from: NaiveDate,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        let aligner = AlignerConfig::default();
        let evaluator = EvaluatorConfig::default();
        Self {
            universe: DEFAULT_UNIVERSE.iter().map(ToString::to_string).collect(),
            top_k: RankScoreConfig::default().top_k,
            short_horizon_days: aligner.short_horizon_days,
            long_horizon_days: aligner.long_horizon_days,
            holding_days: evaluator.holding_days,
            min_eval_year: evaluator.min_year,
            duplicate_policy: DuplicatePolicy::default(),
            cache_dir: Some(PathBuf::from(".prime-cache")),
            price_history_from: NaiveDate::from_ymd_opt(2005, 1, 1).unwrap_or_default(),
        }
    }
}

impl PipelineConfig {
    /// Reads a JSON configuration file, normalizes and validates it.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or parsed, or does not validate.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&raw)?;
        let config = config.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Trims and upper-cases every ticker.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for symbol in &mut self.universe {
            *symbol = symbol.trim().to_uppercase();
        }
        self
    }

    /// Checks the configuration for mistakes that would make a run meaningless.
    ///
    /// # Errors
    ///
    /// Returns [`PrimeError::InvalidSymbol`] for a blank ticker and
    /// [`PrimeError::InvalidConfig`] for an empty or duplicated universe, a
    /// zero `top_k` or a zero-length window.
    pub fn validate(&self) -> Result<()> {
        if self.universe.is_empty() {
            return Err(PrimeError::InvalidConfig("universe is empty".into()));
        }
        let mut seen = HashSet::new();
        for symbol in &self.universe {
            validate_symbol(symbol)?;
            if !seen.insert(symbol.as_str()) {
                return Err(PrimeError::InvalidConfig(format!(
                    "ticker {symbol} listed more than once"
                )));
            }
        }
        if self.top_k == 0 {
            return Err(PrimeError::InvalidConfig("top_k must be positive".into()));
        }
        for (name, days) in [
            ("short_horizon_days", self.short_horizon_days),
            ("long_horizon_days", self.long_horizon_days),
            ("holding_days", self.holding_days),
        ] {
            if days == 0 {
                return Err(PrimeError::InvalidConfig(format!("{name} must be positive")));
            }
        }
        Ok(())
    }

    /// Returns the aligner settings.
    pub const fn aligner_config(&self) -> AlignerConfig {
        AlignerConfig {
            short_horizon_days: self.short_horizon_days,
            long_horizon_days: self.long_horizon_days,
        }
    }

    /// Returns the selector settings.
    pub const fn rank_config(&self) -> RankScoreConfig {
        RankScoreConfig { top_k: self.top_k }
    }

    /// Returns the evaluator settings.
    pub const fn evaluator_config(&self) -> EvaluatorConfig {
        EvaluatorConfig {
            holding_days: self.holding_days,
            min_year: self.min_eval_year,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults() {
        let config = PipelineConfig::default();
        assert_eq!(config.universe.len(), 8);
        assert_eq!(config.universe[0], "NVDA");
        assert_eq!(config.top_k, 3);
        assert_eq!(config.short_horizon_days, 180);
        assert_eq!(config.long_horizon_days, 360);
        assert_eq!(config.holding_days, 90);
        assert_eq!(config.min_eval_year, 2013);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::LastWins);
        assert_eq!(config.price_history_from.to_string(), "2005-01-01");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_partial_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{"universe": [" nvda", "amd "], "top_k": 1, "duplicate_policy": "reject"}}"#
        )
        .unwrap();

        let config = PipelineConfig::load(file.path()).unwrap();
        assert_eq!(config.universe, vec!["NVDA", "AMD"]);
        assert_eq!(config.top_k, 1);
        assert_eq!(config.duplicate_policy, DuplicatePolicy::Reject);
        assert_eq!(config.holding_days, 90);
    }

    #[test]
    fn test_load_rejects_duplicates_after_normalization() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{"universe": ["MU", "mu"]}}"#).unwrap();
        assert!(matches!(
            PipelineConfig::load(file.path()),
            Err(PrimeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let result = PipelineConfig::load("/nonexistent/prime.json");
        assert!(matches!(result, Err(PrimeError::Io(_))));
    }

    #[test]
    fn test_validate_rejects_bad_settings() {
        let blank = PipelineConfig {
            universe: vec!["NVDA".into(), "  ".into()],
            ..Default::default()
        };
        assert!(matches!(blank.validate(), Err(PrimeError::InvalidSymbol(_))));

        let empty = PipelineConfig {
            universe: vec![],
            ..Default::default()
        };
        assert!(matches!(empty.validate(), Err(PrimeError::InvalidConfig(_))));

        let no_picks = PipelineConfig {
            top_k: 0,
            ..Default::default()
        };
        assert!(matches!(no_picks.validate(), Err(PrimeError::InvalidConfig(_))));

        let no_window = PipelineConfig {
            long_horizon_days: 0,
            ..Default::default()
        };
        assert!(matches!(no_window.validate(), Err(PrimeError::InvalidConfig(_))));
    }

    #[test]
    fn test_component_configs() {
        let config = PipelineConfig {
            short_horizon_days: 90,
            top_k: 5,
            min_eval_year: 2015,
            ..Default::default()
        };
        assert_eq!(config.aligner_config().short_horizon_days, 90);
        assert_eq!(config.rank_config().top_k, 5);
        assert_eq!(config.evaluator_config().min_year, 2015);
    }
}
