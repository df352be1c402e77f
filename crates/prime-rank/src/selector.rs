//! Portfolio selection strategies.

use crate::{rank::rank_period, score::ScoreBoard};
use prime_traits::{CrossSection, PeriodSnapshot, PrimeError, Result, Selections, Symbol};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Picks the portfolio of one period from its cross-sectional snapshot.
///
/// Implementations must be deterministic: the same snapshot, in the same
/// ticker order, yields the same selection.
pub trait Selector: Send + Sync {
    /// Returns the selected tickers, best first.
    ///
    /// # Errors
    ///
    /// Returns an error if the selector is misconfigured.
    fn select(&self, snapshot: &PeriodSnapshot) -> Result<Vec<Symbol>>;

    /// Name of this selection strategy.
    fn name(&self) -> &str;

    /// Selects a portfolio for every period of `cross_section`.
    ///
    /// # Errors
    ///
    /// Propagates the first error of [`Selector::select`].
    fn select_all(&self, cross_section: &CrossSection) -> Result<Selections> {
        cross_section
            .iter()
            .map(|(period, snapshot)| {
                let picks = self.select(snapshot)?;
                debug!(%period, selector = self.name(), picks = ?picks, "selected portfolio");
                Ok((*period, picks))
            })
            .collect()
    }
}

/// Configuration for [`RankScoreSelector`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankScoreConfig {
    /// Number of tickers held per period (default: 3)
    pub top_k: usize,
}

impl Default for RankScoreConfig {
    fn default() -> Self {
        Self { top_k: 3 }
    }
}

/// Selects the tickers with the highest summed rank score.
///
/// Every metric is ranked across the period's tickers, ranks become scores
/// (`N - rank + 1`, halved for P/E and revenue growth), and the `top_k`
/// tickers by total score are held. Equal totals keep snapshot order.
///
/// # Example
///
/// ```
/// use prime_rank::{RankScoreSelector, Selector};
/// use prime_traits::{MetricSnapshot, PeriodSnapshot};
///
/// let eps = |reported_eps| MetricSnapshot {
///     reported_eps,
///     pe_ratio: 10.0,
///     ..MetricSnapshot::default()
/// };
/// let snapshot: PeriodSnapshot = [("NVDA", eps(1.1)), ("AMD", eps(0.6))].into_iter().collect();
///
/// let picks = RankScoreSelector::default().select(&snapshot).unwrap();
/// assert_eq!(picks, vec!["NVDA", "AMD"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RankScoreSelector {
    config: RankScoreConfig,
}

impl RankScoreSelector {
    /// Creates a selector with the given configuration.
    pub const fn new(config: RankScoreConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &RankScoreConfig {
        &self.config
    }

    /// Scores every ticker of `snapshot`.
    pub fn score_board(&self, snapshot: &PeriodSnapshot) -> ScoreBoard {
        ScoreBoard::from_rankings(snapshot, &rank_period(snapshot))
    }
}

impl Selector for RankScoreSelector {
    fn select(&self, snapshot: &PeriodSnapshot) -> Result<Vec<Symbol>> {
        if self.config.top_k == 0 {
            return Err(PrimeError::InvalidConfig("top_k must be positive".into()));
        }
        Ok(self
            .score_board(snapshot)
            .ranked()
            .into_iter()
            .take(self.config.top_k)
            .map(|(symbol, _)| symbol.to_string())
            .collect())
    }

    fn name(&self) -> &str {
        "rank_score"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prime_traits::{MetricSnapshot, PeriodKey};

    fn snap(eps: f64, pe: f64, r6: f64) -> MetricSnapshot {
        MetricSnapshot {
            reported_eps: eps,
            pe_ratio: pe,
            quarterly_return_6m: r6,
            quarterly_return_1y: r6,
            yoy_return: 0.1,
        }
    }

    fn five() -> PeriodSnapshot {
        [
            ("NVDA", snap(1.09, 150.0, 0.9)),
            ("AMD", snap(0.58, 0.0, 0.4)),
            ("AVGO", snap(10.3, 25.0, 0.5)),
            ("MU", snap(-1.43, -45.0, 0.3)),
            ("QCOM", snap(1.87, 12.0, 0.0)),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_selects_top_three() {
        let picks = RankScoreSelector::default().select(&five()).unwrap();
        assert_eq!(picks.len(), 3);

        let board = RankScoreSelector::default().score_board(&five());
        let expected: Vec<&str> = board.ranked().into_iter().take(3).map(|(s, _)| s).collect();
        assert_eq!(picks, expected);
        assert_eq!(picks, vec!["NVDA", "AVGO", "AMD"]);
    }

    #[test]
    fn test_fewer_tickers_than_top_k_selects_all() {
        let snapshot: PeriodSnapshot =
            [("NVDA", snap(1.0, 10.0, 0.1)), ("AMD", snap(2.0, 5.0, 0.2))]
                .into_iter()
                .collect();
        let picks = RankScoreSelector::default().select(&snapshot).unwrap();
        assert_eq!(picks, vec!["AMD", "NVDA"]);
    }

    #[test]
    fn test_custom_top_k() {
        let selector = RankScoreSelector::new(RankScoreConfig { top_k: 1 });
        assert_eq!(selector.select(&five()).unwrap(), vec!["NVDA"]);
    }

    #[test]
    fn test_zero_top_k_is_rejected() {
        let selector = RankScoreSelector::new(RankScoreConfig { top_k: 0 });
        assert!(matches!(
            selector.select(&five()),
            Err(PrimeError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_select_all_covers_every_period() {
        let mut cs = CrossSection::new();
        let q1 = PeriodKey::new(2023, 1).unwrap();
        let q2 = PeriodKey::new(2023, 2).unwrap();
        cs.insert(q1, "NVDA", snap(1.0, 10.0, 0.1));
        cs.insert(q2, "AMD", snap(1.0, 10.0, 0.1));
        cs.insert(q2, "MU", snap(2.0, 5.0, 0.2));

        let selections = RankScoreSelector::default().select_all(&cs).unwrap();
        assert_eq!(selections.len(), 2);
        assert_eq!(selections[&q1], vec!["NVDA"]);
        assert_eq!(selections[&q2], vec!["MU", "AMD"]);
    }

    #[test]
    fn test_selection_is_deterministic() {
        let selector = RankScoreSelector::default();
        let first = selector.select(&five()).unwrap();
        for _ in 0..5 {
            assert_eq!(selector.select(&five()).unwrap(), first);
        }
    }
}
