//! Accumulation of rank scores into per-ticker totals.

use crate::rank::PeriodRankings;
use ndarray::Array1;
use prime_traits::{PeriodSnapshot, Symbol};
use std::cmp::Ordering;

/// Total rank score of every ticker in one period.
///
/// Tickers are held in snapshot order, so [`ScoreBoard::ranked`] can break
/// ties by that order with a stable sort.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreBoard {
    symbols: Vec<Symbol>,
    totals: Array1<f64>,
}

impl ScoreBoard {
    /// Sums the weighted scores of every rank table for the tickers of `snapshot`.
    ///
    /// Tickers absent from the snapshot are ignored.
    pub fn from_rankings(snapshot: &PeriodSnapshot, rankings: &PeriodRankings) -> Self {
        let symbols: Vec<Symbol> = snapshot.symbols().into_iter().map(String::from).collect();
        let mut totals = Array1::zeros(symbols.len());
        for table in rankings.values() {
            for (symbol, score) in table.scores() {
                if let Some(i) = symbols.iter().position(|s| s == symbol) {
                    totals[i] += score;
                }
            }
        }
        Self { symbols, totals }
    }

    /// Returns the number of tickers.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns whether the board is empty.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Returns the total score of `symbol`.
    pub fn total(&self, symbol: &str) -> Option<f64> {
        self.symbols
            .iter()
            .position(|s| s == symbol)
            .map(|i| self.totals[i])
    }

    /// Returns `(ticker, total)` sorted by total descending, ties in snapshot order.
    pub fn ranked(&self) -> Vec<(&str, f64)> {
        let mut ranked: Vec<(&str, f64)> = self
            .symbols
            .iter()
            .map(String::as_str)
            .zip(self.totals.iter().copied())
            .collect();
        ranked.sort_by(|(_, a), (_, b)| b.partial_cmp(a).unwrap_or(Ordering::Equal));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rank::rank_period;
    use approx::assert_relative_eq;
    use prime_traits::MetricSnapshot;

    fn snap(eps: f64, pe: f64, r6: f64, r1: f64, yoy: f64) -> MetricSnapshot {
        MetricSnapshot {
            reported_eps: eps,
            pe_ratio: pe,
            quarterly_return_6m: r6,
            quarterly_return_1y: r1,
            yoy_return: yoy,
        }
    }

    #[test]
    fn test_totals_sum_weighted_scores() {
        // A best on everything, C worst on everything
        let snapshot: PeriodSnapshot = [
            ("A", snap(3.0, 5.0, 0.3, 0.3, 0.3)),
            ("B", snap(2.0, 10.0, 0.2, 0.2, 0.2)),
            ("C", snap(1.0, 0.0, 0.1, 0.1, 0.1)),
        ]
        .into_iter()
        .collect();
        let board = ScoreBoard::from_rankings(&snapshot, &rank_period(&snapshot));

        // 3 full-weight metrics + 2 half-weight metrics
        assert_relative_eq!(board.total("A").unwrap(), 3.0 * 3.0 + 2.0 * 1.5);
        assert_relative_eq!(board.total("B").unwrap(), 3.0 * 2.0 + 2.0 * 1.0);
        assert_relative_eq!(board.total("C").unwrap(), 3.0 * 1.0 + 2.0 * 0.5);
        assert_eq!(board.total("Z"), None);
    }

    #[test]
    fn test_equal_totals_keep_snapshot_order() {
        // X wins eps and 1y return, Y wins 6m return, P/E and growth: both total 6.0
        let x = snap(2.0, 20.0, 0.1, 0.5, 0.1);
        let y = snap(1.0, 10.0, 0.3, 0.2, 0.4);
        for (first, second) in [(("X", x), ("Y", y)), (("Y", y), ("X", x))] {
            let snapshot: PeriodSnapshot = [first, second].into_iter().collect();
            let board = ScoreBoard::from_rankings(&snapshot, &rank_period(&snapshot));
            assert_relative_eq!(board.total("X").unwrap(), 6.0);
            assert_relative_eq!(board.total("Y").unwrap(), 6.0);
            let order: Vec<&str> = board.ranked().into_iter().map(|(s, _)| s).collect();
            assert_eq!(order, vec![first.0, second.0]);
        }
    }

    #[test]
    fn test_empty_board() {
        let snapshot = PeriodSnapshot::new();
        let board = ScoreBoard::from_rankings(&snapshot, &rank_period(&snapshot));
        assert!(board.is_empty());
        assert!(board.ranked().is_empty());
    }
}
