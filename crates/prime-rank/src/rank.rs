//! Per-metric rank tables.

use prime_traits::{Metric, PeriodSnapshot, RankOrder, Symbol};
use serde::{Deserialize, Serialize};
use std::{cmp::Ordering, collections::BTreeMap};

/// Rank tables of one period, keyed by metric.
pub type PeriodRankings = BTreeMap<Metric, RankTable>;

/// Tickers of one period ordered best-first by a single metric.
///
/// The sort is stable: tickers with equal values keep the snapshot's order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankTable {
    /// The ranked metric.
    pub metric: Metric,

    /// `(ticker, value)` pairs, rank 1 first.
    pub entries: Vec<(Symbol, f64)>,
}

impl RankTable {
    /// Ranks every ticker of `snapshot` by `metric`.
    ///
    /// # Example
    ///
    /// ```
    /// use prime_rank::RankTable;
    /// use prime_traits::{Metric, MetricSnapshot, PeriodSnapshot};
    ///
    /// let pe = |pe_ratio| MetricSnapshot { pe_ratio, ..MetricSnapshot::default() };
    /// let snapshot: PeriodSnapshot = [("A", pe(10.0)), ("B", pe(0.0)), ("C", pe(5.0))]
    ///     .into_iter()
    ///     .collect();
    ///
    /// let table = RankTable::build(Metric::PeRatio, &snapshot);
    /// assert_eq!(table.symbols(), vec!["C", "A", "B"]);
    /// ```
    pub fn build(metric: Metric, snapshot: &PeriodSnapshot) -> Self {
        let mut entries: Vec<(Symbol, f64)> = snapshot
            .iter()
            .map(|(symbol, metrics)| (symbol.to_string(), metrics.get(metric)))
            .collect();
        let order = metric.order();
        entries.sort_by(|(_, a), (_, b)| compare(order, *a, *b));
        Self { metric, entries }
    }

    /// Returns the number of ranked tickers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the tickers in rank order.
    pub fn symbols(&self) -> Vec<&str> {
        self.entries.iter().map(|(s, _)| s.as_str()).collect()
    }

    /// Returns the 1-indexed rank of `symbol`.
    pub fn rank_of(&self, symbol: &str) -> Option<usize> {
        self.entries
            .iter()
            .position(|(s, _)| s == symbol)
            .map(|i| i + 1)
    }

    /// Weighted score of the ticker at 1-indexed `rank`: `(N - rank + 1) * weight`.
    pub fn score_at(&self, rank: usize) -> f64 {
        let n = self.entries.len();
        if rank == 0 || rank > n {
            return 0.0;
        }
        (n - rank + 1) as f64 * self.metric.weight()
    }

    /// Iterates over `(ticker, weighted score)` in rank order.
    pub fn scores(&self) -> impl Iterator<Item = (&str, f64)> + '_ {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, (s, _))| (s.as_str(), self.score_at(i + 1)))
    }
}

fn compare(order: RankOrder, a: f64, b: f64) -> Ordering {
    match order {
        RankOrder::Descending => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        RankOrder::AscendingZeroLast => (a == 0.0)
            .cmp(&(b == 0.0))
            .then_with(|| a.partial_cmp(&b).unwrap_or(Ordering::Equal)),
    }
}

/// Builds the rank table of every metric for one period.
pub fn rank_period(snapshot: &PeriodSnapshot) -> PeriodRankings {
    Metric::ALL
        .into_iter()
        .map(|metric| (metric, RankTable::build(metric, snapshot)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use prime_traits::MetricSnapshot;

    fn snapshot_of(values: &[(&str, f64)], metric: Metric) -> PeriodSnapshot {
        values
            .iter()
            .map(|&(symbol, v)| {
                let mut m = MetricSnapshot::default();
                match metric {
                    Metric::ReportedEps => m.reported_eps = v,
                    Metric::PeRatio => m.pe_ratio = v,
                    Metric::QuarterlyReturn6m => m.quarterly_return_6m = v,
                    Metric::QuarterlyReturn1y => m.quarterly_return_1y = v,
                    Metric::YoyReturn => m.yoy_return = v,
                }
                (symbol, m)
            })
            .collect()
    }

    #[test]
    fn test_pe_zero_sorts_last() {
        let snapshot = snapshot_of(&[("A", 10.0), ("B", 0.0), ("C", 5.0)], Metric::PeRatio);
        let table = RankTable::build(Metric::PeRatio, &snapshot);
        assert_eq!(
            table.entries,
            vec![
                ("C".to_string(), 5.0),
                ("A".to_string(), 10.0),
                ("B".to_string(), 0.0)
            ]
        );
    }

    #[test]
    fn test_negative_pe_ranks_before_positive() {
        let snapshot = snapshot_of(&[("A", 12.0), ("B", -40.0), ("C", 0.0)], Metric::PeRatio);
        let table = RankTable::build(Metric::PeRatio, &snapshot);
        assert_eq!(table.symbols(), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_other_metrics_descend() {
        let snapshot = snapshot_of(
            &[("A", 0.1), ("B", 0.4), ("C", -0.2)],
            Metric::QuarterlyReturn6m,
        );
        let table = RankTable::build(Metric::QuarterlyReturn6m, &snapshot);
        assert_eq!(table.symbols(), vec!["B", "A", "C"]);
    }

    #[test]
    fn test_ties_keep_snapshot_order() {
        let snapshot = snapshot_of(
            &[("X", 1.0), ("Y", 2.0), ("Z", 1.0), ("W", 1.0)],
            Metric::ReportedEps,
        );
        let table = RankTable::build(Metric::ReportedEps, &snapshot);
        assert_eq!(table.symbols(), vec!["Y", "X", "Z", "W"]);
    }

    #[test]
    fn test_full_weight_scores() {
        let snapshot = snapshot_of(&[("A", 3.0), ("B", 2.0), ("C", 1.0)], Metric::ReportedEps);
        let table = RankTable::build(Metric::ReportedEps, &snapshot);
        let scores: Vec<f64> = table.scores().map(|(_, s)| s).collect();
        assert_eq!(scores, vec![3.0, 2.0, 1.0]);
    }

    #[test]
    fn test_half_weight_scores() {
        for metric in [Metric::PeRatio, Metric::YoyReturn] {
            let snapshot = snapshot_of(&[("A", 1.0), ("B", 2.0), ("C", 3.0)], metric);
            let table = RankTable::build(metric, &snapshot);
            let scores: Vec<f64> = table.scores().map(|(_, s)| s).collect();
            assert_relative_eq!(scores[0], 1.5);
            assert_relative_eq!(scores[1], 1.0);
            assert_relative_eq!(scores[2], 0.5);
        }
    }

    #[test]
    fn test_rank_of_and_out_of_range_score() {
        let snapshot = snapshot_of(&[("A", 3.0), ("B", 2.0)], Metric::ReportedEps);
        let table = RankTable::build(Metric::ReportedEps, &snapshot);
        assert_eq!(table.rank_of("B"), Some(2));
        assert_eq!(table.rank_of("Q"), None);
        assert_eq!(table.score_at(0), 0.0);
        assert_eq!(table.score_at(3), 0.0);
    }

    #[test]
    fn test_rank_period_covers_all_metrics() {
        let snapshot = snapshot_of(&[("A", 1.0), ("B", 2.0)], Metric::ReportedEps);
        let rankings = rank_period(&snapshot);
        assert_eq!(rankings.len(), Metric::ALL.len());
        assert!(rankings.values().all(|t| t.len() == 2));
    }

    #[test]
    fn test_empty_snapshot() {
        let table = RankTable::build(Metric::ReportedEps, &PeriodSnapshot::new());
        assert!(table.is_empty());
        assert_eq!(table.scores().count(), 0);
    }
}
