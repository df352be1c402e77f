//! Reshaping aligned per-ticker rows into a per-quarter cross-section.

use crate::aligner::TemporalAligner;
use prime_traits::{
    AlignedRow, CrossSection, Date, MetricProvider, PeriodKey, PrimeError, Result, Symbol,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, info, warn};

/// What to do when a ticker has more than one aligned row in the same period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// The later-dated row replaces the earlier one; the overwrite is reported.
    #[default]
    LastWins,
    /// The first duplicate aborts aggregation with [`PrimeError::PeriodConflict`].
    Reject,
}

/// A ticker row that replaced an earlier row of the same period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodConflict {
    /// Period both rows fall in.
    pub period: PeriodKey,
    /// Ticker symbol.
    pub symbol: Symbol,
    /// Date of the overwritten row.
    pub replaced: Date,
    /// Date of the row kept in the cross-section.
    pub kept: Date,
}

/// Output of [`PeriodAggregator`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    /// Per-period ticker snapshots.
    pub cross_section: CrossSection,
    /// Overwrites performed under [`DuplicatePolicy::LastWins`], in encounter order.
    pub conflicts: Vec<PeriodConflict>,
}

/// Groups aligned rows by calendar quarter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeriodAggregator {
    policy: DuplicatePolicy,
}

impl PeriodAggregator {
    /// Creates an aggregator with the given duplicate policy.
    pub const fn new(policy: DuplicatePolicy) -> Self {
        Self { policy }
    }

    /// Returns the duplicate policy.
    pub const fn policy(&self) -> DuplicatePolicy {
        self.policy
    }

    /// Aligns every ticker and groups the rows by period.
    ///
    /// Tickers are processed in the given order, which becomes the tie-break
    /// order of every period snapshot.
    ///
    /// # Errors
    ///
    /// Fails on a blank ticker, or on a duplicate row under [`DuplicatePolicy::Reject`].
    pub fn aggregate<P, I, S>(
        &self,
        aligner: &TemporalAligner<P>,
        symbols: I,
    ) -> Result<Aggregation>
    where
        P: MetricProvider,
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut aligned = Vec::new();
        for symbol in symbols {
            let symbol = symbol.as_ref();
            let rows = aligner.align(symbol)?;
            aligned.push((symbol.to_string(), rows));
        }
        self.from_aligned(aligned)
    }

    /// Groups already aligned rows by period.
    ///
    /// # Errors
    ///
    /// Returns [`PrimeError::PeriodConflict`] on a duplicate row under
    /// [`DuplicatePolicy::Reject`].
    pub fn from_aligned<I, R>(&self, aligned: I) -> Result<Aggregation>
    where
        I: IntoIterator<Item = (Symbol, R)>,
        R: AsRef<[AlignedRow]>,
    {
        let mut aggregation = Aggregation::default();
        let mut placed: HashMap<(PeriodKey, Symbol), Date> = HashMap::new();

        for (symbol, rows) in aligned {
            let rows = rows.as_ref();
            debug!(symbol = %symbol, rows = rows.len(), "grouping rows by period");
            for row in rows {
                let period = PeriodKey::from_date(row.date);
                if let Some(&previous) = placed.get(&(period, symbol.clone())) {
                    match self.policy {
                        DuplicatePolicy::Reject => {
                            return Err(PrimeError::PeriodConflict {
                                period,
                                symbol,
                                first: previous,
                                second: row.date,
                            });
                        }
                        DuplicatePolicy::LastWins => {
                            warn!(
                                %period,
                                symbol = %symbol,
                                replaced = %previous,
                                kept = %row.date,
                                "duplicate period row overwritten"
                            );
                            aggregation.conflicts.push(PeriodConflict {
                                period,
                                symbol: symbol.clone(),
                                replaced: previous,
                                kept: row.date,
                            });
                        }
                    }
                }
                placed.insert((period, symbol.clone()), row.date);
                aggregation
                    .cross_section
                    .insert(period, symbol.as_str(), row.metrics);
            }
        }

        info!(
            periods = aggregation.cross_section.len(),
            conflicts = aggregation.conflicts.len(),
            "aggregated cross-section"
        );
        Ok(aggregation)
    }
}
