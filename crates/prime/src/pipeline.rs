//! The end-to-end stock selection model.

use crate::config::PipelineConfig;
use prime_align::{Aggregation, PeriodAggregator, TemporalAligner};
use prime_eval::PortfolioEvaluator;
use prime_rank::{PeriodRankings, RankScoreSelector, Selector, rank_period};
use prime_traits::{
    AlignedRow, CrossSection, MetricProvider, PeriodKey, Result, Selections, Symbol,
};
use std::collections::BTreeMap;
use tracing::info;

/// Aligns, ranks, selects and evaluates a ticker universe.
///
/// The model owns a [`MetricProvider`] and a validated [`PipelineConfig`];
/// every stage is recomputed on each call and nothing is retained between
/// calls. Data access is the provider's concern, including any caching.
///
/// # Example
///
/// ```
/// use prime::{PipelineConfig, PrimeModel};
/// use prime::traits::StaticProvider;
///
/// let config = PipelineConfig {
///     universe: vec!["NVDA".into(), "AMD".into()],
///     ..PipelineConfig::default()
/// };
/// let model = PrimeModel::new(StaticProvider::new(), config).unwrap();
///
/// let cross_section = model.compose_stock_data_by_period().unwrap();
/// let selections = model.select_stocks(&cross_section).unwrap();
/// assert!(selections.is_empty());
/// ```
#[derive(Debug)]
pub struct PrimeModel<P> {
    provider: P,
    config: PipelineConfig,
}

impl<P: MetricProvider> PrimeModel<P> {
    /// Creates a model after validating `config`.
    ///
    /// # Errors
    ///
    /// Returns the validation error of [`PipelineConfig::validate`].
    pub fn new(provider: P, config: PipelineConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    /// Returns the configuration.
    pub const fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Returns the provider.
    pub const fn provider(&self) -> &P {
        &self.provider
    }

    fn aligner(&self) -> TemporalAligner<&P> {
        TemporalAligner::with_config(&self.provider, self.config.aligner_config())
    }

    fn align_universe(&self) -> Result<Vec<(Symbol, Vec<AlignedRow>)>> {
        let aligner = self.aligner();
        self.config
            .universe
            .iter()
            .map(|symbol| Ok((symbol.clone(), aligner.align(symbol)?)))
            .collect()
    }

    /// Aligns every ticker of the universe.
    ///
    /// # Errors
    ///
    /// Fails on a blank ticker.
    pub fn compose_stock_data(&self) -> Result<BTreeMap<Symbol, Vec<AlignedRow>>> {
        let aligned = self.align_universe()?;
        let rows: usize = aligned.iter().map(|(_, r)| r.len()).sum();
        info!(tickers = aligned.len(), rows, "composed stock data");
        Ok(aligned.into_iter().collect())
    }

    /// Aligns the universe and groups rows by period, reporting duplicates.
    ///
    /// # Errors
    ///
    /// Fails on a blank ticker, or on a duplicate row under
    /// [`prime_align::DuplicatePolicy::Reject`].
    pub fn aggregate(&self) -> Result<Aggregation> {
        PeriodAggregator::new(self.config.duplicate_policy).from_aligned(self.align_universe()?)
    }

    /// Groups already aligned rows by period, in universe order.
    ///
    /// Tickers of the universe missing from `stock_data` are skipped. Use this
    /// with the output of [`PrimeModel::compose_stock_data`] to avoid aligning
    /// twice.
    ///
    /// # Errors
    ///
    /// Fails on a duplicate row under [`prime_align::DuplicatePolicy::Reject`].
    pub fn aggregate_rows(
        &self,
        stock_data: &BTreeMap<Symbol, Vec<AlignedRow>>,
    ) -> Result<Aggregation> {
        let ordered = self
            .config
            .universe
            .iter()
            .filter_map(|symbol| stock_data.get(symbol).map(|rows| (symbol.clone(), rows)));
        PeriodAggregator::new(self.config.duplicate_policy).from_aligned(ordered)
    }

    /// Builds the per-period cross-section of the universe.
    ///
    /// Tickers appear in each period in universe order.
    ///
    /// # Errors
    ///
    /// See [`PrimeModel::aggregate`].
    pub fn compose_stock_data_by_period(&self) -> Result<CrossSection> {
        Ok(self.aggregate()?.cross_section)
    }

    /// Ranks every metric within every period.
    pub fn rank_stocks(&self, cross_section: &CrossSection) -> BTreeMap<PeriodKey, PeriodRankings> {
        cross_section
            .iter()
            .map(|(period, snapshot)| (*period, rank_period(snapshot)))
            .collect()
    }

    /// Selects the top-scoring tickers of every period.
    ///
    /// # Errors
    ///
    /// Returns [`prime_traits::PrimeError::InvalidConfig`] if `top_k` is zero.
    pub fn select_stocks(&self, cross_section: &CrossSection) -> Result<Selections> {
        let selections =
            RankScoreSelector::new(self.config.rank_config()).select_all(cross_section)?;
        info!(periods = selections.len(), "selected stocks");
        Ok(selections)
    }

    /// Realized return of each period's portfolio chosen one period earlier.
    pub fn evaluate_portfolio(&self, selections: &Selections) -> BTreeMap<PeriodKey, f64> {
        let returns =
            PortfolioEvaluator::with_config(&self.provider, self.config.evaluator_config())
                .evaluate(selections);
        info!(periods = returns.len(), "evaluated portfolio");
        returns
    }
}
