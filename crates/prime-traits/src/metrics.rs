//! Ranked metrics and the aligned per-ticker rows that carry them.

use crate::Date;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a metric's rank table is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RankOrder {
    /// Higher values rank first.
    Descending,
    /// Lower values rank first, except that exactly zero ranks last.
    AscendingZeroLast,
}

/// One of the five metrics every aligned row carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    /// Reported earnings per share.
    ReportedEps,
    /// Price over reported EPS.
    PeRatio,
    /// Trailing 6-month compounded price return.
    #[serde(rename = "quarterly_return_6m")]
    QuarterlyReturn6m,
    /// Trailing 12-month compounded price return.
    #[serde(rename = "quarterly_return_1y")]
    QuarterlyReturn1y,
    /// Year-over-year revenue growth known as of the row date.
    YoyReturn,
}

impl Metric {
    /// All metrics, in ranking order.
    pub const ALL: [Self; 5] = [
        Self::ReportedEps,
        Self::PeRatio,
        Self::QuarterlyReturn6m,
        Self::QuarterlyReturn1y,
        Self::YoyReturn,
    ];

    /// Returns the metric's field name in persisted documents.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::ReportedEps => "reported_eps",
            Self::PeRatio => "pe_ratio",
            Self::QuarterlyReturn6m => "quarterly_return_6m",
            Self::QuarterlyReturn1y => "quarterly_return_1y",
            Self::YoyReturn => "yoy_return",
        }
    }

    /// Returns the ranking order for this metric.
    pub const fn order(&self) -> RankOrder {
        match self {
            Self::PeRatio => RankOrder::AscendingZeroLast,
            _ => RankOrder::Descending,
        }
    }

    /// Returns the multiplier applied to this metric's rank score.
    ///
    /// P/E and revenue growth count half relative to the other three metrics.
    pub const fn weight(&self) -> f64 {
        match self {
            Self::PeRatio | Self::YoyReturn => 0.5,
            _ => 1.0,
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The metric values of one ticker at one point in time.
///
/// Field order here is the key order of the persisted document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricSnapshot {
    /// Reported earnings per share.
    pub reported_eps: f64,
    /// Price over reported EPS.
    pub pe_ratio: f64,
    /// Trailing 6-month compounded return.
    pub quarterly_return_6m: f64,
    /// Trailing 12-month compounded return.
    pub quarterly_return_1y: f64,
    /// Year-over-year revenue growth.
    pub yoy_return: f64,
}

impl MetricSnapshot {
    /// Returns the value of `metric`.
    pub const fn get(&self, metric: Metric) -> f64 {
        match metric {
            Metric::ReportedEps => self.reported_eps,
            Metric::PeRatio => self.pe_ratio,
            Metric::QuarterlyReturn6m => self.quarterly_return_6m,
            Metric::QuarterlyReturn1y => self.quarterly_return_1y,
            Metric::YoyReturn => self.yoy_return,
        }
    }
}

/// One fully resolved row per EPS report date of a ticker.
///
/// Rows only exist when every metric could be resolved for the date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AlignedRow {
    /// EPS report date.
    pub date: Date,
    /// Metric values resolved for `date`.
    #[serde(flatten)]
    pub metrics: MetricSnapshot,
}
