//! Per-period cross-sectional view of the aligned dataset.

use crate::{MetricSnapshot, PeriodKey, Symbol};
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
};
use std::{collections::BTreeMap, fmt};

/// Selected tickers per period, best first.
pub type Selections = BTreeMap<PeriodKey, Vec<Symbol>>;

/// Ticker snapshots of one period, in insertion order.
///
/// Insertion order is the tie-break order for ranking and selection, so it is
/// preserved through serialization. Re-inserting a ticker replaces its
/// snapshot in place and keeps the ticker's original position.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PeriodSnapshot {
    entries: Vec<(Symbol, MetricSnapshot)>,
}

impl PeriodSnapshot {
    /// Creates an empty snapshot.
    pub const fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the number of tickers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether no ticker is present.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts or replaces a ticker's snapshot, returning the replaced one.
    pub fn insert(
        &mut self,
        symbol: impl Into<Symbol>,
        snapshot: MetricSnapshot,
    ) -> Option<MetricSnapshot> {
        let symbol = symbol.into();
        match self.entries.iter_mut().find(|(s, _)| *s == symbol) {
            Some((_, existing)) => Some(std::mem::replace(existing, snapshot)),
            None => {
                self.entries.push((symbol, snapshot));
                None
            }
        }
    }

    /// Returns a ticker's snapshot.
    pub fn get(&self, symbol: &str) -> Option<&MetricSnapshot> {
        self.entries
            .iter()
            .find(|(s, _)| s == symbol)
            .map(|(_, snapshot)| snapshot)
    }

    /// Iterates over `(ticker, snapshot)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &MetricSnapshot)> {
        self.entries.iter().map(|(s, m)| (s.as_str(), m))
    }

    /// Returns the tickers in insertion order.
    pub fn symbols(&self) -> Vec<&str> {
        self.entries.iter().map(|(s, _)| s.as_str()).collect()
    }
}

impl<S: Into<Symbol>> FromIterator<(S, MetricSnapshot)> for PeriodSnapshot {
    fn from_iter<I: IntoIterator<Item = (S, MetricSnapshot)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (symbol, metrics) in iter {
            snapshot.insert(symbol, metrics);
        }
        snapshot
    }
}

impl Serialize for PeriodSnapshot {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(s, m)| (s, m)))
    }
}

impl<'de> Deserialize<'de> for PeriodSnapshot {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct SnapshotVisitor;

        impl<'de> Visitor<'de> for SnapshotVisitor {
            type Value = PeriodSnapshot;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map from ticker to metric snapshot")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut snapshot = PeriodSnapshot::new();
                while let Some((symbol, metrics)) = map.next_entry::<Symbol, MetricSnapshot>()? {
                    snapshot.insert(symbol, metrics);
                }
                Ok(snapshot)
            }
        }

        deserializer.deserialize_map(SnapshotVisitor)
    }
}

/// Mapping from period to the ticker snapshots that fall in it.
///
/// Periods iterate chronologically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CrossSection {
    periods: BTreeMap<PeriodKey, PeriodSnapshot>,
}

impl CrossSection {
    /// Creates an empty cross-section.
    pub const fn new() -> Self {
        Self {
            periods: BTreeMap::new(),
        }
    }

    /// Inserts or replaces a ticker's snapshot in `period`, returning the replaced one.
    pub fn insert(
        &mut self,
        period: PeriodKey,
        symbol: impl Into<Symbol>,
        snapshot: MetricSnapshot,
    ) -> Option<MetricSnapshot> {
        self.periods.entry(period).or_default().insert(symbol, snapshot)
    }

    /// Returns the snapshot of one period.
    pub fn get(&self, period: &PeriodKey) -> Option<&PeriodSnapshot> {
        self.periods.get(period)
    }

    /// Iterates over periods chronologically.
    pub fn iter(&self) -> impl Iterator<Item = (&PeriodKey, &PeriodSnapshot)> {
        self.periods.iter()
    }

    /// Returns the periods present, chronologically.
    pub fn periods(&self) -> Vec<PeriodKey> {
        self.periods.keys().copied().collect()
    }

    /// Returns the number of periods.
    pub fn len(&self) -> usize {
        self.periods.len()
    }

    /// Returns whether no period is present.
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }
}
