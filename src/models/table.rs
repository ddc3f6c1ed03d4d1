use crate::models::RunningStats;
use rustc_hash::FxHashMap;
use std::collections::hash_map::Entry;

/// Station name to running stats.
///
/// Used both for the per-chunk partial tables built by workers and for the
/// final table owned by the merge aggregator. Keys are raw bytes compared
/// byte-lexicographically.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StationTable {
    stations: FxHashMap<Box<[u8]>, RunningStats>,
}

impl StationTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut stations = FxHashMap::default();
        stations.reserve(capacity);
        Self { stations }
    }

    /// Record one observation. Only allocates the first time a station is seen.
    pub fn record(&mut self, station: &[u8], value: f64) {
        match self.stations.get_mut(station) {
            Some(stats) => stats.add(value),
            None => {
                self.stations.insert(station.into(), RunningStats::new(value));
            }
        }
    }

    /// Fold a partial table into this one, taking ownership of stations new to `self`.
    pub fn merge(&mut self, other: StationTable) {
        for (station, incoming) in other.stations {
            match self.stations.entry(station) {
                Entry::Occupied(mut entry) => entry.get_mut().merge(&incoming),
                Entry::Vacant(entry) => {
                    entry.insert(incoming);
                }
            }
        }
    }

    pub fn get(&self, station: &[u8]) -> Option<&RunningStats> {
        self.stations.get(station)
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    /// Total observations across all stations.
    pub fn total_records(&self) -> u64 {
        self.stations.values().map(|stats| stats.count).sum()
    }

    /// Entries sorted by station name in byte order.
    pub fn sorted(&self) -> Vec<(&[u8], &RunningStats)> {
        let mut entries: Vec<(&[u8], &RunningStats)> = self
            .stations
            .iter()
            .map(|(station, stats)| (station.as_ref(), stats))
            .collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));
        entries
    }
}
