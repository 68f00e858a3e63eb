//! Station registry: canonical ids, line memberships and numeric aliases.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::{CanonicalId, LineSet, QueryError, canonicalize};

/// Everything known about one physical station.
#[derive(Debug, Clone, Serialize)]
pub struct StationRecord {
    /// First raw name seen for this station, kept for display.
    pub raw_name: String,

    /// Canonical id.
    pub id: CanonicalId,

    /// Union of the lines from every raw name of this station.
    pub lines: LineSet,
}

impl StationRecord {
    /// True when the station is served by more than one line.
    pub fn is_interchange(&self) -> bool {
        self.lines.is_interchange()
    }

    /// Simple part of the first-seen raw name with each word capitalized,
    /// e.g. `Rajiv Chowk`. Capitals already present are kept, so `ITO`
    /// stays `ITO`.
    pub fn display_name(&self) -> String {
        let simple = self.raw_name.split('_').next().unwrap_or_default();
        title_case(simple)
    }
}

/// Accumulates stations while edge records are ingested.
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    stations: HashMap<CanonicalId, StationRecord>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a raw station name with its parsed lines.
    ///
    /// The first raw name seen for a canonical id is kept as its
    /// representative; lines from later spellings are merged in.
    pub fn register(&mut self, raw_name: &str, lines: &LineSet) -> CanonicalId {
        let id = canonicalize(raw_name);
        self.stations
            .entry(id.clone())
            .and_modify(|record| record.lines.merge(lines))
            .or_insert_with(|| StationRecord {
                raw_name: raw_name.trim().to_string(),
                id: id.clone(),
                lines: lines.clone(),
            });
        id
    }

    /// Freeze the registry, assigning alphabetical indices.
    pub fn finish(self) -> StationRegistry {
        let mut sorted: Vec<CanonicalId> = self.stations.keys().cloned().collect();
        sorted.sort();

        StationRegistry {
            stations: self.stations,
            sorted,
        }
    }
}

/// Immutable lookup from names and indices to stations.
///
/// Indices are 1-based positions in the alphabetical order of canonical ids,
/// assigned once when the registry is frozen.
#[derive(Debug, Clone, Default)]
pub struct StationRegistry {
    stations: HashMap<CanonicalId, StationRecord>,
    sorted: Vec<CanonicalId>,
}

impl StationRegistry {
    /// Look up a station record by canonical id.
    pub fn get(&self, id: &CanonicalId) -> Option<&StationRecord> {
        self.stations.get(id)
    }

    pub fn contains(&self, id: &CanonicalId) -> bool {
        self.stations.contains_key(id)
    }

    /// 1-based alphabetical index of a station.
    pub fn index_of(&self, id: &CanonicalId) -> Option<usize> {
        self.sorted.binary_search(id).ok().map(|i| i + 1)
    }

    /// Station at a 1-based alphabetical index.
    pub fn name_at(&self, index: usize) -> Option<&CanonicalId> {
        index.checked_sub(1).and_then(|i| self.sorted.get(i))
    }

    /// Resolve a user-supplied station reference to a canonical id.
    ///
    /// An all-digit query is an index; anything else is canonicalized, so
    /// full raw names resolve as well as simple names in any case.
    pub fn lookup(&self, query: &str) -> Result<CanonicalId, QueryError> {
        let query = query.trim();
        let unknown = || QueryError::UnknownStation(query.to_string());

        if !query.is_empty() && query.bytes().all(|b| b.is_ascii_digit()) {
            let index: usize = query.parse().map_err(|_| unknown())?;
            return self.name_at(index).cloned().ok_or_else(unknown);
        }

        let id = canonicalize(query);
        if self.contains(&id) {
            Ok(id)
        } else {
            Err(unknown())
        }
    }

    /// Stations in alphabetical order with their 1-based indices.
    pub fn iter_sorted(&self) -> impl Iterator<Item = (usize, &StationRecord)> {
        self.sorted
            .iter()
            .enumerate()
            .filter_map(|(i, id)| self.stations.get(id).map(|record| (i + 1, record)))
    }

    pub fn len(&self) -> usize {
        self.sorted.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sorted.is_empty()
    }
}

fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
