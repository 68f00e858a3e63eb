//! Physical-distance graph over canonical stations.

use std::collections::HashMap;

use crate::domain::CanonicalId;

/// A distance in whole metres.
///
/// Route lengths are summed in metres so that the total is exact and does not
/// depend on the order the segments are added in.
pub type Metres = u64;

/// Round a distance in kilometres to whole metres.
///
/// The input must already have passed [`check_distance`](super::check_distance).
pub fn km_to_metres(km: f64) -> Metres {
    (km * 1000.0).round() as Metres
}

/// Convert metres back to kilometres for display and fares.
pub fn metres_to_km(metres: Metres) -> f64 {
    metres as f64 / 1000.0
}

/// Undirected graph weighted by distance in metres.
///
/// Parallel edges between the same pair are all kept; shortest-path search
/// picks the cheapest one during relaxation.
#[derive(Debug, Clone, Default)]
pub struct DistanceGraph {
    adjacency: HashMap<CanonicalId, Vec<(CanonicalId, Metres)>>,
    edge_count: usize,
}

impl DistanceGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an undirected edge, recorded on both endpoints.
    pub fn add_edge(&mut self, a: &CanonicalId, b: &CanonicalId, distance: Metres) {
        self.adjacency
            .entry(a.clone())
            .or_default()
            .push((b.clone(), distance));
        self.adjacency
            .entry(b.clone())
            .or_default()
            .push((a.clone(), distance));
        self.edge_count += 1;
    }

    /// Neighbours of a station in insertion order.
    pub fn neighbours(&self, id: &CanonicalId) -> &[(CanonicalId, Metres)] {
        self.adjacency.get(id).map(Vec::as_slice).unwrap_or_default()
    }

    /// Shortest direct edge between two stations, if any.
    pub fn edge_distance(&self, a: &CanonicalId, b: &CanonicalId) -> Option<Metres> {
        self.neighbours(a)
            .iter()
            .filter(|(n, _)| n == b)
            .map(|(_, d)| *d)
            .min()
    }

    pub fn contains(&self, id: &CanonicalId) -> bool {
        self.adjacency.contains_key(id)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    /// Number of undirected edges, parallel edges counted separately.
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::canonicalize;

    fn id(s: &str) -> CanonicalId {
        canonicalize(s)
    }

    #[test]
    fn edges_are_undirected() {
        let mut graph = DistanceGraph::new();
        graph.add_edge(&id("a"), &id("b"), 1500);

        assert_eq!(graph.neighbours(&id("a")), &[(id("b"), 1500)]);
        assert_eq!(graph.neighbours(&id("b")), &[(id("a"), 1500)]);
        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.edge_count(), 1);
    }

    #[test]
    fn parallel_edges_are_kept() {
        let mut graph = DistanceGraph::new();
        graph.add_edge(&id("a"), &id("b"), 3000);
        graph.add_edge(&id("b"), &id("a"), 2000);

        assert_eq!(graph.neighbours(&id("a")).len(), 2);
        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.edge_distance(&id("a"), &id("b")), Some(2000));
        assert_eq!(graph.edge_distance(&id("b"), &id("a")), Some(2000));
    }

    #[test]
    fn kilometres_round_to_metres() {
        assert_eq!(km_to_metres(1.2), 1200);
        assert_eq!(km_to_metres(0.1) + km_to_metres(0.2), km_to_metres(0.3));
        assert_eq!(km_to_metres(2.0004), 2000);
        assert_eq!(metres_to_km(12_000), 12.0);
        assert_eq!(metres_to_km(600), 0.6);
    }

    #[test]
    fn missing_edge() {
        let mut graph = DistanceGraph::new();
        graph.add_edge(&id("a"), &id("b"), 1000);

        assert_eq!(graph.edge_distance(&id("a"), &id("c")), None);
        assert!(graph.neighbours(&id("c")).is_empty());
        assert!(!graph.contains(&id("c")));
    }
}
