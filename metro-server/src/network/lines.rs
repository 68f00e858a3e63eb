//! Line-expanded graph used for minimum-interchange search.
//!
//! Each node is a (station, line) pair. Riding one segment along a line costs
//! 1; switching lines without leaving a station costs
//! [`INTERCHANGE_PENALTY`]. A plain shortest-path search over this graph
//! therefore minimizes interchanges first and segments second, as long as no
//! route rides [`INTERCHANGE_PENALTY`] or more segments between two changes.

use std::collections::HashMap;
use std::fmt;

use serde::Serialize;

use crate::domain::{CanonicalId, LineId, LineSet};

/// Cost of changing line at a station.
pub const INTERCHANGE_PENALTY: u32 = 100;

/// Cost of riding one segment between adjacent stations.
pub const TRAVEL_COST: u32 = 1;

/// A station as seen from one line serving it.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LineNode {
    pub station: CanonicalId,
    pub line: LineId,
}

impl LineNode {
    pub fn new(station: CanonicalId, line: LineId) -> Self {
        Self { station, line }
    }
}

impl fmt::Debug for LineNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LineNode({}@{})", self.station, self.line)
    }
}

/// What an edge in the line graph represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgeKind {
    /// One segment along a line between adjacent stations
    Travel,
    /// A line change within one station
    Interchange,
}

/// Directed half of an undirected line-graph edge.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineEdge {
    pub to: LineNode,
    pub weight: u32,
    pub kind: EdgeKind,
}

/// Undirected graph over [`LineNode`]s.
#[derive(Debug, Clone, Default)]
pub struct LineExpansionGraph {
    adjacency: HashMap<LineNode, Vec<LineEdge>>,
    /// Nodes of each station, sorted by line.
    stations: HashMap<CanonicalId, Vec<LineNode>>,
    travel_edges: usize,
    interchange_edges: usize,
}

impl LineExpansionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ensure a node exists for every line serving the station.
    pub fn add_station(&mut self, station: &CanonicalId, lines: &LineSet) {
        for line in lines.iter() {
            let node = LineNode::new(station.clone(), line.clone());
            self.index(&node);
            self.adjacency.entry(node).or_default();
        }
    }

    /// Connect every pair of lines at an interchange station.
    ///
    /// Does nothing for single-line stations.
    pub fn add_interchanges(&mut self, station: &CanonicalId, lines: &LineSet) {
        let lines: Vec<&LineId> = lines.iter().collect();
        for (i, first) in lines.iter().enumerate() {
            for second in &lines[i + 1..] {
                self.add_edge(
                    LineNode::new(station.clone(), (*first).clone()),
                    LineNode::new(station.clone(), (*second).clone()),
                    INTERCHANGE_PENALTY,
                    EdgeKind::Interchange,
                );
                self.interchange_edges += 1;
            }
        }
    }

    /// Add one travel edge per line the two endpoints have in common.
    pub fn add_travel(&mut self, a: &CanonicalId, b: &CanonicalId, common: &[LineId]) {
        for line in common {
            self.add_edge(
                LineNode::new(a.clone(), line.clone()),
                LineNode::new(b.clone(), line.clone()),
                TRAVEL_COST,
                EdgeKind::Travel,
            );
            self.travel_edges += 1;
        }
    }

    fn add_edge(&mut self, a: LineNode, b: LineNode, weight: u32, kind: EdgeKind) {
        self.index(&a);
        self.index(&b);
        self.adjacency.entry(a.clone()).or_default().push(LineEdge {
            to: b.clone(),
            weight,
            kind,
        });
        self.adjacency
            .entry(b)
            .or_default()
            .push(LineEdge { to: a, weight, kind });
    }

    fn index(&mut self, node: &LineNode) {
        let nodes = self.stations.entry(node.station.clone()).or_default();
        if let Err(at) = nodes.binary_search(node) {
            nodes.insert(at, node.clone());
        }
    }

    /// Outgoing edges of a node.
    pub fn edges(&self, node: &LineNode) -> &[LineEdge] {
        self.adjacency.get(node).map(Vec::as_slice).unwrap_or_default()
    }

    /// All nodes at a station, ordered by line.
    pub fn nodes_at(&self, station: &CanonicalId) -> &[LineNode] {
        self.stations
            .get(station)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn contains(&self, node: &LineNode) -> bool {
        self.adjacency.contains_key(node)
    }

    pub fn node_count(&self) -> usize {
        self.adjacency.len()
    }

    pub fn travel_edge_count(&self) -> usize {
        self.travel_edges
    }

    pub fn interchange_edge_count(&self) -> usize {
        self.interchange_edges
    }
}
