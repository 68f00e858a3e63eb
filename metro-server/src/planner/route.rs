//! Route results and their step-by-step directions.

use serde::Serialize;

use crate::domain::{CanonicalId, LineId};
use crate::network::{GraphSnapshot, LineNode};

/// One instruction in a route's directions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum Direction {
    /// Board at the origin on a line
    Start { station: CanonicalId, line: LineId },
    /// Ride to the next station
    Travel { to: CanonicalId },
    /// Change to another line without leaving the station
    Change { at: CanonicalId, to_line: LineId },
}

/// Minimum-distance route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistanceRoute {
    /// Stations from origin to destination.
    pub path: Vec<CanonicalId>,
    /// Total distance in km.
    pub distance: f64,
    pub fare: u32,
}

impl DistanceRoute {
    /// Directions along the route.
    ///
    /// For each hop a line serving both stations is chosen, staying on the
    /// current line where possible; a `Change` is emitted whenever the line of
    /// travel switches. Hops between stations with no common line keep the
    /// current line.
    pub fn directions(&self, snapshot: &GraphSnapshot) -> Vec<Direction> {
        let Some(origin) = self.path.first() else {
            return Vec::new();
        };

        let common = |a: &CanonicalId, b: &CanonicalId| -> Vec<LineId> {
            match (snapshot.registry.get(a), snapshot.registry.get(b)) {
                (Some(a), Some(b)) => a.lines.common(&b.lines),
                _ => Vec::new(),
            }
        };

        let first_hop = self
            .path
            .get(1)
            .and_then(|next| common(origin, next).into_iter().next());
        let Some(mut current) = first_hop.or_else(|| {
            snapshot
                .registry
                .get(origin)
                .and_then(|s| s.lines.iter().next().cloned())
        }) else {
            return Vec::new();
        };

        let mut steps = vec![Direction::Start {
            station: origin.clone(),
            line: current.clone(),
        }];

        for (i, hop) in self.path.windows(2).enumerate() {
            let lines = common(&hop[0], &hop[1]);
            if !lines.contains(&current) {
                if let Some(next_line) = lines.into_iter().next() {
                    if i > 0 {
                        steps.push(Direction::Change {
                            at: hop[0].clone(),
                            to_line: next_line.clone(),
                        });
                    }
                    current = next_line;
                }
            }
            steps.push(Direction::Travel { to: hop[1].clone() });
        }

        steps
    }
}

/// A stretch of a route ridden on one line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Leg {
    pub line: LineId,
    pub from: CanonicalId,
    pub to: CanonicalId,
    /// Segments ridden.
    pub hops: u32,
}

/// Minimum-interchange route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InterchangeRoute {
    /// (station, line) nodes from origin to destination.
    ///
    /// Consecutive nodes at the same station mark a line change there.
    pub path: Vec<LineNode>,
    /// Search cost: segments plus the interchange penalty per change.
    pub cost: u32,
    /// Total distance in km.
    pub distance: f64,
    pub interchanges: u32,
    pub fare: u32,
}

impl InterchangeRoute {
    /// Physical stations visited, with line changes collapsed.
    pub fn stations(&self) -> Vec<CanonicalId> {
        let mut stations: Vec<CanonicalId> = Vec::with_capacity(self.path.len());
        for node in &self.path {
            if stations.last() != Some(&node.station) {
                stations.push(node.station.clone());
            }
        }
        stations
    }

    /// Directions along the route.
    pub fn directions(&self) -> Vec<Direction> {
        let Some(first) = self.path.first() else {
            return Vec::new();
        };

        let mut steps = vec![Direction::Start {
            station: first.station.clone(),
            line: first.line.clone(),
        }];

        for pair in self.path.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);
            if prev.station == curr.station {
                if prev.line != curr.line {
                    steps.push(Direction::Change {
                        at: curr.station.clone(),
                        to_line: curr.line.clone(),
                    });
                }
            } else {
                steps.push(Direction::Travel {
                    to: curr.station.clone(),
                });
            }
        }

        steps
    }

    /// The route split into single-line legs.
    pub fn legs(&self) -> Vec<Leg> {
        let mut legs = Vec::new();
        let Some(first) = self.path.first() else {
            return legs;
        };

        let mut leg = Leg {
            line: first.line.clone(),
            from: first.station.clone(),
            to: first.station.clone(),
            hops: 0,
        };

        for node in &self.path[1..] {
            if node.station == leg.to {
                if node.line != leg.line {
                    let next = Leg {
                        line: node.line.clone(),
                        from: node.station.clone(),
                        to: node.station.clone(),
                        hops: 0,
                    };
                    let done = std::mem::replace(&mut leg, next);
                    if done.hops > 0 {
                        legs.push(done);
                    }
                }
            } else {
                leg.to = node.station.clone();
                leg.hops += 1;
            }
        }

        if leg.hops > 0 {
            legs.push(leg);
        }
        legs
    }
}
