//! Route queries against a network snapshot.
//!
//! Each query resolves its endpoints, runs Dijkstra over the relevant graph,
//! and translates the result. Queries only read the snapshot, so any number
//! may run concurrently.

use std::time::Instant;

use rayon::prelude::*;
use tracing::debug;

use crate::domain::{CanonicalId, QueryError};
use crate::network::{GraphSnapshot, INTERCHANGE_PENALTY, LineNode, Metres, metres_to_km};

use super::config::SearchConfig;
use super::dijkstra::{DeadlineExpired, Found, shortest_path};
use super::route::{DistanceRoute, InterchangeRoute};

impl From<DeadlineExpired> for QueryError {
    fn from(_: DeadlineExpired) -> Self {
        QueryError::Timeout
    }
}

/// Route planner over an immutable snapshot.
#[derive(Debug, Clone, Copy)]
pub struct Planner<'a> {
    snapshot: &'a GraphSnapshot,
    config: &'a SearchConfig,
}

impl<'a> Planner<'a> {
    /// Create a new planner.
    pub fn new(snapshot: &'a GraphSnapshot, config: &'a SearchConfig) -> Self {
        Self { snapshot, config }
    }

    /// Minimum-distance route between two stations.
    ///
    /// `from` and `to` are station names (any case, with or without line
    /// annotation) or 1-based station indices. When several routes share the
    /// minimum distance, the first one settled by the search is returned.
    pub fn shortest_by_distance(&self, from: &str, to: &str) -> Result<DistanceRoute, QueryError> {
        let start = self.snapshot.lookup(from)?;
        let end = self.snapshot.lookup(to)?;
        let graph = &self.snapshot.distance;

        let found = shortest_path(
            &start,
            &end,
            |id: &CanonicalId| graph.neighbours(id).iter().cloned(),
            self.config.deadline_from_now(),
        )?
        .ok_or_else(|| QueryError::NoPath {
            from: start.clone(),
            to: end.clone(),
        })?;

        debug!(
            from = %start,
            to = %end,
            metres = found.cost,
            settled = found.settled,
            "shortest distance route found"
        );

        let distance = metres_to_km(found.cost);
        Ok(DistanceRoute {
            fare: self.snapshot.fare(distance),
            distance,
            path: found.path,
        })
    }

    /// Route with the fewest line changes between two stations.
    ///
    /// Searches every pairing of the origin's lines with the destination's
    /// lines and keeps the cheapest. Ties between pairings go to the first in
    /// line order, so the answer does not depend on `parallel_pairs`.
    ///
    /// The interchange count is `cost / INTERCHANGE_PENALTY`, which holds as
    /// long as no route rides `INTERCHANGE_PENALTY` or more segments between
    /// two changes.
    pub fn shortest_by_interchanges(
        &self,
        from: &str,
        to: &str,
    ) -> Result<InterchangeRoute, QueryError> {
        let start = self.snapshot.lookup(from)?;
        let end = self.snapshot.lookup(to)?;

        let start_nodes = self.snapshot.lines.nodes_at(&start);
        if start_nodes.is_empty() {
            return Err(QueryError::UnknownStation(start.to_string()));
        }
        let end_nodes = self.snapshot.lines.nodes_at(&end);
        if end_nodes.is_empty() {
            return Err(QueryError::UnknownStation(end.to_string()));
        }

        let pairs: Vec<(&LineNode, &LineNode)> = start_nodes
            .iter()
            .flat_map(|s| end_nodes.iter().map(move |e| (s, e)))
            .collect();

        let deadline = self.config.deadline_from_now();
        let results: Vec<Result<Option<Found<LineNode, u32>>, DeadlineExpired>> =
            if self.config.parallel_pairs {
                pairs
                    .par_iter()
                    .map(|(s, e)| self.line_search(s, e, deadline))
                    .collect()
            } else {
                pairs
                    .iter()
                    .map(|(s, e)| self.line_search(s, e, deadline))
                    .collect()
            };

        let mut best: Option<Found<LineNode, u32>> = None;
        for result in results {
            let Some(found) = result? else {
                continue;
            };
            if best.as_ref().is_none_or(|b| found.cost < b.cost) {
                best = Some(found);
            }
        }

        let found = best.ok_or_else(|| QueryError::NoPath {
            from: start.clone(),
            to: end.clone(),
        })?;

        let distance = metres_to_km(self.path_distance(&found.path));
        let interchanges = found.cost / INTERCHANGE_PENALTY;

        debug!(
            from = %start,
            to = %end,
            cost = found.cost,
            interchanges,
            pairs = pairs.len(),
            "minimum interchange route found"
        );

        Ok(InterchangeRoute {
            path: found.path,
            cost: found.cost,
            distance,
            interchanges,
            fare: self.snapshot.fare(distance),
        })
    }

    fn line_search(
        &self,
        start: &LineNode,
        end: &LineNode,
        deadline: Option<Instant>,
    ) -> Result<Option<Found<LineNode, u32>>, DeadlineExpired> {
        let graph = &self.snapshot.lines;
        shortest_path(
            start,
            end,
            |node: &LineNode| {
                graph
                    .edges(node)
                    .iter()
                    .map(|edge| (edge.to.clone(), edge.weight))
            },
            deadline,
        )
    }

    /// Physical distance in metres along a line-node path.
    ///
    /// Every travel edge was built from an edge that is also in the distance
    /// graph, so each station-to-station step has a matching distance.
    fn path_distance(&self, path: &[LineNode]) -> Metres {
        path.windows(2)
            .filter(|pair| pair[0].station != pair[1].station)
            .filter_map(|pair| {
                self.snapshot
                    .distance
                    .edge_distance(&pair[0].station, &pair[1].station)
            })
            .sum()
    }
}

/// Minimum-distance route with the default search configuration.
pub fn query_shortest_distance(
    snapshot: &GraphSnapshot,
    from: &str,
    to: &str,
) -> Result<DistanceRoute, QueryError> {
    Planner::new(snapshot, &SearchConfig::default()).shortest_by_distance(from, to)
}

/// Minimum-interchange route with the default search configuration.
pub fn query_min_interchange(
    snapshot: &GraphSnapshot,
    from: &str,
    to: &str,
) -> Result<InterchangeRoute, QueryError> {
    Planner::new(snapshot, &SearchConfig::default()).shortest_by_interchanges(from, to)
}

#[cfg(test)]
#[path = "search_tests.rs"]
mod tests;
