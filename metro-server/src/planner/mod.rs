//! Route planner using Dijkstra search.
//!
//! Two queries are answered over a [`GraphSnapshot`](crate::network::GraphSnapshot):
//! the minimum-distance route over the distance graph, and the
//! minimum-interchange route over the line-expanded graph.

mod config;
mod dijkstra;
mod route;
mod search;

pub use config::SearchConfig;
pub use dijkstra::{Cost, DeadlineExpired, Found, shortest_path};
pub use route::{Direction, DistanceRoute, InterchangeRoute, Leg};
pub use search::{Planner, query_min_interchange, query_shortest_distance};
