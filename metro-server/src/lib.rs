//! Metro route planner server.
//!
//! Loads a metro network from an edge list and answers two questions about
//! any pair of stations: what is the shortest route by distance, and what is
//! the route with the fewest line changes. Both come with a fare.
//!
//! ```
//! use metro_server::fare::FareTable;
//! use metro_server::network::{EdgeRecord, GraphSnapshot};
//! use metro_server::planner::query_min_interchange;
//!
//! let records = vec![
//!     EdgeRecord::new("A_red", "B_(interchange red blue)", 3.0),
//!     EdgeRecord::new("B_(interchange red blue)", "C_blue", 4.0),
//! ];
//! let snapshot = GraphSnapshot::from_records(records, FareTable::delhi_metro());
//!
//! let route = query_min_interchange(&snapshot, "A", "C").unwrap();
//! assert_eq!(route.interchanges, 1);
//! assert_eq!(route.fare, 30);
//! ```

pub mod cache;
pub mod config;
pub mod domain;
pub mod fare;
pub mod network;
pub mod planner;
pub mod web;
