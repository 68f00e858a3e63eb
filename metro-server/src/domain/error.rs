//! Query error types.
//!
//! Every failed query is reported through one of these values; no query
//! substitutes an empty path for a failed search.

use super::CanonicalId;

/// Errors returned by station lookups and route queries.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum QueryError {
    /// The name or index does not refer to a registered station
    #[error("unknown station: {0}")]
    UnknownStation(String),

    /// The stations lie in disconnected parts of the searched graph
    #[error("no path from {from} to {to}")]
    NoPath { from: CanonicalId, to: CanonicalId },

    /// The per-query deadline expired before the search settled
    #[error("search timed out")]
    Timeout,
}
