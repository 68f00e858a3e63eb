//! Search configuration for the route planner.

use std::time::{Duration, Instant};

/// Configuration parameters for route queries.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Per-query deadline (milliseconds).
    /// `None` lets a search run to completion.
    pub deadline_ms: Option<u64>,

    /// Run the per-line-pair searches of a minimum-interchange query on the
    /// rayon thread pool. Only latency changes; the result is identical.
    pub parallel_pairs: bool,
}

impl SearchConfig {
    /// Create a new configuration with the given parameters.
    pub fn new(deadline_ms: Option<u64>, parallel_pairs: bool) -> Self {
        Self {
            deadline_ms,
            parallel_pairs,
        }
    }

    /// Returns the deadline as a Duration.
    pub fn deadline(&self) -> Option<Duration> {
        self.deadline_ms.map(Duration::from_millis)
    }

    /// Instant at which a query starting now must give up.
    pub fn deadline_from_now(&self) -> Option<Instant> {
        self.deadline().map(|d| Instant::now() + d)
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            deadline_ms: Some(2000),
            parallel_pairs: true,
        }
    }
}
