//! Caching layer for route queries.
//!
//! The snapshot never changes once built, so a cached route stays correct
//! for as long as the snapshot is served. The TTL and capacity only bound
//! memory. Failed queries are never cached.
//!
//! Searches are CPU-bound, so they run on tokio's blocking pool rather than
//! on the async worker threads.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache as MokaCache;
use tokio::task::JoinError;
use tracing::trace;

use crate::domain::{CanonicalId, QueryError};
use crate::network::GraphSnapshot;
use crate::planner::{DistanceRoute, InterchangeRoute, Planner, SearchConfig};

/// Cache key: (origin, destination) canonical ids.
type RouteKey = (CanonicalId, CanonicalId);

/// Errors from a cached route query.
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    #[error(transparent)]
    Query(#[from] QueryError),

    /// The search task panicked or was cancelled
    #[error("route search failed: {0}")]
    Task(#[from] JoinError),
}

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries per query kind.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(600),
            max_capacity: 10_000,
        }
    }
}

/// Cache for route results, one map per query kind.
pub struct RouteCache {
    distance: MokaCache<RouteKey, Arc<DistanceRoute>>,
    interchange: MokaCache<RouteKey, Arc<InterchangeRoute>>,
}

impl RouteCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig) -> Self {
        let distance = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();
        let interchange = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self {
            distance,
            interchange,
        }
    }

    pub async fn get_distance(&self, key: &RouteKey) -> Option<Arc<DistanceRoute>> {
        self.distance.get(key).await
    }

    pub async fn insert_distance(&self, key: RouteKey, route: Arc<DistanceRoute>) {
        self.distance.insert(key, route).await;
    }

    pub async fn get_interchange(&self, key: &RouteKey) -> Option<Arc<InterchangeRoute>> {
        self.interchange.get(key).await
    }

    pub async fn insert_interchange(&self, key: RouteKey, route: Arc<InterchangeRoute>) {
        self.interchange.insert(key, route).await;
    }

    /// Approximate number of cached routes of both kinds.
    pub fn entry_count(&self) -> u64 {
        self.distance.entry_count() + self.interchange.entry_count()
    }
}

/// Route planner with caching.
///
/// Owns the snapshot it plans over and memoizes successful routes.
pub struct CachedPlanner {
    snapshot: Arc<GraphSnapshot>,
    config: SearchConfig,
    cache: RouteCache,
}

impl CachedPlanner {
    /// Create a new cached planner.
    pub fn new(snapshot: Arc<GraphSnapshot>, config: SearchConfig, cache_config: &CacheConfig) -> Self {
        Self {
            snapshot,
            config,
            cache: RouteCache::new(cache_config),
        }
    }

    /// The snapshot being planned over.
    pub fn snapshot(&self) -> &GraphSnapshot {
        &self.snapshot
    }

    fn key(&self, from: &str, to: &str) -> Result<RouteKey, QueryError> {
        Ok((self.snapshot.lookup(from)?, self.snapshot.lookup(to)?))
    }

    /// Run a planner query on the blocking pool.
    async fn plan<T, F>(&self, query: F) -> Result<T, PlanError>
    where
        T: Send + 'static,
        F: FnOnce(Planner<'_>) -> Result<T, QueryError> + Send + 'static,
    {
        let snapshot = Arc::clone(&self.snapshot);
        let config = self.config.clone();
        let result =
            tokio::task::spawn_blocking(move || query(Planner::new(&snapshot, &config))).await?;
        Ok(result?)
    }

    /// Minimum-distance route, using cache if available.
    pub async fn shortest_by_distance(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Arc<DistanceRoute>, PlanError> {
        let key = self.key(from, to)?;

        if let Some(cached) = self.cache.get_distance(&key).await {
            trace!(from = %key.0, to = %key.1, "distance route cache hit");
            return Ok(cached);
        }

        let (start, end) = key.clone();
        let route = self
            .plan(move |planner| planner.shortest_by_distance(start.as_str(), end.as_str()))
            .await?;
        let route = Arc::new(route);
        self.cache.insert_distance(key, route.clone()).await;
        trace!(entries = self.cache.entry_count(), "distance route cached");

        Ok(route)
    }

    /// Minimum-interchange route, using cache if available.
    pub async fn shortest_by_interchanges(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Arc<InterchangeRoute>, PlanError> {
        let key = self.key(from, to)?;

        if let Some(cached) = self.cache.get_interchange(&key).await {
            trace!(from = %key.0, to = %key.1, "interchange route cache hit");
            return Ok(cached);
        }

        let (start, end) = key.clone();
        let route = self
            .plan(move |planner| planner.shortest_by_interchanges(start.as_str(), end.as_str()))
            .await?;
        let route = Arc::new(route);
        self.cache.insert_interchange(key, route.clone()).await;
        trace!(entries = self.cache.entry_count(), "interchange route cached");

        Ok(route)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fare::FareTable;
    use crate::network::EdgeRecord;

    fn planner() -> CachedPlanner {
        let records = vec![
            EdgeRecord::new("A_red", "B_(interchange red blue)", 3.0),
            EdgeRecord::new("B_(interchange red blue)", "C_blue", 4.0),
            EdgeRecord::new("D_green", "E_green", 1.0),
        ];
        let snapshot = GraphSnapshot::from_records(records, FareTable::delhi_metro());
        CachedPlanner::new(
            Arc::new(snapshot),
            SearchConfig::new(None, false),
            &CacheConfig::default(),
        )
    }

    #[test]
    fn default_config() {
        let config = CacheConfig::default();
        assert_eq!(config.ttl, Duration::from_secs(600));
        assert_eq!(config.max_capacity, 10_000);
    }

    #[tokio::test]
    async fn cached_route_is_shared() {
        let planner = planner();

        let first = planner.shortest_by_distance("A", "C").await.unwrap();
        // Different spelling, same canonical key.
        let second = planner.shortest_by_distance("a_red", "C").await.unwrap();

        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(second.distance, 7.0);
    }

    #[tokio::test]
    async fn interchange_routes_are_cached_separately() {
        let planner = planner();

        let route = planner.shortest_by_interchanges("A", "C").await.unwrap();
        assert_eq!(route.interchanges, 1);

        let again = planner.shortest_by_interchanges("A", "C").await.unwrap();
        assert!(Arc::ptr_eq(&route, &again));

        let distance = planner.shortest_by_distance("A", "C").await.unwrap();
        assert_eq!(distance.path.len(), 3);
    }

    #[tokio::test]
    async fn failures_are_not_cached() {
        let planner = planner();

        assert!(matches!(
            planner.shortest_by_distance("A", "E").await,
            Err(PlanError::Query(QueryError::NoPath { .. }))
        ));
        assert!(matches!(
            planner.shortest_by_distance("A", "Atlantis").await,
            Err(PlanError::Query(QueryError::UnknownStation(_)))
        ));
        planner.cache.distance.run_pending_tasks().await;
        assert_eq!(planner.cache.entry_count(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn searches_run_off_the_async_workers() {
        let planner = Arc::new(planner());

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let planner = Arc::clone(&planner);
                tokio::spawn(async move { planner.shortest_by_interchanges("A", "C").await })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap().interchanges, 1);
        }
    }
}
