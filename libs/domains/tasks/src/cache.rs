//! Per-group task cache.
//!
//! A key-value cache with TTL and explicit invalidation, keyed by group
//! id, holding the materialized task list for that group. Backed by Redis
//! in production; the `CacheBackend` seam keeps the region testable.
//!
//! Staleness is bounded two ways: writers invalidate the affected group's
//! entry after every committed mutation, and entries expire after the TTL
//! (60 s) even if an invalidation is somehow missed.

use crate::error::TaskResult;
use crate::models::TaskView;
use crate::store::TaskStore;
use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Default TTL for cached group task lists.
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Storage seam for the cache region.
#[async_trait]
pub trait CacheBackend: Send + Sync {
    async fn get(&self, key: &str) -> TaskResult<Option<String>>;
    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> TaskResult<()>;
    async fn remove(&self, key: &str) -> TaskResult<()>;
}

/// Redis-backed cache storage.
pub struct RedisCache {
    redis: ConnectionManager,
}

impl RedisCache {
    pub fn new(redis: ConnectionManager) -> Self {
        Self { redis }
    }
}

#[async_trait]
impl CacheBackend for RedisCache {
    async fn get(&self, key: &str) -> TaskResult<Option<String>> {
        let mut conn = self.redis.clone();
        let value: Option<String> = redis::cmd("GET").arg(key).query_async(&mut conn).await?;
        Ok(value)
    }

    async fn set_ex(&self, key: &str, value: String, ttl: Duration) -> TaskResult<()> {
        let mut conn = self.redis.clone();
        let _: () = redis::cmd("SET")
            .arg(key)
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async(&mut conn)
            .await?;
        Ok(())
    }

    async fn remove(&self, key: &str) -> TaskResult<()> {
        let mut conn = self.redis.clone();
        let _: i64 = redis::cmd("DEL").arg(key).query_async(&mut conn).await?;
        Ok(())
    }
}

/// The cache region for per-group task lists.
pub struct TaskCache {
    backend: Arc<dyn CacheBackend>,
    ttl: Duration,
    // Coalesces concurrent loads of the same missing group to one store
    // call within this process. One lock per group; the map only grows
    // with the number of distinct groups served.
    inflight: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl TaskCache {
    pub fn new(backend: Arc<dyn CacheBackend>) -> Self {
        Self {
            backend,
            ttl: DEFAULT_CACHE_TTL,
            inflight: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    fn cache_key(group_id: i64) -> String {
        format!("tasks:group:{}", group_id)
    }

    /// Return the group's cached task list, loading it from the store on
    /// a miss and caching the result with the configured TTL.
    pub async fn get_or_load(
        &self,
        group_id: i64,
        store: &dyn TaskStore,
    ) -> TaskResult<Vec<TaskView>> {
        let key = Self::cache_key(group_id);

        if let Some(views) = self.read_cached(&key).await? {
            debug!(group_id, "Cache hit");
            return Ok(views);
        }

        let group_lock = {
            let mut inflight = self.inflight.lock().await;
            inflight.entry(group_id).or_default().clone()
        };
        let _guard = group_lock.lock().await;

        // A concurrent caller may have populated the entry while we
        // waited on the group lock.
        if let Some(views) = self.read_cached(&key).await? {
            debug!(group_id, "Cache populated while waiting");
            return Ok(views);
        }

        debug!(group_id, "Cache miss, loading from store");
        let tasks = store.load_tasks(group_id).await?;
        let views: Vec<TaskView> = tasks.iter().map(TaskView::from).collect();

        self.backend
            .set_ex(&key, serde_json::to_string(&views)?, self.ttl)
            .await?;

        Ok(views)
    }

    /// Drop the group's entry immediately; the next `get_or_load` misses
    /// and reloads from the store.
    pub async fn invalidate(&self, group_id: i64) -> TaskResult<()> {
        debug!(group_id, "Invalidating cached task list");
        self.backend.remove(&Self::cache_key(group_id)).await
    }

    async fn read_cached(&self, key: &str) -> TaskResult<Option<Vec<TaskView>>> {
        let Some(raw) = self.backend.get(key).await? else {
            return Ok(None);
        };

        match serde_json::from_str(&raw) {
            Ok(views) => Ok(Some(views)),
            Err(e) => {
                // A corrupt entry is treated as a miss and overwritten.
                warn!(key, error = %e, "Discarding undecodable cache entry");
                Ok(None)
            }
        }
    }
}
