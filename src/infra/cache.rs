//! Redis cache.
//!
//! JSON values with a TTL (resolved store menus), fixed-window rate
//! limiting counters and the distributed lock that keeps a single loyalty
//! sync worker running at a time.

use redis::{aio::ConnectionManager, AsyncCommands, Client, RedisError};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::config::{
    Config, CACHE_PREFIX_LOCK, CACHE_PREFIX_RATE_LIMIT, CACHE_PREFIX_STORE_MENU,
};
use crate::domain::MenuDetail;
use crate::errors::{AppError, AppResult};

/// Redis cache wrapper over a multiplexed connection manager.
#[derive(Clone)]
pub struct Cache {
    connection: ConnectionManager,
    menu_ttl: u64,
}

impl Cache {
    /// Connect to Redis.
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let client = Client::open(config.redis_url.as_str()).map_err(cache_error)?;
        let connection = ConnectionManager::new(client).await.map_err(cache_error)?;

        tracing::info!("Redis cache connected");

        Ok(Self {
            connection,
            menu_ttl: config.menu_cache_ttl_seconds,
        })
    }

    /// Round-trip to Redis.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;
        Ok(())
    }

    // =========================================================================
    // Generic Cache Operations
    // =========================================================================

    /// Get a value from cache.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> AppResult<Option<T>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(key).await.map_err(cache_error)?;

        match value {
            Some(json) => {
                let parsed = serde_json::from_str(&json).map_err(|e| {
                    AppError::internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    /// Set a value in cache with a TTL in seconds.
    pub async fn set_with_ttl<T: Serialize>(
        &self,
        key: &str,
        value: &T,
        ttl_seconds: u64,
    ) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(value)
            .map_err(|e| AppError::internal(format!("Cache serialization error: {}", e)))?;

        conn.set_ex::<_, _, ()>(key, json, ttl_seconds)
            .await
            .map_err(cache_error)?;

        Ok(())
    }

    /// Delete every key matching a glob pattern. Returns how many were removed.
    pub async fn delete_pattern(&self, pattern: &str) -> AppResult<u64> {
        let mut conn = self.connection.clone();
        let keys: Vec<String> = conn.keys(pattern).await.map_err(cache_error)?;

        if keys.is_empty() {
            return Ok(0);
        }

        let deleted: i64 = conn.del(&keys).await.map_err(cache_error)?;
        Ok(deleted.max(0) as u64)
    }

    // =========================================================================
    // Store menus
    // =========================================================================

    /// Resolved menu of a store, if still cached.
    pub async fn get_store_menu(&self, store_id: Uuid) -> AppResult<Option<MenuDetail>> {
        self.get(&store_menu_key(store_id)).await
    }

    pub async fn set_store_menu(&self, detail: &MenuDetail) -> AppResult<()> {
        self.set_with_ttl(&store_menu_key(detail.store_id), detail, self.menu_ttl)
            .await
    }

    /// Drop every cached store menu.
    ///
    /// Menu edits can change the resolution of any store of the brand, and
    /// entries expire within a minute anyway.
    pub async fn invalidate_store_menus(&self) -> AppResult<()> {
        let removed = self
            .delete_pattern(&format!("{}*", CACHE_PREFIX_STORE_MENU))
            .await?;
        tracing::debug!(removed, "Store menu cache invalidated");
        Ok(())
    }

    // =========================================================================
    // Rate Limiting Operations
    // =========================================================================

    /// Increment the counter of the current window.
    /// Returns `(current_count, is_allowed)`.
    pub async fn check_rate_limit(
        &self,
        identifier: &str,
        max_requests: u64,
        window_seconds: u64,
    ) -> AppResult<(u64, bool)> {
        let key = format!("{}{}", CACHE_PREFIX_RATE_LIMIT, identifier);
        let mut conn = self.connection.clone();

        let (count,): (i64,) = rate_limit_pipeline(&key, window_seconds)
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;

        let count = count.max(0) as u64;
        Ok((count, count <= max_requests))
    }

    // =========================================================================
    // Distributed Lock Operations
    // =========================================================================

    /// Try to take a lock once. Returns None if someone else holds it.
    pub async fn try_acquire_lock(
        &self,
        resource: &str,
        ttl_seconds: u64,
    ) -> AppResult<Option<LockGuard>> {
        let key = format!("{}{}", CACHE_PREFIX_LOCK, resource);
        let lock_id = Uuid::new_v4().to_string();
        let mut conn = self.connection.clone();

        let acquired: Option<String> = redis::cmd("SET")
            .arg(&key)
            .arg(&lock_id)
            .arg("NX")
            .arg("EX")
            .arg(ttl_seconds)
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;

        if acquired.is_some() {
            tracing::debug!(resource = %resource, lock_id = %lock_id, "Lock acquired");
            Ok(Some(LockGuard {
                cache: Arc::new(self.clone()),
                key,
                lock_id,
                released: false,
            }))
        } else {
            Ok(None)
        }
    }

    /// Delete the lock only if `lock_id` still owns it.
    async fn release_lock(&self, key: &str, lock_id: &str) -> AppResult<bool> {
        let mut conn = self.connection.clone();

        let script = r#"
            if redis.call("GET", KEYS[1]) == ARGV[1] then
                return redis.call("DEL", KEYS[1])
            else
                return 0
            end
        "#;

        let released: i32 = redis::cmd("EVAL")
            .arg(script)
            .arg(1)
            .arg(key)
            .arg(lock_id)
            .query_async(&mut conn)
            .await
            .map_err(cache_error)?;

        Ok(released == 1)
    }
}

/// `SET NX EX` opens the window with its TTL and `INCR` keeps it, all in
/// one MULTI block so a counter never outlives its window.
fn rate_limit_pipeline(key: &str, window_seconds: u64) -> redis::Pipeline {
    let mut pipe = redis::pipe();
    pipe.atomic()
        .cmd("SET")
        .arg(key)
        .arg(0)
        .arg("NX")
        .arg("EX")
        .arg(window_seconds)
        .ignore()
        .cmd("INCR")
        .arg(key);
    pipe
}

fn store_menu_key(store_id: Uuid) -> String {
    format!("{}{}", CACHE_PREFIX_STORE_MENU, store_id)
}

// =============================================================================
// Lock Guard (RAII)
// =============================================================================

/// Held distributed lock. Released on drop if not released explicitly.
pub struct LockGuard {
    cache: Arc<Cache>,
    key: String,
    lock_id: String,
    released: bool,
}

impl LockGuard {
    pub async fn release(mut self) -> AppResult<()> {
        self.released = true;
        if self.cache.release_lock(&self.key, &self.lock_id).await? {
            tracing::debug!(key = %self.key, "Lock released");
        }
        Ok(())
    }
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        if !self.released {
            let cache = self.cache.clone();
            let key = self.key.clone();
            let lock_id = self.lock_id.clone();

            tokio::spawn(async move {
                if let Err(e) = cache.release_lock(&key, &lock_id).await {
                    tracing::error!(key = %key, error = %e, "Failed to release lock on drop");
                }
            });
        }
    }
}

fn cache_error(e: RedisError) -> AppError {
    tracing::error!("Redis error: {}", e);
    AppError::internal(format!("Cache error: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_menu_keys_are_prefixed() {
        let id = Uuid::nil();
        assert_eq!(
            store_menu_key(id),
            "menu:store:00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn rate_limit_window_opens_with_its_ttl_atomically() {
        let packed = rate_limit_pipeline("ratelimit:login:10.0.0.1", 60).get_packed_pipeline();
        let text = String::from_utf8(packed).unwrap();

        let multi = text.find("MULTI").unwrap();
        let set = text.find("SET").unwrap();
        let incr = text.find("INCR").unwrap();
        let exec = text.find("EXEC").unwrap();
        assert!(multi < set && set < incr && incr < exec);
        assert!(text.contains("NX"));
        assert!(text.contains("EX"));
        assert!(text.contains("60"));
    }
}
