// ABOUTME: In-memory cache implementation with LRU eviction and TTL support
// ABOUTME: Includes optional background cleanup task for expired entries
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

use super::{CacheConfig, CacheKey, CacheProvider};
use crate::errors::AppResult;
use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{mpsc, RwLock};

/// In-memory cache entry with expiration
#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<u8>,
    expires_at: Instant,
}

impl CacheEntry {
    fn new(data: Vec<u8>, ttl: Duration) -> Self {
        Self {
            data,
            expires_at: Instant::now() + ttl,
        }
    }

    fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }

    fn remaining_ttl(&self) -> Option<Duration> {
        self.expires_at.checked_duration_since(Instant::now())
    }
}

type Store = Arc<RwLock<LruCache<String, CacheEntry>>>;

/// In-memory cache with LRU eviction and background cleanup
///
/// The store sits behind `Arc<RwLock<_>>` because the cleanup task spawned in
/// `new_with_config` shares it. Process-local only: in a multi-instance
/// deployment each instance sees its own entries.
#[derive(Clone)]
pub struct InMemoryCache {
    store: Store,
    shutdown_tx: Option<Arc<mpsc::Sender<()>>>,
}

impl InMemoryCache {
    /// Default cache capacity when config specifies zero entries
    const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1000) {
        Some(n) => n,
        None => unreachable!(),
    };

    /// Create new in-memory cache with optional background cleanup task
    fn new_with_config(config: &CacheConfig) -> Self {
        let capacity =
            NonZeroUsize::new(config.max_entries).unwrap_or(Self::DEFAULT_CACHE_CAPACITY);

        let store = Arc::new(RwLock::new(LruCache::new(capacity)));

        let shutdown_tx = if config.enable_background_cleanup {
            let (shutdown_tx, mut shutdown_rx) = mpsc::channel::<()>(1);
            let store_clone = store.clone();
            let cleanup_interval = config.cleanup_interval;

            tokio::spawn(async move {
                let mut interval = tokio::time::interval(cleanup_interval);
                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            Self::cleanup_expired(&store_clone).await;
                        }
                        _ = shutdown_rx.recv() => {
                            tracing::debug!("Cache cleanup task received shutdown signal");
                            break;
                        }
                    }
                }
            });

            Some(Arc::new(shutdown_tx))
        } else {
            None
        };

        Self { store, shutdown_tx }
    }

    /// Remove all expired entries from cache
    async fn cleanup_expired(store: &Store) {
        let mut store_guard = store.write().await;

        let expired_keys: Vec<String> = store_guard
            .iter()
            .filter(|(_, v)| v.is_expired())
            .map(|(k, _)| k.clone())
            .collect();

        for key in &expired_keys {
            store_guard.pop(key);
        }
        drop(store_guard);

        if !expired_keys.is_empty() {
            tracing::debug!("Cleaned up {} expired cache entries", expired_keys.len());
        }
    }
}

#[async_trait::async_trait]
impl CacheProvider for InMemoryCache {
    async fn new(config: CacheConfig) -> AppResult<Self> {
        Ok(Self::new_with_config(&config))
    }

    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        let serialized = serde_json::to_vec(value)?;
        let entry = CacheEntry::new(serialized, ttl);

        // LruCache handles eviction automatically on push
        self.store.write().await.push(key.to_string(), entry);

        Ok(())
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        let key = key.to_string();
        let mut store = self.store.write().await;

        // LruCache::get is mutable (updates access order for LRU)
        let data = match store.get(&key) {
            None => return Ok(None),
            Some(entry) if entry.is_expired() => None,
            Some(entry) => Some(entry.data.clone()),
        };

        let Some(data) = data else {
            store.pop(&key);
            return Ok(None);
        };
        drop(store);

        Ok(Some(serde_json::from_slice(&data)?))
    }

    async fn invalidate(&self, key: &CacheKey) -> AppResult<()> {
        self.store.write().await.pop(&key.to_string());
        Ok(())
    }

    async fn invalidate_prefix(&self, prefix: &str) -> AppResult<u64> {
        let mut store = self.store.write().await;

        let keys_to_remove: Vec<String> = store
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(k, _)| k.clone())
            .collect();

        for key in &keys_to_remove {
            store.pop(key);
        }
        drop(store);

        Ok(keys_to_remove.len() as u64)
    }

    async fn exists(&self, key: &CacheKey) -> AppResult<bool> {
        let key = key.to_string();
        let mut store = self.store.write().await;

        let expired = match store.peek(&key) {
            Some(entry) => entry.is_expired(),
            None => return Ok(false),
        };

        if expired {
            store.pop(&key);
            return Ok(false);
        }
        Ok(true)
    }

    async fn ttl(&self, key: &CacheKey) -> AppResult<Option<Duration>> {
        let store = self.store.read().await;

        // peek avoids updating LRU order
        Ok(store
            .peek(&key.to_string())
            .filter(|entry| !entry.is_expired())
            .and_then(CacheEntry::remaining_ttl))
    }

    async fn clear_all(&self) -> AppResult<()> {
        self.store.write().await.clear();
        Ok(())
    }
}

impl Drop for InMemoryCache {
    fn drop(&mut self) {
        // Only the last clone holds the sole Arc to the sender
        if let Some(tx) = &self.shutdown_tx {
            if Arc::strong_count(tx) == 1 {
                if let Err(e) = tx.try_send(()) {
                    tracing::debug!(error = ?e, "Cache shutdown signal send failed (channel likely closed)");
                }
            }
        }
    }
}
