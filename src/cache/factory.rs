// ABOUTME: Cache factory for configuration-based backend selection
// ABOUTME: Wraps the in-memory and disabled backends behind one concrete type
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

use super::memory::InMemoryCache;
use super::noop::NoOpCache;
use super::{CacheBackend, CacheConfig, CacheKey, CacheProvider};
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Unified cache interface
///
/// A distributed backend slots in as another variant without touching the
/// resolver, which only sees [`CacheProvider`].
#[derive(Clone)]
pub enum Cache {
    /// Process-local LRU cache
    Memory(InMemoryCache),
    /// Caching disabled
    Disabled(NoOpCache),
}

impl Cache {
    /// Create cache from environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if cache initialization fails
    pub async fn from_env() -> AppResult<Self> {
        <Self as CacheProvider>::new(CacheConfig::from_env()).await
    }

    /// Cache with caching turned off
    #[must_use]
    pub const fn disabled() -> Self {
        Self::Disabled(NoOpCache)
    }
}

#[async_trait::async_trait]
impl CacheProvider for Cache {
    async fn new(config: CacheConfig) -> AppResult<Self> {
        match config.backend {
            CacheBackend::Memory => {
                tracing::info!(
                    "Initializing in-memory cache (max entries: {})",
                    config.max_entries
                );
                Ok(Self::Memory(InMemoryCache::new(config).await?))
            }
            CacheBackend::Disabled => {
                tracing::info!("Entity list caching disabled");
                Ok(Self::disabled())
            }
        }
    }

    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()> {
        match self {
            Self::Memory(inner) => inner.set(key, value, ttl).await,
            Self::Disabled(inner) => inner.set(key, value, ttl).await,
        }
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> AppResult<Option<T>> {
        match self {
            Self::Memory(inner) => inner.get(key).await,
            Self::Disabled(inner) => inner.get(key).await,
        }
    }

    async fn invalidate(&self, key: &CacheKey) -> AppResult<()> {
        match self {
            Self::Memory(inner) => inner.invalidate(key).await,
            Self::Disabled(inner) => inner.invalidate(key).await,
        }
    }

    async fn invalidate_prefix(&self, prefix: &str) -> AppResult<u64> {
        match self {
            Self::Memory(inner) => inner.invalidate_prefix(prefix).await,
            Self::Disabled(inner) => inner.invalidate_prefix(prefix).await,
        }
    }

    async fn exists(&self, key: &CacheKey) -> AppResult<bool> {
        match self {
            Self::Memory(inner) => inner.exists(key).await,
            Self::Disabled(inner) => inner.exists(key).await,
        }
    }

    async fn ttl(&self, key: &CacheKey) -> AppResult<Option<Duration>> {
        match self {
            Self::Memory(inner) => inner.ttl(key).await,
            Self::Disabled(inner) => inner.ttl(key).await,
        }
    }

    async fn clear_all(&self) -> AppResult<()> {
        match self {
            Self::Memory(inner) => inner.clear_all().await,
            Self::Disabled(inner) => inner.clear_all().await,
        }
    }
}
