// ABOUTME: Cache backend that never stores anything
// ABOUTME: Used when caching is disabled so every resolver lookup reads the store
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

use super::{CacheConfig, CacheKey, CacheProvider};
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Cache that drops writes and misses every read
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpCache;

#[async_trait::async_trait]
impl CacheProvider for NoOpCache {
    async fn new(_config: CacheConfig) -> AppResult<Self> {
        Ok(Self)
    }

    async fn set<T: Serialize + Send + Sync>(
        &self,
        _key: &CacheKey,
        _value: &T,
        _ttl: Duration,
    ) -> AppResult<()> {
        Ok(())
    }

    async fn get<T: for<'de> Deserialize<'de>>(&self, _key: &CacheKey) -> AppResult<Option<T>> {
        Ok(None)
    }

    async fn invalidate(&self, _key: &CacheKey) -> AppResult<()> {
        Ok(())
    }

    async fn invalidate_prefix(&self, _prefix: &str) -> AppResult<u64> {
        Ok(0)
    }

    async fn exists(&self, _key: &CacheKey) -> AppResult<bool> {
        Ok(false)
    }

    async fn ttl(&self, _key: &CacheKey) -> AppResult<Option<Duration>> {
        Ok(None)
    }

    async fn clear_all(&self) -> AppResult<()> {
        Ok(())
    }
}
