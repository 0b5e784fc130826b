// ABOUTME: Cache abstraction for entity candidate lists used by fuzzy name resolution
// ABOUTME: Pluggable backends (in-memory LRU, disabled) injected into the resolver
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

/// Cache factory selecting a backend from configuration
pub mod factory;
/// In-memory cache implementation
pub mod memory;
/// Cache backend that stores nothing
pub mod noop;

pub use factory::Cache;
pub use memory::InMemoryCache;
pub use noop::NoOpCache;

use crate::constants::cache::{
    CACHE_KEY_PREFIX, DEFAULT_CACHE_MAX_ENTRIES, DEFAULT_CLEANUP_INTERVAL_SECS,
    TTL_ENTITY_LIST_SECS,
};
use crate::errors::AppResult;
use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::time::Duration;
use uuid::Uuid;

/// Cache provider trait for pluggable backend implementations
///
/// Writes to the entity store must call [`CacheProvider::invalidate`] for the
/// affected list before returning, so a follow-up read in the same session
/// sees the new entity.
///
/// # Examples
///
/// ```rust,no_run
/// use repcoach::cache::{CacheConfig, CacheKey, CacheProvider};
/// use repcoach::cache::memory::InMemoryCache;
/// use std::time::Duration;
/// # async fn example() -> Result<(), repcoach::errors::AppError> {
///
/// let config = CacheConfig {
///     enable_background_cleanup: false,
///     ..Default::default()
/// };
/// let cache = InMemoryCache::new(config).await?;
///
/// let key = CacheKey::routines("user_123");
/// cache.set(&key, &vec!["Push Day".to_owned()], Duration::from_secs(30)).await?;
///
/// let cached: Option<Vec<String>> = cache.get(&key).await?;
/// assert!(cached.is_some());
///
/// cache.invalidate(&key).await?;
/// # Ok(())
/// # }
/// ```
#[async_trait::async_trait]
pub trait CacheProvider: Send + Sync + Clone {
    /// Create new cache instance with configuration
    ///
    /// # Errors
    ///
    /// Returns an error if cache initialization fails
    async fn new(config: CacheConfig) -> AppResult<Self>
    where
        Self: Sized;

    /// Store value in cache with TTL
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or storage fails
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &CacheKey,
        value: &T,
        ttl: Duration,
    ) -> AppResult<()>;

    /// Retrieve value from cache (`None` when absent or expired)
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails
    async fn get<T: for<'de> Deserialize<'de>>(&self, key: &CacheKey) -> AppResult<Option<T>>;

    /// Remove single cache entry
    ///
    /// # Errors
    ///
    /// Returns an error if invalidation fails
    async fn invalidate(&self, key: &CacheKey) -> AppResult<()>;

    /// Remove all cache entries whose key starts with `prefix`
    ///
    /// # Errors
    ///
    /// Returns an error if prefix invalidation fails
    async fn invalidate_prefix(&self, prefix: &str) -> AppResult<u64>;

    /// Check if key exists in cache
    ///
    /// # Errors
    ///
    /// Returns an error if existence check fails
    async fn exists(&self, key: &CacheKey) -> AppResult<bool>;

    /// Get remaining TTL for key
    ///
    /// # Errors
    ///
    /// Returns an error if TTL check fails
    async fn ttl(&self, key: &CacheKey) -> AppResult<Option<Duration>>;

    /// Clear all cache entries (for testing/admin)
    ///
    /// # Errors
    ///
    /// Returns an error if clear operation fails
    async fn clear_all(&self) -> AppResult<()>;
}

/// Which cache backend to build
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CacheBackend {
    /// Process-local LRU with TTL
    #[default]
    Memory,
    /// No caching, every lookup reads the store
    Disabled,
}

impl CacheBackend {
    /// Environment variable for backend selection
    pub const ENV_VAR: &'static str = "REPCOACH_CACHE_BACKEND";

    /// Parse from string with fallback to default
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "none" | "disabled" | "off" | "noop" => Self::Disabled,
            _ => Self::Memory,
        }
    }
}

/// Cache configuration
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Backend to build
    pub backend: CacheBackend,
    /// Maximum number of entries (for in-memory cache)
    pub max_entries: usize,
    /// Cleanup interval for expired entries
    pub cleanup_interval: Duration,
    /// Enable background cleanup task (should be false in tests to avoid runtime conflicts)
    pub enable_background_cleanup: bool,
    /// Cache TTL configuration
    pub ttl: CacheTtlConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            backend: CacheBackend::default(),
            max_entries: DEFAULT_CACHE_MAX_ENTRIES,
            cleanup_interval: Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
            enable_background_cleanup: true,
            ttl: CacheTtlConfig::default(),
        }
    }
}

impl CacheConfig {
    /// Load cache configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            backend: env::var(CacheBackend::ENV_VAR)
                .map(|s| CacheBackend::from_str_or_default(&s))
                .unwrap_or_default(),
            max_entries: env::var("CACHE_MAX_ENTRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_CACHE_MAX_ENTRIES),
            cleanup_interval: env::var("CACHE_CLEANUP_INTERVAL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map_or_else(
                    || Duration::from_secs(DEFAULT_CLEANUP_INTERVAL_SECS),
                    Duration::from_secs,
                ),
            enable_background_cleanup: true,
            ttl: CacheTtlConfig::from_env(),
        }
    }
}

/// Cache TTL configuration for different resource types
#[derive(Debug, Clone)]
pub struct CacheTtlConfig {
    /// Routine/workout candidate list TTL in seconds (default: 30 seconds)
    pub entity_list_secs: u64,
}

impl Default for CacheTtlConfig {
    fn default() -> Self {
        Self {
            entity_list_secs: TTL_ENTITY_LIST_SECS,
        }
    }
}

impl CacheTtlConfig {
    /// Load cache TTL configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            entity_list_secs: env::var("CACHE_TTL_ENTITY_LIST_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(TTL_ENTITY_LIST_SECS),
        }
    }

    /// Get TTL duration for a specific cache resource type
    #[must_use]
    pub const fn ttl_for_resource(&self, resource: &CacheResource) -> Duration {
        match resource {
            CacheResource::RoutineList | CacheResource::WorkoutList { .. } => {
                Duration::from_secs(self.entity_list_secs)
            }
        }
    }
}

/// Structured cache key with per-user isolation
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Owner of the cached data
    pub user_id: String,
    /// Specific resource being cached
    pub resource: CacheResource,
}

impl CacheKey {
    /// Create new cache key
    #[must_use]
    pub fn new(user_id: impl Into<String>, resource: CacheResource) -> Self {
        Self {
            user_id: user_id.into(),
            resource,
        }
    }

    /// Key for a user's routine candidate list
    #[must_use]
    pub fn routines(user_id: impl Into<String>) -> Self {
        Self::new(user_id, CacheResource::RoutineList)
    }

    /// Key for a routine's workout candidate list
    #[must_use]
    pub fn workouts(user_id: impl Into<String>, routine_id: Uuid) -> Self {
        Self::new(user_id, CacheResource::WorkoutList { routine_id })
    }

    /// Prefix covering every entry cached for a user
    #[must_use]
    pub fn user_prefix(user_id: &str) -> String {
        format!("{CACHE_KEY_PREFIX}user:{user_id}:")
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", Self::user_prefix(&self.user_id), self.resource)
    }
}

/// Cache resource types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum CacheResource {
    /// All routines owned by the user
    RoutineList,
    /// All workouts under one routine
    WorkoutList {
        /// Routine ID
        routine_id: Uuid,
    },
}

impl fmt::Display for CacheResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RoutineList => write!(f, "routines"),
            Self::WorkoutList { routine_id } => write!(f, "routine:{routine_id}:workouts"),
        }
    }
}
