// ABOUTME: Unit tests for in-memory cache implementation
// ABOUTME: Tests TTL expiration, capacity limits, per-user prefix invalidation and the disabled backend
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use anyhow::Result;
use repcoach::cache::{
    Cache, CacheBackend, CacheConfig, CacheKey, CacheProvider, CacheResource, CacheTtlConfig,
};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
struct TestData {
    value: String,
    count: u32,
}

/// Helper: Create in-memory cache with custom config
async fn create_test_cache(max_entries: usize, cleanup_interval_secs: u64) -> Result<Cache> {
    let config = CacheConfig {
        backend: CacheBackend::Memory,
        max_entries,
        cleanup_interval: Duration::from_secs(cleanup_interval_secs),
        enable_background_cleanup: false, // Disable in tests to avoid tokio runtime conflicts
        ttl: CacheTtlConfig::default(),
    };
    Ok(Cache::new(config).await?)
}

fn sample(value: &str) -> TestData {
    TestData {
        value: value.to_owned(),
        count: 1,
    }
}

#[tokio::test]
async fn test_cache_set_and_get() -> Result<()> {
    let cache = create_test_cache(100, 300).await?;
    let key = CacheKey::routines("alice");
    let data = TestData {
        value: "test".to_owned(),
        count: 42,
    };

    cache.set(&key, &data, Duration::from_secs(10)).await?;

    let retrieved: Option<TestData> = cache.get(&key).await?;
    assert_eq!(retrieved, Some(data));

    Ok(())
}

#[tokio::test]
async fn test_cache_expiration() -> Result<()> {
    let cache = create_test_cache(100, 300).await?;
    let key = CacheKey::routines("alice");

    // Set value with 1-second TTL
    cache.set(&key, &sample("expires"), Duration::from_secs(1)).await?;
    assert!(cache.exists(&key).await?);

    tokio::time::sleep(Duration::from_millis(1100)).await;

    let retrieved: Option<TestData> = cache.get(&key).await?;
    assert_eq!(retrieved, None);
    assert!(!cache.exists(&key).await?);

    Ok(())
}

#[tokio::test]
async fn test_cache_ttl() -> Result<()> {
    let cache = create_test_cache(100, 300).await?;
    let key = CacheKey::routines("alice");

    cache.set(&key, &sample("ttl_test"), Duration::from_secs(10)).await?;

    let ttl = cache.ttl(&key).await?.unwrap();
    assert!(ttl.as_secs() <= 10);
    assert!(ttl.as_secs() >= 9);

    Ok(())
}

#[tokio::test]
async fn test_cache_invalidate() -> Result<()> {
    let cache = create_test_cache(100, 300).await?;
    let key = CacheKey::routines("alice");

    cache.set(&key, &sample("delete_me"), Duration::from_secs(60)).await?;
    assert!(cache.exists(&key).await?);

    cache.invalidate(&key).await?;
    assert!(!cache.exists(&key).await?);

    Ok(())
}

#[tokio::test]
async fn test_cache_user_prefix_invalidation() -> Result<()> {
    let cache = create_test_cache(100, 300).await?;
    let routine_id = Uuid::new_v4();

    let alice_routines = CacheKey::routines("alice");
    let alice_workouts = CacheKey::workouts("alice", routine_id);
    let bob_routines = CacheKey::routines("bob");

    for key in [&alice_routines, &alice_workouts, &bob_routines] {
        cache.set(key, &sample("list"), Duration::from_secs(60)).await?;
    }

    let removed = cache
        .invalidate_prefix(&CacheKey::user_prefix("alice"))
        .await?;
    assert_eq!(removed, 2);

    assert!(!cache.exists(&alice_routines).await?);
    assert!(!cache.exists(&alice_workouts).await?);
    assert!(cache.exists(&bob_routines).await?);

    Ok(())
}

#[tokio::test]
async fn test_user_prefix_does_not_match_longer_user_ids() -> Result<()> {
    let cache = create_test_cache(100, 300).await?;
    let ann = CacheKey::routines("ann");
    let anna = CacheKey::routines("anna");

    cache.set(&ann, &sample("a"), Duration::from_secs(60)).await?;
    cache.set(&anna, &sample("b"), Duration::from_secs(60)).await?;

    cache
        .invalidate_prefix(&CacheKey::user_prefix("ann"))
        .await?;

    assert!(!cache.exists(&ann).await?);
    assert!(cache.exists(&anna).await?);

    Ok(())
}

#[tokio::test]
async fn test_cache_capacity_eviction() -> Result<()> {
    let cache = create_test_cache(10, 300).await?;
    let keys: Vec<_> = (0..20)
        .map(|_| CacheKey::workouts("alice", Uuid::new_v4()))
        .collect();

    for key in &keys {
        cache.set(key, &sample("capacity"), Duration::from_secs(60)).await?;
    }

    let mut count = 0;
    for key in &keys {
        if cache.exists(key).await? {
            count += 1;
        }
    }
    assert_eq!(count, 10);

    // Least recently used entries are the ones evicted
    assert!(!cache.exists(&keys[0]).await?);
    assert!(cache.exists(&keys[19]).await?);

    Ok(())
}

#[tokio::test]
async fn test_cache_background_cleanup() -> Result<()> {
    let config = CacheConfig {
        backend: CacheBackend::Memory,
        max_entries: 100,
        cleanup_interval: Duration::from_secs(1),
        enable_background_cleanup: true,
        ttl: CacheTtlConfig::default(),
    };
    let cache = Cache::new(config).await?;

    let keys: Vec<_> = (0..5)
        .map(|_| CacheKey::workouts("alice", Uuid::new_v4()))
        .collect();
    for key in &keys {
        cache.set(key, &sample("cleanup"), Duration::from_secs(1)).await?;
    }
    for key in &keys {
        assert!(cache.exists(key).await?);
    }

    // 1s TTL + 1s cleanup interval + margin
    tokio::time::sleep(Duration::from_millis(2500)).await;

    for key in &keys {
        assert!(!cache.exists(key).await?);
    }

    Ok(())
}

#[tokio::test]
async fn test_cache_clear_all() -> Result<()> {
    let cache = create_test_cache(100, 300).await?;
    let keys = [CacheKey::routines("alice"), CacheKey::routines("bob")];
    for key in &keys {
        cache.set(key, &sample("clear"), Duration::from_secs(60)).await?;
    }

    cache.clear_all().await?;

    for key in &keys {
        assert!(!cache.exists(key).await?);
    }

    Ok(())
}

#[tokio::test]
async fn test_disabled_cache_never_hits() -> Result<()> {
    let config = CacheConfig {
        backend: CacheBackend::Disabled,
        ..CacheConfig::default()
    };
    let cache = Cache::new(config).await?;
    let key = CacheKey::routines("alice");

    cache.set(&key, &sample("ignored"), Duration::from_secs(60)).await?;

    let retrieved: Option<TestData> = cache.get(&key).await?;
    assert_eq!(retrieved, None);
    assert!(!cache.exists(&key).await?);

    Ok(())
}

#[test]
fn test_cache_key_format() {
    let routine_id = Uuid::nil();
    assert_eq!(
        CacheKey::routines("alice").to_string(),
        "repcoach:user:alice:routines"
    );
    assert_eq!(
        CacheKey::workouts("alice", routine_id).to_string(),
        format!("repcoach:user:alice:routine:{routine_id}:workouts")
    );
}

#[test]
fn test_entity_list_ttl() {
    let ttl = CacheTtlConfig {
        entity_list_secs: 45,
    };
    assert_eq!(
        ttl.ttl_for_resource(&CacheResource::RoutineList),
        Duration::from_secs(45)
    );
    assert_eq!(
        ttl.ttl_for_resource(&CacheResource::WorkoutList {
            routine_id: Uuid::new_v4()
        }),
        Duration::from_secs(45)
    );
}

#[test]
fn test_backend_parsing() {
    assert_eq!(CacheBackend::from_str_or_default("off"), CacheBackend::Disabled);
    assert_eq!(CacheBackend::from_str_or_default("DISABLED"), CacheBackend::Disabled);
    assert_eq!(CacheBackend::from_str_or_default("memory"), CacheBackend::Memory);
    assert_eq!(CacheBackend::from_str_or_default("redis"), CacheBackend::Memory);
}
