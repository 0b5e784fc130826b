// ABOUTME: Integration tests for fuzzy-then-create entity resolution
// ABOUTME: Exercises exact, fuzzy and create paths against SQLite plus cache invalidation
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use chrono::NaiveDate;
use repcoach::cache::{CacheKey, CacheProvider, CacheTtlConfig, NoOpCache};
use repcoach::coach::{EntityResolver, MatchKind, NamedMatch, Resolution};
use repcoach::constants::coach::{DEFAULT_ROUTINE_NAME, DEFAULT_WORKOUT_NAME};
use repcoach::database::EntityStore;
use std::sync::Arc;
use uuid::Uuid;

#[tokio::test]
async fn test_case_variant_is_exact_match() -> Result<()> {
    let db = common::create_test_database().await?;
    let resolver = common::create_test_resolver(&db).await?;
    let routine = db.create_routine("alice", "Full Super A").await?;

    let resolution = resolver
        .resolve_routine("alice", Some("full super a"))
        .await?;

    assert_eq!(
        resolution,
        Resolution::Matched {
            id: routine.id,
            kind: MatchKind::Exact
        }
    );
    assert_eq!(db.list_routines("alice").await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_one_character_typo_is_fuzzy_match() -> Result<()> {
    let db = common::create_test_database().await?;
    let resolver = common::create_test_resolver(&db).await?;
    let routine = db.create_routine("alice", "Full Super A").await?;

    let resolution = resolver
        .resolve_routine("alice", Some("Fll Super A"))
        .await?;

    assert_eq!(
        resolution,
        Resolution::Matched {
            id: routine.id,
            kind: MatchKind::Fuzzy
        }
    );
    assert_eq!(db.list_routines("alice").await?.len(), 1);
    Ok(())
}

#[tokio::test]
async fn test_dissimilar_name_creates() -> Result<()> {
    let db = common::create_test_database().await?;
    let resolver = common::create_test_resolver(&db).await?;
    let existing = db.create_routine("alice", "Full Super A").await?;

    let resolution = resolver.resolve_routine("alice", Some("Cardio")).await?;

    assert!(resolution.is_created());
    assert_ne!(resolution.id(), Some(existing.id));
    let names: Vec<String> = db
        .list_routines("alice")
        .await?
        .into_iter()
        .map(|r| r.name)
        .collect();
    assert_eq!(names, vec!["Full Super A", "Cardio"]);
    Ok(())
}

#[tokio::test]
async fn test_resolution_is_idempotent() -> Result<()> {
    let db = common::create_test_database().await?;
    let resolver = common::create_test_resolver(&db).await?;

    let first = resolver.resolve_routine("alice", Some("Push Day")).await?;
    let second = resolver.resolve_routine("alice", Some("Push Day")).await?;

    assert!(first.is_created());
    assert_eq!(first.id(), second.id());
    assert!(!second.is_created());
    Ok(())
}

#[tokio::test]
async fn test_missing_names_use_defaults() -> Result<()> {
    let db = common::create_test_database().await?;
    let resolver = common::create_test_resolver(&db).await?;

    let routine_id = resolver.resolve_routine("alice", None).await?.id().unwrap();
    let workout_id = resolver
        .resolve_workout("alice", routine_id, Some("   "))
        .await?
        .id()
        .unwrap();

    let routine = db.get_routine(routine_id).await?.unwrap();
    let workout = db.get_workout(workout_id).await?.unwrap();
    assert_eq!(routine.name, DEFAULT_ROUTINE_NAME);
    assert_eq!(workout.name, DEFAULT_WORKOUT_NAME);
    Ok(())
}

#[tokio::test]
async fn test_routines_are_scoped_by_owner() -> Result<()> {
    let db = common::create_test_database().await?;
    let resolver = common::create_test_resolver(&db).await?;
    let bobs = db.create_routine("bob", "Push Day").await?;

    let resolution = resolver.resolve_routine("alice", Some("Push Day")).await?;

    assert!(resolution.is_created());
    assert_ne!(resolution.id(), Some(bobs.id));
    Ok(())
}

#[tokio::test]
async fn test_foreign_routine_yields_not_found_for_workouts() -> Result<()> {
    let db = common::create_test_database().await?;
    let resolver = common::create_test_resolver(&db).await?;
    let bobs = db.create_routine("bob", "Push Day").await?;

    let resolution = resolver
        .resolve_workout("alice", bobs.id, Some("Bench Press"))
        .await?;

    assert_eq!(resolution, Resolution::NotFound);
    assert!(db.list_workouts(bobs.id).await?.is_empty());

    let missing = resolver
        .resolve_workout("alice", Uuid::new_v4(), Some("Bench Press"))
        .await?;
    assert_eq!(missing, Resolution::NotFound);
    Ok(())
}

#[tokio::test]
async fn test_workout_fuzzy_match_within_routine() -> Result<()> {
    let db = common::create_test_database().await?;
    let resolver = common::create_test_resolver(&db).await?;
    let routine = db.create_routine("alice", "Push Day").await?;
    let date = NaiveDate::from_ymd_opt(2025, 1, 6).unwrap();
    let bench = db.create_workout(routine.id, "Bench Press", date).await?;

    let resolution = resolver
        .resolve_workout("alice", routine.id, Some("Bench Pres"))
        .await?;

    assert_eq!(
        resolution,
        Resolution::Matched {
            id: bench.id,
            kind: MatchKind::Fuzzy
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_created_workout_uses_given_date() -> Result<()> {
    let db = common::create_test_database().await?;
    let resolver = common::create_test_resolver(&db).await?;
    let routine = db.create_routine("alice", "Push Day").await?;
    let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();

    let id = resolver
        .resolve_workout_on("alice", routine.id, Some("Dips"), date)
        .await?
        .id()
        .unwrap();

    assert_eq!(db.get_workout(id).await?.unwrap().date, date);
    Ok(())
}

#[tokio::test]
async fn test_find_does_not_create() -> Result<()> {
    let db = common::create_test_database().await?;
    let resolver = common::create_test_resolver(&db).await?;

    assert_eq!(resolver.find_routine("alice", "Legs").await?, None);
    assert!(db.list_routines("alice").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_find_blank_name_matches_nothing() -> Result<()> {
    let db = common::create_test_database().await?;
    let resolver = common::create_test_resolver(&db).await?;
    let routine = db.create_routine("alice", "General Workout").await?;
    db.create_workout(routine.id, "Workout", NaiveDate::from_ymd_opt(2025, 1, 6).unwrap())
        .await?;

    assert_eq!(resolver.find_routine("alice", "   ").await?, None);
    assert_eq!(resolver.find_workout("alice", routine.id, "").await?, None);
    Ok(())
}

#[tokio::test]
async fn test_find_reports_stored_name_on_fuzzy_match() -> Result<()> {
    let db = common::create_test_database().await?;
    let resolver = common::create_test_resolver(&db).await?;
    let routine = db.create_routine("alice", "Leg Day").await?;

    let found = resolver.find_routine("alice", "Leg Day 2").await?.unwrap();

    assert_eq!(
        found,
        NamedMatch {
            id: routine.id,
            name: "Leg Day".to_owned(),
            kind: MatchKind::Fuzzy,
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_exact_match_skips_candidate_cache() -> Result<()> {
    let db = common::create_test_database().await?;
    let cache = common::create_test_cache().await?;
    let resolver = EntityResolver::new(
        Arc::clone(&db) as _,
        cache.clone(),
        CacheTtlConfig::default(),
        0.3,
    );
    db.create_routine("alice", "Push Day").await?;

    resolver.resolve_routine("alice", Some("push day")).await?;

    assert!(!cache.exists(&CacheKey::routines("alice")).await?);
    Ok(())
}

#[tokio::test]
async fn test_create_invalidates_cached_candidates() -> Result<()> {
    let db = common::create_test_database().await?;
    let cache = common::create_test_cache().await?;
    let resolver = EntityResolver::new(
        Arc::clone(&db) as _,
        cache.clone(),
        CacheTtlConfig::default(),
        0.3,
    );
    db.create_routine("alice", "Push Day").await?;

    // Fuzzy pass populates the candidate list, then nothing matches so it creates
    let created = resolver.resolve_routine("alice", Some("Cardio")).await?;
    assert!(created.is_created());
    assert!(!cache.exists(&CacheKey::routines("alice")).await?);

    // Fresh candidate list includes the new routine
    let again = resolver.resolve_routine("alice", Some("Cardo")).await?;
    assert_eq!(
        again,
        Resolution::Matched {
            id: created.id().unwrap(),
            kind: MatchKind::Fuzzy
        }
    );
    Ok(())
}

#[tokio::test]
async fn test_works_without_cache() -> Result<()> {
    let db = common::create_test_database().await?;
    let resolver = EntityResolver::new(
        Arc::clone(&db) as _,
        NoOpCache,
        CacheTtlConfig::default(),
        0.3,
    );
    let routine = db.create_routine("alice", "Full Super A").await?;

    let resolution = resolver
        .resolve_routine("alice", Some("Full Supr A"))
        .await?;
    assert_eq!(resolution.id(), Some(routine.id));
    Ok(())
}

#[tokio::test]
async fn test_tie_keeps_earliest_candidate() -> Result<()> {
    let db = common::create_test_database().await?;
    let resolver = common::create_test_resolver(&db).await?;
    let first = db.create_routine("alice", "Day A").await?;
    db.create_routine("alice", "Day B").await?;

    let resolution = resolver.resolve_routine("alice", Some("Day C")).await?;
    assert_eq!(resolution.id(), Some(first.id));
    Ok(())
}
