// ABOUTME: Integration tests for conversation history and profile persistence
// ABOUTME: Verifies per-user isolation, bounded history and profile upserts in SQLite
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use repcoach::coach::{ConversationHistory, HistoryEntry};
use repcoach::database::{HistoryStore, ProfileStore};
use repcoach::models::UserProfile;
use std::sync::Arc;

#[tokio::test]
async fn test_history_store_round_trip() -> Result<()> {
    let db = common::create_test_database().await?;

    assert!(db.get_history("alice").await?.is_empty());

    db.put_history("alice", &["one".to_owned(), "two".to_owned()])
        .await?;
    db.put_history("alice", &["three".to_owned()]).await?;

    assert_eq!(db.get_history("alice").await?, vec!["three"]);
    assert!(db.get_history("bob").await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_append_keeps_most_recent_entries() -> Result<()> {
    let db = common::create_test_database().await?;
    let history = ConversationHistory::new(Arc::clone(&db) as _, 3);

    for i in 1..=4 {
        history
            .append("alice", &HistoryEntry::user(format!("u{i}")))
            .await;
    }
    let returned = history
        .append("alice", &HistoryEntry::assistant("a5"))
        .await;

    let expected = vec![
        HistoryEntry::user("u3"),
        HistoryEntry::user("u4"),
        HistoryEntry::assistant("a5"),
    ];
    assert_eq!(returned, expected);
    assert_eq!(history.load("alice").await, expected);
    Ok(())
}

#[tokio::test]
async fn test_history_is_per_user() -> Result<()> {
    let db = common::create_test_database().await?;
    let history = ConversationHistory::new(Arc::clone(&db) as _, 5);

    history.append("alice", &HistoryEntry::user("hi")).await;

    assert!(history.load("bob").await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_history_limit_is_at_least_one() -> Result<()> {
    let db = common::create_test_database().await?;
    let history = ConversationHistory::new(Arc::clone(&db) as _, 0);

    assert_eq!(history.limit(), 1);
    history.append("alice", &HistoryEntry::user("a")).await;
    history.append("alice", &HistoryEntry::user("b")).await;
    assert_eq!(history.load("alice").await, vec![HistoryEntry::user("b")]);
    Ok(())
}

#[tokio::test]
async fn test_failed_store_degrades_to_empty_history() -> Result<()> {
    let db = common::create_test_database().await?;
    let history = ConversationHistory::new(Arc::clone(&db) as _, 5);
    db.pool().close().await;

    let entries = history.append("alice", &HistoryEntry::user("still works")).await;

    assert_eq!(entries, vec![HistoryEntry::user("still works")]);
    assert!(history.load("alice").await.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_profile_upsert_and_read() -> Result<()> {
    let db = common::create_test_database().await?;
    assert_eq!(db.get_profile("alice").await?, None);

    let mut profile = UserProfile {
        current_weight: Some(90.0),
        height: Some(175.0),
        goal_weight: Some(80.0),
        fitness_goal: Some("lose fat".to_owned()),
        profile_complete: true,
    };
    db.upsert_profile("alice", &profile).await?;
    assert_eq!(db.get_profile("alice").await?, Some(profile.clone()));

    profile.current_weight = Some(88.5);
    profile.fitness_goal = None;
    db.upsert_profile("alice", &profile).await?;
    assert_eq!(db.get_profile("alice").await?, Some(profile));
    assert_eq!(db.get_profile("bob").await?, None);
    Ok(())
}
