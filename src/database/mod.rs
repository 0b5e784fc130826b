// ABOUTME: Persistence layer for routines, workouts, sets, conversation history and profiles
// ABOUTME: Store traits consumed by the coach plus the SQLite implementation behind them
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

//! # Database Management
//!
//! The coaching pipeline talks to three narrow store traits:
//!
//! - [`EntityStore`]: routines, workouts and sets scoped by owner
//! - [`HistoryStore`]: per-user conversation history as opaque strings
//! - [`ProfileStore`]: read-mostly user fitness profile
//!
//! [`SqliteDatabase`] implements all three over one `sqlx` pool. None of the
//! multi-step sequences are wrapped in transactions.

mod entities;
mod history;
mod profiles;

use crate::errors::{AppError, AppResult};
use crate::models::{NewSet, Routine, UserProfile, Workout, WorkoutSet};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;
use tracing::info;
use uuid::Uuid;

/// Routine, workout and set persistence
#[async_trait]
pub trait EntityStore: Send + Sync {
    /// Routine owned by `user_id` whose name equals `name` ignoring case
    async fn find_routine_by_name(&self, user_id: &str, name: &str) -> AppResult<Option<Routine>>;

    /// All routines owned by `user_id`, oldest first
    async fn list_routines(&self, user_id: &str) -> AppResult<Vec<Routine>>;

    /// Routine by id regardless of owner
    async fn get_routine(&self, routine_id: Uuid) -> AppResult<Option<Routine>>;

    /// Insert a routine for `user_id`
    async fn create_routine(&self, user_id: &str, name: &str) -> AppResult<Routine>;

    /// Delete a routine together with its workouts and sets
    async fn delete_routine(&self, routine_id: Uuid) -> AppResult<bool>;

    /// Workout in `routine_id` whose name equals `name` ignoring case
    async fn find_workout_by_name(
        &self,
        routine_id: Uuid,
        name: &str,
    ) -> AppResult<Option<Workout>>;

    /// All workouts in `routine_id`, oldest first
    async fn list_workouts(&self, routine_id: Uuid) -> AppResult<Vec<Workout>>;

    /// Workout by id
    async fn get_workout(&self, workout_id: Uuid) -> AppResult<Option<Workout>>;

    /// Insert a workout under `routine_id`
    async fn create_workout(
        &self,
        routine_id: Uuid,
        name: &str,
        date: NaiveDate,
    ) -> AppResult<Workout>;

    /// Overwrite the aggregate calories of a workout
    async fn update_workout_calories(&self, workout_id: Uuid, calories: f64) -> AppResult<()>;

    /// Delete a workout together with its sets
    async fn delete_workout(&self, workout_id: Uuid) -> AppResult<bool>;

    /// Insert one set
    async fn create_set(&self, set: NewSet) -> AppResult<WorkoutSet>;

    /// Sets of a workout in insertion order
    async fn list_sets(&self, workout_id: Uuid) -> AppResult<Vec<WorkoutSet>>;

    /// Set by id
    async fn get_set(&self, set_id: Uuid) -> AppResult<Option<WorkoutSet>>;

    /// Delete one set
    async fn delete_set(&self, set_id: Uuid) -> AppResult<bool>;

    /// Delete every set of a workout, returning how many were removed
    async fn delete_sets_for_workout(&self, workout_id: Uuid) -> AppResult<u64>;
}

/// Per-user conversation history
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Stored entries, oldest first; empty when the user has none
    async fn get_history(&self, user_id: &str) -> AppResult<Vec<String>>;

    /// Replace the stored entries
    async fn put_history(&self, user_id: &str, entries: &[String]) -> AppResult<()>;
}

/// User fitness profiles
#[async_trait]
pub trait ProfileStore: Send + Sync {
    /// Profile for `user_id`, `None` when never written
    async fn get_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>>;

    /// Insert or replace the profile for `user_id`
    async fn upsert_profile(&self, user_id: &str, profile: &UserProfile) -> AppResult<()>;
}

/// Pool size for file-backed databases
const MAX_FILE_CONNECTIONS: u32 = 5;

fn is_in_memory(database_url: &str) -> bool {
    database_url.contains(":memory:") || database_url.contains("mode=memory")
}

/// SQLite-backed implementation of every store trait
#[derive(Clone)]
pub struct SqliteDatabase {
    pool: SqlitePool,
}

impl SqliteDatabase {
    /// Connect to `database_url`, creating the file if needed, and run migrations
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid, the connection fails or a
    /// migration statement fails
    pub async fn new(database_url: &str) -> AppResult<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .map_err(|e| AppError::config(format!("Invalid database URL {database_url}: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true);

        // Every connection to an in-memory database sees its own empty copy,
        // so keep exactly one connection alive for the pool's lifetime
        let pool_options = if is_in_memory(database_url) {
            SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None)
        } else {
            SqlitePoolOptions::new().max_connections(MAX_FILE_CONNECTIONS)
        };

        let pool = pool_options
            .connect_with(options)
            .await
            .map_err(|e| AppError::database(format!("Failed to connect to database: {e}")))?;

        let db = Self { pool };
        db.migrate().await?;
        info!(database_url, "Database ready");
        Ok(db)
    }

    /// Get a reference to the database pool for advanced operations
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Run database migrations
    ///
    /// # Errors
    ///
    /// Returns an error if any `CREATE` statement fails
    pub async fn migrate(&self) -> AppResult<()> {
        self.migrate_entities().await?;
        self.migrate_history().await?;
        self.migrate_profiles().await?;
        Ok(())
    }

    async fn migrate_entities(&self) -> AppResult<()> {
        let statements = [
            r"
            CREATE TABLE IF NOT EXISTS routines (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                owner_user_id TEXT NOT NULL,
                created_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_routines_owner ON routines(owner_user_id)",
            r"
            CREATE TABLE IF NOT EXISTS workouts (
                id TEXT PRIMARY KEY,
                name TEXT NOT NULL,
                routine_id TEXT NOT NULL REFERENCES routines(id) ON DELETE CASCADE,
                date TEXT NOT NULL,
                total_calories REAL,
                duration_minutes INTEGER,
                notes TEXT,
                created_at TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_workouts_routine ON workouts(routine_id)",
            r"
            CREATE TABLE IF NOT EXISTS workout_sets (
                id TEXT PRIMARY KEY,
                workout_id TEXT NOT NULL REFERENCES workouts(id) ON DELETE CASCADE,
                reps INTEGER NOT NULL,
                weight REAL NOT NULL,
                calories REAL,
                date TEXT NOT NULL
            )
            ",
            "CREATE INDEX IF NOT EXISTS idx_workout_sets_workout ON workout_sets(workout_id)",
        ];

        for statement in statements {
            sqlx::query(statement)
                .execute(&self.pool)
                .await
                .map_err(|e| AppError::database(format!("Entity migration failed: {e}")))?;
        }
        Ok(())
    }

    async fn migrate_history(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS conversation_history (
                user_id TEXT PRIMARY KEY,
                entries TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("History migration failed: {e}")))?;
        Ok(())
    }

    async fn migrate_profiles(&self) -> AppResult<()> {
        sqlx::query(
            r"
            CREATE TABLE IF NOT EXISTS user_profiles (
                user_id TEXT PRIMARY KEY,
                current_weight REAL,
                height REAL,
                goal_weight REAL,
                fitness_goal TEXT,
                profile_complete INTEGER NOT NULL DEFAULT 0,
                updated_at TEXT NOT NULL
            )
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Profile migration failed: {e}")))?;
        Ok(())
    }
}

/// Parse a TEXT id column back into a `Uuid`
fn parse_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|e| AppError::database(format!("Corrupt id {raw}: {e}")))
}
