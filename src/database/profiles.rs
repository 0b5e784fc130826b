// ABOUTME: SQLite implementation of ProfileStore
// ABOUTME: One row per user with body metrics and the completion flag
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

use super::{ProfileStore, SqliteDatabase};
use crate::errors::{AppError, AppResult};
use crate::models::UserProfile;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

#[async_trait]
impl ProfileStore for SqliteDatabase {
    async fn get_profile(&self, user_id: &str) -> AppResult<Option<UserProfile>> {
        let row = sqlx::query(
            r"
            SELECT current_weight, height, goal_weight, fitness_goal, profile_complete
            FROM user_profiles
            WHERE user_id = $1
            ",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get profile: {e}")))?;

        Ok(row.map(|r| UserProfile {
            current_weight: r.get("current_weight"),
            height: r.get("height"),
            goal_weight: r.get("goal_weight"),
            fitness_goal: r.get("fitness_goal"),
            profile_complete: r.get("profile_complete"),
        }))
    }

    async fn upsert_profile(&self, user_id: &str, profile: &UserProfile) -> AppResult<()> {
        sqlx::query(
            r"
            INSERT INTO user_profiles
                (user_id, current_weight, height, goal_weight, fitness_goal, profile_complete, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT(user_id) DO UPDATE SET
                current_weight = excluded.current_weight,
                height = excluded.height,
                goal_weight = excluded.goal_weight,
                fitness_goal = excluded.fitness_goal,
                profile_complete = excluded.profile_complete,
                updated_at = excluded.updated_at
            ",
        )
        .bind(user_id)
        .bind(profile.current_weight)
        .bind(profile.height)
        .bind(profile.goal_weight)
        .bind(&profile.fitness_goal)
        .bind(profile.profile_complete)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to upsert profile: {e}")))?;

        Ok(())
    }
}
