// ABOUTME: SQLite implementation of EntityStore for routines, workouts and sets
// ABOUTME: Runtime sqlx queries with TEXT ids and cascading deletes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

use super::{parse_id, EntityStore, SqliteDatabase};
use crate::errors::{AppError, AppResult};
use crate::models::{NewSet, Routine, Workout, WorkoutSet};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use uuid::Uuid;

fn routine_from_row(row: &SqliteRow) -> AppResult<Routine> {
    Ok(Routine {
        id: parse_id(row.get("id"))?,
        name: row.get("name"),
        owner_user_id: row.get("owner_user_id"),
        created_at: row.get("created_at"),
    })
}

fn workout_from_row(row: &SqliteRow) -> AppResult<Workout> {
    Ok(Workout {
        id: parse_id(row.get("id"))?,
        name: row.get("name"),
        routine_id: parse_id(row.get("routine_id"))?,
        date: row.get("date"),
        total_calories: row.get("total_calories"),
        duration_minutes: row.get("duration_minutes"),
        notes: row.get("notes"),
    })
}

fn set_from_row(row: &SqliteRow) -> AppResult<WorkoutSet> {
    Ok(WorkoutSet {
        id: parse_id(row.get("id"))?,
        workout_id: parse_id(row.get("workout_id"))?,
        reps: row.get("reps"),
        weight: row.get("weight"),
        calories: row.get("calories"),
        date: row.get("date"),
    })
}

#[async_trait]
impl EntityStore for SqliteDatabase {
    async fn find_routine_by_name(&self, user_id: &str, name: &str) -> AppResult<Option<Routine>> {
        let row = sqlx::query(
            r"
            SELECT id, name, owner_user_id, created_at
            FROM routines
            WHERE owner_user_id = $1 AND name = $2 COLLATE NOCASE
            ORDER BY created_at ASC, rowid ASC
            LIMIT 1
            ",
        )
        .bind(user_id)
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find routine: {e}")))?;

        row.as_ref().map(routine_from_row).transpose()
    }

    async fn list_routines(&self, user_id: &str) -> AppResult<Vec<Routine>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, owner_user_id, created_at
            FROM routines
            WHERE owner_user_id = $1
            ORDER BY created_at ASC, rowid ASC
            ",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list routines: {e}")))?;

        rows.iter().map(routine_from_row).collect()
    }

    async fn get_routine(&self, routine_id: Uuid) -> AppResult<Option<Routine>> {
        let row = sqlx::query(
            "SELECT id, name, owner_user_id, created_at FROM routines WHERE id = $1",
        )
        .bind(routine_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get routine: {e}")))?;

        row.as_ref().map(routine_from_row).transpose()
    }

    async fn create_routine(&self, user_id: &str, name: &str) -> AppResult<Routine> {
        let routine = Routine {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            owner_user_id: user_id.to_owned(),
            created_at: Utc::now(),
        };

        sqlx::query(
            "INSERT INTO routines (id, name, owner_user_id, created_at) VALUES ($1, $2, $3, $4)",
        )
        .bind(routine.id.to_string())
        .bind(&routine.name)
        .bind(&routine.owner_user_id)
        .bind(routine.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create routine: {e}")))?;

        Ok(routine)
    }

    async fn delete_routine(&self, routine_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM routines WHERE id = $1")
            .bind(routine_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete routine: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_workout_by_name(
        &self,
        routine_id: Uuid,
        name: &str,
    ) -> AppResult<Option<Workout>> {
        let row = sqlx::query(
            r"
            SELECT id, name, routine_id, date, total_calories, duration_minutes, notes
            FROM workouts
            WHERE routine_id = $1 AND name = $2 COLLATE NOCASE
            ORDER BY created_at ASC, rowid ASC
            LIMIT 1
            ",
        )
        .bind(routine_id.to_string())
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to find workout: {e}")))?;

        row.as_ref().map(workout_from_row).transpose()
    }

    async fn list_workouts(&self, routine_id: Uuid) -> AppResult<Vec<Workout>> {
        let rows = sqlx::query(
            r"
            SELECT id, name, routine_id, date, total_calories, duration_minutes, notes
            FROM workouts
            WHERE routine_id = $1
            ORDER BY created_at ASC, rowid ASC
            ",
        )
        .bind(routine_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list workouts: {e}")))?;

        rows.iter().map(workout_from_row).collect()
    }

    async fn get_workout(&self, workout_id: Uuid) -> AppResult<Option<Workout>> {
        let row = sqlx::query(
            r"
            SELECT id, name, routine_id, date, total_calories, duration_minutes, notes
            FROM workouts
            WHERE id = $1
            ",
        )
        .bind(workout_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get workout: {e}")))?;

        row.as_ref().map(workout_from_row).transpose()
    }

    async fn create_workout(
        &self,
        routine_id: Uuid,
        name: &str,
        date: NaiveDate,
    ) -> AppResult<Workout> {
        let workout = Workout {
            id: Uuid::new_v4(),
            name: name.to_owned(),
            routine_id,
            date,
            total_calories: None,
            duration_minutes: None,
            notes: None,
        };

        sqlx::query(
            r"
            INSERT INTO workouts (id, name, routine_id, date, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(workout.id.to_string())
        .bind(&workout.name)
        .bind(routine_id.to_string())
        .bind(date)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create workout: {e}")))?;

        Ok(workout)
    }

    async fn update_workout_calories(&self, workout_id: Uuid, calories: f64) -> AppResult<()> {
        let result = sqlx::query("UPDATE workouts SET total_calories = $1 WHERE id = $2")
            .bind(calories)
            .bind(workout_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to update workout calories: {e}")))?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(format!("Workout {workout_id}")));
        }
        Ok(())
    }

    async fn delete_workout(&self, workout_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM workouts WHERE id = $1")
            .bind(workout_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete workout: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn create_set(&self, set: NewSet) -> AppResult<WorkoutSet> {
        let id = Uuid::new_v4();

        sqlx::query(
            r"
            INSERT INTO workout_sets (id, workout_id, reps, weight, calories, date)
            VALUES ($1, $2, $3, $4, $5, $6)
            ",
        )
        .bind(id.to_string())
        .bind(set.workout_id.to_string())
        .bind(set.reps)
        .bind(set.weight)
        .bind(set.calories)
        .bind(set.date)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to create set: {e}")))?;

        Ok(WorkoutSet {
            id,
            workout_id: set.workout_id,
            reps: set.reps,
            weight: set.weight,
            calories: set.calories,
            date: set.date,
        })
    }

    async fn list_sets(&self, workout_id: Uuid) -> AppResult<Vec<WorkoutSet>> {
        let rows = sqlx::query(
            r"
            SELECT id, workout_id, reps, weight, calories, date
            FROM workout_sets
            WHERE workout_id = $1
            ORDER BY rowid ASC
            ",
        )
        .bind(workout_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to list sets: {e}")))?;

        rows.iter().map(set_from_row).collect()
    }

    async fn get_set(&self, set_id: Uuid) -> AppResult<Option<WorkoutSet>> {
        let row = sqlx::query(
            "SELECT id, workout_id, reps, weight, calories, date FROM workout_sets WHERE id = $1",
        )
        .bind(set_id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to get set: {e}")))?;

        row.as_ref().map(set_from_row).transpose()
    }

    async fn delete_set(&self, set_id: Uuid) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM workout_sets WHERE id = $1")
            .bind(set_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete set: {e}")))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_sets_for_workout(&self, workout_id: Uuid) -> AppResult<u64> {
        let result = sqlx::query("DELETE FROM workout_sets WHERE workout_id = $1")
            .bind(workout_id.to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to delete sets: {e}")))?;

        Ok(result.rows_affected())
    }
}
