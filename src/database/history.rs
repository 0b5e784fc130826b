// ABOUTME: SQLite implementation of HistoryStore for per-user conversation context
// ABOUTME: Entries are kept as one JSON array of strings per user, replaced wholesale
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

use super::{HistoryStore, SqliteDatabase};
use crate::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::Row;

#[async_trait]
impl HistoryStore for SqliteDatabase {
    async fn get_history(&self, user_id: &str) -> AppResult<Vec<String>> {
        let row = sqlx::query("SELECT entries FROM conversation_history WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::database(format!("Failed to get history: {e}")))?;

        let Some(row) = row else {
            return Ok(Vec::new());
        };
        let raw: String = row.get("entries");
        Ok(serde_json::from_str(&raw)?)
    }

    async fn put_history(&self, user_id: &str, entries: &[String]) -> AppResult<()> {
        let raw = serde_json::to_string(entries)?;

        sqlx::query(
            r"
            INSERT INTO conversation_history (user_id, entries, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT(user_id) DO UPDATE SET entries = excluded.entries, updated_at = excluded.updated_at
            ",
        )
        .bind(user_id)
        .bind(&raw)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::database(format!("Failed to store history: {e}")))?;

        Ok(())
    }
}
