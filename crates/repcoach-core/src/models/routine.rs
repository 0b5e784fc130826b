// ABOUTME: Routine record - a named grouping of workouts owned by one user
// ABOUTME: Name identity is case-insensitive within a user's routines
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named collection of workouts belonging to exactly one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routine {
    /// Unique routine ID
    pub id: Uuid,
    /// Display name as first created
    pub name: String,
    /// Identity-provider user id of the owner
    pub owner_user_id: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl Routine {
    /// Whether `user_id` owns this routine
    #[must_use]
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.owner_user_id == user_id
    }
}
