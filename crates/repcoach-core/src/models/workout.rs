// ABOUTME: Workout and set records for logged resistance training
// ABOUTME: A workout may exist with zero sets; sets are append-only in normal use
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named exercise occurrence within a routine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Workout {
    /// Unique workout ID
    pub id: Uuid,
    /// Exercise name (e.g. "Bench Press")
    pub name: String,
    /// Owning routine
    pub routine_id: Uuid,
    /// Calendar date the workout was first logged
    pub date: NaiveDate,
    /// Aggregate calories burned, when reported
    pub total_calories: Option<f64>,
    /// Duration in minutes, when reported
    pub duration_minutes: Option<i64>,
    /// Free-text notes
    pub notes: Option<String>,
}

/// A single logged resistance-training set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutSet {
    /// Unique set ID
    pub id: Uuid,
    /// Workout this set belongs to
    pub workout_id: Uuid,
    /// Repetitions performed
    pub reps: i64,
    /// Load lifted, in the user's unit
    pub weight: f64,
    /// Calories attributed to this set, when reported
    pub calories: Option<f64>,
    /// When the set was performed
    pub date: DateTime<Utc>,
}

/// Insert payload for a set (without id)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewSet {
    /// Workout the set is logged against
    pub workout_id: Uuid,
    /// Repetitions performed
    pub reps: i64,
    /// Load lifted
    pub weight: f64,
    /// Calories attributed to this set
    pub calories: Option<f64>,
    /// When the set was performed
    pub date: DateTime<Utc>,
}
