// ABOUTME: Core data models for routines, workouts, sets and user profiles
// ABOUTME: Persistence-layer shapes referenced by id from the coaching pipeline
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

//! # Data Models
//!
//! Records owned by the persistence store. The coaching pipeline creates them
//! on demand and otherwise refers to them by identifier.
//!
//! - `Routine`: a named, user-owned grouping of workouts
//! - `Workout`: a named exercise occurrence within a routine
//! - `WorkoutSet`: one logged reps/weight unit of a workout
//! - `UserProfile`: read-only body metrics and goal used to personalize prompts

mod profile;
mod routine;
mod workout;

pub use profile::UserProfile;
pub use routine::Routine;
pub use workout::{NewSet, Workout, WorkoutSet};
