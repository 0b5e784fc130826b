// ABOUTME: Core types and constants for the repcoach AI fitness coach
// ABOUTME: Foundation crate with error handling, domain models, and constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

#![deny(unsafe_code)]

//! # repcoach Core
//!
//! Foundation crate providing shared types and constants for the repcoach
//! coaching pipeline. This crate is designed to change infrequently, enabling
//! incremental compilation benefits in the workspace.
//!
//! ## Modules
//!
//! - **errors**: Unified error handling with `AppError`, `ErrorCode`, and `AppResult`
//! - **constants**: Coaching defaults (fallback names, thresholds, TTLs)
//! - **models**: Routine, workout, set and profile records

/// Unified error handling system with standard error codes
pub mod errors;

/// Application constants organized by domain
pub mod constants;

/// Core data models (Routine, Workout, `WorkoutSet`, `UserProfile`)
pub mod models;
