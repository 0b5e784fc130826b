// ABOUTME: Constants module with domain-separated organization
// ABOUTME: Pure data constants for the coaching pipeline, cache and LLM defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

//! Constants module
//!
//! Constants are grouped into logical domains rather than being in a single large file.

/// Cache-related constants (TTL, sizes, etc.)
pub mod cache;
/// Coaching pipeline defaults (fallback names, thresholds, reply strings)
pub mod coach;

/// Service identifiers used in structured logs
pub mod service_names {
    /// Name of the repcoach service
    pub const REPCOACH: &str = "repcoach";
}

/// Environment variable names shared by configuration loaders
pub mod env_vars {
    /// Database connection URL
    pub const DATABASE_URL: &str = "DATABASE_URL";
    /// Default database URL when `DATABASE_URL` is unset
    pub const DEFAULT_DATABASE_URL: &str = "sqlite:./data/repcoach.db";
}
