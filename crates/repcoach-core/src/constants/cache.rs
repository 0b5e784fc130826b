// ABOUTME: Cache-related constants for TTL, capacity, and cleanup intervals
// ABOUTME: Candidate lists for fuzzy resolution are cached briefly to absorb bursts
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

/// Default maximum cache entries for in-memory cache
pub const DEFAULT_CACHE_MAX_ENTRIES: usize = 10_000;

/// Default cleanup interval in seconds for expired entries
pub const DEFAULT_CLEANUP_INTERVAL_SECS: u64 = 300; // 5 minutes

/// Routine and workout candidate list TTL - short, writes invalidate eagerly
pub const TTL_ENTITY_LIST_SECS: u64 = 30;

/// Cache key prefix for namespacing
pub const CACHE_KEY_PREFIX: &str = "repcoach:";
