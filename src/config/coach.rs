// ABOUTME: Coaching pipeline configuration (history size, fuzzy threshold, model budget)
// ABOUTME: Loaded from REPCOACH_* environment variables with constant defaults
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

use crate::constants::coach::{
    FUZZY_MATCH_THRESHOLD, HISTORY_LIMIT, LLM_MAX_TOKENS, LLM_TEMPERATURE, LLM_TIMEOUT_SECS,
};
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Settings for interpretation and entity resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoachConfig {
    /// Conversation entries kept per user
    pub history_limit: usize,
    /// Highest normalized edit distance accepted as a fuzzy name match
    pub fuzzy_threshold: f64,
    /// Wall-clock budget for one model call in seconds
    pub llm_timeout_secs: u64,
    /// Completion token budget
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            history_limit: HISTORY_LIMIT,
            fuzzy_threshold: FUZZY_MATCH_THRESHOLD,
            llm_timeout_secs: LLM_TIMEOUT_SECS,
            max_tokens: LLM_MAX_TOKENS,
            temperature: LLM_TEMPERATURE,
        }
    }
}

impl CoachConfig {
    /// Load coaching configuration from environment
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            history_limit: env::var("REPCOACH_HISTORY_LIMIT")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(HISTORY_LIMIT),
            fuzzy_threshold: env::var("REPCOACH_FUZZY_THRESHOLD")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|t: &f64| (0.0..=1.0).contains(t))
                .unwrap_or(FUZZY_MATCH_THRESHOLD),
            llm_timeout_secs: env::var("REPCOACH_LLM_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(LLM_TIMEOUT_SECS),
            max_tokens: env::var("REPCOACH_LLM_MAX_TOKENS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(LLM_MAX_TOKENS),
            temperature: env::var("REPCOACH_LLM_TEMPERATURE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(LLM_TEMPERATURE),
        }
    }

    /// Model call budget as a `Duration`
    #[must_use]
    pub const fn llm_timeout(&self) -> Duration {
        Duration::from_secs(self.llm_timeout_secs)
    }
}
