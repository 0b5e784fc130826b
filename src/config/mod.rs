// ABOUTME: Configuration management module for the coaching pipeline
// ABOUTME: Environment-only configuration for database, cache, LLM and coach settings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

//! Configuration module
//!
//! Every section has a `Default` and a `from_env()` loader; there are no
//! configuration files.

/// Coaching pipeline settings
pub mod coach;
/// Shared configuration enums
pub mod types;

pub use coach::CoachConfig;
pub use types::LlmProviderType;

use crate::cache::CacheConfig;
use crate::constants::env_vars::{DATABASE_URL, DEFAULT_DATABASE_URL};
use crate::logging::LoggingConfig;
use std::env;
use tracing::info;

/// Complete application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// sqlx connection URL
    pub database_url: String,
    /// LLM provider to build
    pub llm_provider: LlmProviderType,
    /// Model override for the provider
    pub llm_model: Option<String>,
    /// Coaching pipeline settings
    pub coach: CoachConfig,
    /// Candidate list cache settings
    pub cache: CacheConfig,
    /// Logging settings
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load the whole configuration from environment variables
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            database_url: env::var(DATABASE_URL).unwrap_or_else(|_| DEFAULT_DATABASE_URL.into()),
            llm_provider: LlmProviderType::from_env(),
            llm_model: LlmProviderType::model_from_env(),
            coach: CoachConfig::from_env(),
            cache: CacheConfig::from_env(),
            logging: LoggingConfig::from_env(),
        }
    }

    /// Log a one-line summary of the effective configuration
    pub fn log_summary(&self) {
        info!(
            database_url = %self.database_url,
            llm_provider = %self.llm_provider,
            llm_model = self.llm_model.as_deref().unwrap_or("provider default"),
            history_limit = self.coach.history_limit,
            fuzzy_threshold = self.coach.fuzzy_threshold,
            cache_backend = ?self.cache.backend,
            "Configuration loaded"
        );
    }
}
