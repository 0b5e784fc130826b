// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides an in-memory database, a scripted LLM provider, and coach wiring helpers
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors
#![allow(
    dead_code,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::unwrap_used,
    clippy::expect_used
)]
//! Shared test utilities for `repcoach`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use anyhow::Result;
use async_trait::async_trait;
use repcoach::cache::{Cache, CacheConfig, CacheProvider, CacheTtlConfig};
use repcoach::coach::{CoachService, CoachStores, EntityResolver};
use repcoach::config::CoachConfig;
use repcoach::database::SqliteDatabase;
use repcoach::errors::AppError;
use repcoach::llm::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup
pub async fn create_test_database() -> Result<Arc<SqliteDatabase>> {
    init_test_logging();
    let database = SqliteDatabase::new("sqlite::memory:").await?;
    Ok(Arc::new(database))
}

/// In-memory cache without the background cleanup task
pub async fn create_test_cache() -> Result<Cache> {
    let config = CacheConfig {
        enable_background_cleanup: false,
        ..CacheConfig::default()
    };
    Ok(Cache::new(config).await?)
}

/// Resolver over `database` with a fresh test cache and default threshold
pub async fn create_test_resolver(database: &Arc<SqliteDatabase>) -> Result<EntityResolver> {
    let config = CoachConfig::default();
    Ok(EntityResolver::new(
        Arc::clone(database) as _,
        create_test_cache().await?,
        CacheTtlConfig::default(),
        config.fuzzy_threshold,
    ))
}

/// All three stores backed by one database
pub fn test_stores(database: &Arc<SqliteDatabase>) -> CoachStores {
    CoachStores {
        entities: Arc::clone(database) as _,
        history: Arc::clone(database) as _,
        profiles: Arc::clone(database) as _,
    }
}

/// Full coach over `database` driven by `llm`
pub async fn create_test_coach(
    database: &Arc<SqliteDatabase>,
    llm: Arc<ScriptedLlmProvider>,
) -> Result<CoachService> {
    Ok(CoachService::new(
        test_stores(database),
        llm,
        create_test_cache().await?,
        CacheTtlConfig::default(),
        CoachConfig::default(),
    ))
}

/// One scripted provider reply
pub enum Scripted {
    /// Return this text as the completion
    Reply(String),
    /// Fail with this error
    Fail(AppError),
    /// Sleep before replying
    Delayed(Duration, String),
}

/// LLM provider that replays queued outputs and records every request
#[derive(Default)]
pub struct ScriptedLlmProvider {
    script: Mutex<VecDeque<Scripted>>,
    requests: Mutex<Vec<ChatRequest>>,
}

impl ScriptedLlmProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Provider that answers once with `output`
    pub fn replying(output: impl Into<String>) -> Arc<Self> {
        let provider = Self::new();
        provider.push(Scripted::Reply(output.into()));
        Arc::new(provider)
    }

    pub fn push(&self, step: Scripted) {
        self.script.lock().unwrap().push_back(step);
    }

    pub fn push_reply(&self, output: impl Into<String>) {
        self.push(Scripted::Reply(output.into()));
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// System prompt of the most recent request
    pub fn last_system_prompt(&self) -> String {
        self.requests()
            .last()
            .and_then(|r| r.messages.first().map(|m| m.content.clone()))
            .unwrap_or_default()
    }
}

#[async_trait]
impl LlmProvider for ScriptedLlmProvider {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn capabilities(&self) -> LlmCapabilities {
        LlmCapabilities::JSON_MODE
    }

    fn default_model(&self) -> &str {
        "scripted-model"
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.requests.lock().unwrap().push(request.clone());
        let step = self.script.lock().unwrap().pop_front();
        let content = match step {
            Some(Scripted::Reply(text)) => text,
            Some(Scripted::Fail(err)) => return Err(err),
            Some(Scripted::Delayed(delay, text)) => {
                tokio::time::sleep(delay).await;
                text
            }
            None => return Err(AppError::external_service("scripted", "script exhausted")),
        };
        Ok(ChatResponse {
            content,
            model: "scripted-model".to_owned(),
            usage: None,
            finish_reason: Some("stop".to_owned()),
        })
    }
}
