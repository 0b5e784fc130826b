// ABOUTME: Main library entry point for the repcoach AI fitness coach
// ABOUTME: Turns free-text training messages into routines, workouts, sets and coaching replies
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

#![recursion_limit = "256"]
#![deny(unsafe_code)]

//! # repcoach
//!
//! Core of a conversational strength-training coach. A user writes something
//! like "3x10 bench at 135 in Full Super A" and the coach:
//!
//! 1. Asks a language model to classify the message into one action
//! 2. Resolves routine and workout names to stored entities, fuzzily
//! 3. Writes the workout data and replies
//!
//! ## Architecture
//!
//! - **coach**: interpreter, entity resolver, dispatcher and the service facade
//! - **intelligence**: readiness check-in to intensity multiplier
//! - **llm**: provider abstraction over OpenAI-compatible chat endpoints
//! - **database**: `SQLite` stores for entities, history and profiles
//! - **cache**: candidate-list caching for name resolution
//! - **config**: environment-driven configuration
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use repcoach::cache::{Cache, CacheProvider};
//! use repcoach::coach::{CoachService, CoachStores};
//! use repcoach::config::AppConfig;
//! use repcoach::database::SqliteDatabase;
//! use repcoach::errors::AppResult;
//! use repcoach::llm::ChatProvider;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> AppResult<()> {
//!     let config = AppConfig::from_env();
//!     let database = SqliteDatabase::new(&config.database_url).await?;
//!     let llm = ChatProvider::create(config.llm_provider, config.llm_model.clone())?;
//!     let cache = Cache::new(config.cache.clone()).await?;
//!
//!     let coach = CoachService::new(
//!         CoachStores::from_database(database),
//!         Arc::new(llm),
//!         cache,
//!         config.cache.ttl.clone(),
//!         config.coach.clone(),
//!     );
//!     let reply = coach.respond("3x10 bench at 135", "user-1").await?;
//!     println!("{}", reply.reply);
//!     Ok(())
//! }
//! ```

/// Candidate-list caching for entity resolution
pub mod cache;

/// Coaching pipeline: interpretation, resolution and dispatch
pub mod coach;

/// Environment-driven configuration
pub mod config;

/// Application constants
pub mod constants;

/// Persistence for routines, workouts, sets, history and profiles
pub mod database;

/// Unified error handling
pub mod errors;

/// Readiness check-in and intensity adjustment
pub mod intelligence;

/// Language model providers
pub mod llm;

/// Tracing subscriber setup
pub mod logging;

/// Domain models
pub mod models;
