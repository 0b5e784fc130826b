// ABOUTME: AI coaching pipeline from free-text utterance to persisted training data
// ABOUTME: Interpreter, entity resolver, dispatcher and the service tying them together
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

//! # Coaching pipeline
//!
//! ```text
//! utterance -> ActionInterpreter -> ParsedAction -> ActionDispatcher -> reply
//!                    |                                     |
//!              history, profile, LLM               EntityResolver, EntityStore
//! ```

/// Parsed action types and model output decoding
pub mod actions;
/// Action execution
pub mod dispatcher;
/// Name normalization and edit distance
pub mod fuzzy;
/// Bounded conversation history
pub mod history;
/// Utterance interpretation
pub mod interpreter;
/// Name to entity resolution
pub mod resolver;
/// Interpret-then-dispatch facade
pub mod service;

pub use actions::{
    extract_json, ActionBody, ActionKind, ActionParseError, LogWorkout, ParsedAction,
    Recommendation, SetInput, WorkoutEntry,
};
pub use dispatcher::ActionDispatcher;
pub use history::{ConversationHistory, HistoryEntry};
pub use interpreter::{build_system_prompt, finalize_action, ActionInterpreter};
pub use resolver::{EntityResolver, MatchKind, NamedMatch, Resolution};
pub use service::{CoachReply, CoachService, CoachStores};
