// ABOUTME: Coach facade running interpret then dispatch for one utterance
// ABOUTME: Records the coach reply in the conversation history after dispatch
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

use super::actions::ParsedAction;
use super::dispatcher::ActionDispatcher;
use super::history::{ConversationHistory, HistoryEntry};
use super::interpreter::ActionInterpreter;
use super::resolver::EntityResolver;
use crate::cache::{Cache, CacheProvider, CacheTtlConfig};
use crate::config::CoachConfig;
use crate::database::{EntityStore, HistoryStore, ProfileStore, SqliteDatabase};
use crate::errors::AppResult;
use crate::llm::LlmProvider;
use std::sync::Arc;
use tracing::instrument;

/// The three stores the coach depends on
#[derive(Clone)]
pub struct CoachStores {
    /// Routines, workouts and sets
    pub entities: Arc<dyn EntityStore>,
    /// Conversation history
    pub history: Arc<dyn HistoryStore>,
    /// User profiles
    pub profiles: Arc<dyn ProfileStore>,
}

impl CoachStores {
    /// Use one SQLite database for every store
    #[must_use]
    pub fn from_database(database: SqliteDatabase) -> Self {
        let database = Arc::new(database);
        Self {
            entities: Arc::clone(&database) as Arc<dyn EntityStore>,
            history: Arc::clone(&database) as Arc<dyn HistoryStore>,
            profiles: database as Arc<dyn ProfileStore>,
        }
    }
}

/// Result of handling one utterance
#[derive(Debug, Clone)]
pub struct CoachReply {
    /// Action the model chose
    pub action: ParsedAction,
    /// Text shown to the user
    pub reply: String,
}

/// Interpreter plus dispatcher sharing one history
pub struct CoachService<C: CacheProvider = Cache> {
    interpreter: ActionInterpreter,
    dispatcher: ActionDispatcher<C>,
    history: ConversationHistory,
}

impl<C: CacheProvider> CoachService<C> {
    /// Wire the pipeline from its stores, model and cache
    #[must_use]
    pub fn new(
        stores: CoachStores,
        llm: Arc<dyn LlmProvider>,
        cache: C,
        ttl: CacheTtlConfig,
        config: CoachConfig,
    ) -> Self {
        let history = ConversationHistory::new(stores.history, config.history_limit);
        let resolver = EntityResolver::new(stores.entities, cache, ttl, config.fuzzy_threshold);
        Self {
            interpreter: ActionInterpreter::new(llm, history.clone(), stores.profiles, config),
            dispatcher: ActionDispatcher::new(resolver),
            history,
        }
    }

    /// Interpreter half of the pipeline
    #[must_use]
    pub const fn interpreter(&self) -> &ActionInterpreter {
        &self.interpreter
    }

    /// Dispatcher half of the pipeline
    #[must_use]
    pub const fn dispatcher(&self) -> &ActionDispatcher<C> {
        &self.dispatcher
    }

    /// Interpret `utterance`, dispatch the action, and remember the reply
    ///
    /// # Errors
    ///
    /// Returns an error if dispatch hits a store failure
    #[instrument(skip(self, utterance), fields(user_id = %user_id))]
    pub async fn respond(&self, utterance: &str, user_id: &str) -> AppResult<CoachReply> {
        let action = self.interpreter.interpret(utterance, user_id).await;
        let reply = self.dispatcher.dispatch(&action, user_id).await?;
        self.history
            .append(user_id, &HistoryEntry::assistant(&reply))
            .await;
        Ok(CoachReply { action, reply })
    }
}
