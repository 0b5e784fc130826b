// ABOUTME: Executes a ParsedAction against the entity store and produces the reply text
// ABOUTME: Logging resolves routine and workout, updates calories, then inserts sets concurrently
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

//! # Action Dispatcher
//!
//! Multi-step writes are not transactional: a failure part way through a
//! log action leaves the routine and workout that were already resolved.
//! Resolution is idempotent; set insertion is not, so dispatching the same
//! log action twice records its sets twice.
//!
//! Deletes only touch an entity the action names. A delete without a name
//! asks which one is meant, and the confirmation quotes the stored name of
//! what was removed rather than the model's wording.

use super::actions::{ActionBody, LogWorkout, ParsedAction, WorkoutEntry};
use super::fuzzy::normalize_name;
use super::resolver::{EntityResolver, NamedMatch};
use crate::cache::{Cache, CacheProvider};
use crate::constants::coach::{
    DEFAULT_ROUTINE_NAME, GENERIC_RESPONSE, LOGGED_RESPONSE, WHICH_ROUTINE, WHICH_WORKOUT,
};
use crate::database::EntityStore;
use crate::errors::AppResult;
use crate::models::NewSet;
use chrono::{NaiveDate, Utc};
use futures_util::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

/// Performs the side effects of parsed actions
pub struct ActionDispatcher<C: CacheProvider = Cache> {
    store: Arc<dyn EntityStore>,
    resolver: EntityResolver<C>,
}

impl<C: CacheProvider> ActionDispatcher<C> {
    /// Create a dispatcher sharing the resolver's store
    #[must_use]
    pub fn new(resolver: EntityResolver<C>) -> Self {
        Self {
            store: Arc::clone(resolver.store()),
            resolver,
        }
    }

    /// Resolver used for name lookups
    #[must_use]
    pub const fn resolver(&self) -> &EntityResolver<C> {
        &self.resolver
    }

    /// Execute `action` for `user_id` and return a non-empty reply
    ///
    /// # Errors
    ///
    /// Returns an error if the entity store fails
    #[instrument(skip(self, action), fields(user_id = %user_id, action = action.label()))]
    pub async fn dispatch(&self, action: &ParsedAction, user_id: &str) -> AppResult<String> {
        let date = action.date.unwrap_or_else(|| Utc::now().date_naive());

        match &action.body {
            ActionBody::LogWorkout(log) => self.log_workout(action, log, date, user_id).await,
            ActionBody::CreateRoutine { routine_name } => {
                self.create_routine(action, routine_name.as_deref(), user_id)
                    .await
            }
            ActionBody::DeleteRoutine { routine_name } => {
                self.delete_routine(routine_name.as_deref(), user_id).await
            }
            ActionBody::DeleteWorkout {
                routine_name,
                workout_name,
            } => {
                self.delete_workout(
                    routine_name.as_deref(),
                    workout_name.as_deref(),
                    user_id,
                )
                .await
            }
            ActionBody::DeleteSet {
                routine_name,
                workout_name,
                set_id,
            } => match set_id {
                Some(set_id) => self.delete_one_set(*set_id, user_id).await,
                None => {
                    self.delete_workout_sets(
                        routine_name.as_deref(),
                        workout_name.as_deref(),
                        user_id,
                    )
                    .await
                }
            },
            ActionBody::CheckIn(_) => Ok(reply_or(action.reply_text(), GENERIC_RESPONSE)),
            ActionBody::GetRecommendation(rec) => {
                let text = rec
                    .as_ref()
                    .and_then(|r| r.message.as_deref())
                    .filter(|m| !m.trim().is_empty())
                    .or_else(|| action.reply_text());
                Ok(reply_or(text, GENERIC_RESPONSE))
            }
            ActionBody::FitnessQuestion | ActionBody::Unrecognized { .. } => {
                Ok(reply_or(action.reply_text(), GENERIC_RESPONSE))
            }
        }
    }

    async fn log_workout(
        &self,
        action: &ParsedAction,
        log: &LogWorkout,
        date: NaiveDate,
        user_id: &str,
    ) -> AppResult<String> {
        let routine_id = if let Some(explicit) = log.routine_id {
            if !self.resolver.owns_routine(user_id, explicit).await? {
                return Ok("I couldn't find that routine, so nothing was logged.".to_owned());
            }
            explicit
        } else {
            match self
                .resolver
                .resolve_routine(user_id, log.routine_name.as_deref())
                .await?
                .id()
            {
                Some(id) => id,
                None => {
                return Ok(not_found(
                    "routine",
                    &normalize_name(log.routine_name.as_deref(), DEFAULT_ROUTINE_NAME),
                ))
            }
            }
        };

        let mut logged_sets = 0;
        for entry in &log.entries {
            logged_sets += self.log_entry(user_id, routine_id, entry, date).await?;
        }

        info!(%routine_id, workouts = log.entries.len(), sets = logged_sets, "Logged workout");
        Ok(reply_or(action.message_text(), LOGGED_RESPONSE))
    }

    /// Resolve one workout, store its calories, then insert its sets together
    async fn log_entry(
        &self,
        user_id: &str,
        routine_id: Uuid,
        entry: &WorkoutEntry,
        date: NaiveDate,
    ) -> AppResult<usize> {
        let Some(workout_id) = self
            .resolver
            .resolve_workout_on(user_id, routine_id, entry.workout_name.as_deref(), date)
            .await?
            .id()
        else {
            return Ok(0);
        };

        if let Some(calories) = entry.calories {
            self.store
                .update_workout_calories(workout_id, calories)
                .await?;
        }

        let performed_at = date.and_time(Utc::now().time()).and_utc();
        let inserts = entry.sets.iter().map(|set| {
            self.store.create_set(NewSet {
                workout_id,
                reps: set.reps,
                weight: set.weight,
                calories: set.calories,
                date: performed_at,
            })
        });
        let created = try_join_all(inserts).await?;

        debug!(%workout_id, sets = created.len(), "Inserted sets");
        Ok(created.len())
    }

    async fn create_routine(
        &self,
        action: &ParsedAction,
        routine_name: Option<&str>,
        user_id: &str,
    ) -> AppResult<String> {
        let name = normalize_name(routine_name, DEFAULT_ROUTINE_NAME);
        let resolution = self.resolver.resolve_routine(user_id, Some(&name)).await?;

        let fallback = if resolution.is_created() {
            format!("Created your \"{name}\" routine.")
        } else {
            format!("You already have a routine matching \"{name}\".")
        };
        Ok(reply_or(action.reply_text(), &fallback))
    }

    async fn delete_routine(
        &self,
        routine_name: Option<&str>,
        user_id: &str,
    ) -> AppResult<String> {
        let Some(query) = non_blank(routine_name) else {
            return Ok(WHICH_ROUTINE.to_owned());
        };
        let Some(routine) = self.resolver.find_routine(user_id, query).await? else {
            return Ok(not_found("routine", query));
        };

        self.store.delete_routine(routine.id).await?;
        self.resolver.invalidate_user(user_id).await;
        info!(routine_id = %routine.id, name = %routine.name, "Deleted routine");

        Ok(format!(
            "Deleted the \"{}\" routine and everything in it.",
            routine.name
        ))
    }

    /// Locate an existing workout; the routine scope defaults, the workout name does not
    async fn locate_workout(
        &self,
        routine_name: Option<&str>,
        workout_name: &str,
        user_id: &str,
    ) -> AppResult<Option<(Uuid, NamedMatch)>> {
        let routine_query = non_blank(routine_name).unwrap_or(DEFAULT_ROUTINE_NAME);
        let Some(routine) = self.resolver.find_routine(user_id, routine_query).await? else {
            return Ok(None);
        };
        let found = self
            .resolver
            .find_workout(user_id, routine.id, workout_name)
            .await?;
        Ok(found.map(|workout| (routine.id, workout)))
    }

    async fn delete_workout(
        &self,
        routine_name: Option<&str>,
        workout_name: Option<&str>,
        user_id: &str,
    ) -> AppResult<String> {
        let Some(query) = non_blank(workout_name) else {
            return Ok(WHICH_WORKOUT.to_owned());
        };
        let Some((routine_id, workout)) = self
            .locate_workout(routine_name, query, user_id)
            .await?
        else {
            return Ok(not_found("workout", query));
        };

        self.store.delete_workout(workout.id).await?;
        self.resolver.invalidate_workouts(user_id, routine_id).await;
        info!(workout_id = %workout.id, name = %workout.name, "Deleted workout");

        Ok(format!("Deleted your \"{}\" workout.", workout.name))
    }

    async fn delete_workout_sets(
        &self,
        routine_name: Option<&str>,
        workout_name: Option<&str>,
        user_id: &str,
    ) -> AppResult<String> {
        let Some(query) = non_blank(workout_name) else {
            return Ok(WHICH_WORKOUT.to_owned());
        };
        let Some((_, workout)) = self
            .locate_workout(routine_name, query, user_id)
            .await?
        else {
            return Ok(not_found("workout", query));
        };

        let removed = self.store.delete_sets_for_workout(workout.id).await?;
        info!(workout_id = %workout.id, removed, "Deleted sets");

        Ok(format!(
            "Removed {removed} set(s) from \"{}\".",
            workout.name
        ))
    }

    async fn delete_one_set(
        &self,
        set_id: Uuid,
        user_id: &str,
    ) -> AppResult<String> {
        const MISSING: &str = "I couldn't find that set.";

        let Some(set) = self.store.get_set(set_id).await? else {
            return Ok(MISSING.to_owned());
        };
        let Some(workout) = self.store.get_workout(set.workout_id).await? else {
            return Ok(MISSING.to_owned());
        };
        if !self.resolver.owns_routine(user_id, workout.routine_id).await? {
            return Ok(MISSING.to_owned());
        }

        self.store.delete_set(set_id).await?;
        info!(%set_id, "Deleted set");
        Ok("Deleted that set.".to_owned())
    }
}

fn reply_or(text: Option<&str>, fallback: &str) -> String {
    non_blank(text).unwrap_or(fallback).to_owned()
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

fn not_found(kind: &str, name: &str) -> String {
    format!("I couldn't find a {kind} called \"{}\".", normalize_name(Some(name), ""))
}
