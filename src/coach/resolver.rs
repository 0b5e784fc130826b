// ABOUTME: Fuzzy-then-create resolution of routine and workout names to entity ids
// ABOUTME: Exact match short-circuits; candidate lists are cached and invalidated on create
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

//! # Entity Resolver
//!
//! Resolution order for a candidate name inside one owner scope:
//!
//! 1. Normalize, substituting the default name when blank
//! 2. Case-insensitive exact match straight from the store
//! 3. Best normalized edit distance over the cached candidate list
//! 4. Create, then invalidate the cached list for that scope
//!
//! Workouts are scoped by routine, and the routine must belong to the
//! caller. A foreign routine resolves to [`Resolution::NotFound`] and nothing
//! is created.
//!
//! The lookup-only `find_*` calls stop after step 3 and never substitute a
//! default name: a blank name finds nothing.

use super::fuzzy::{best_match, normalize_name};
use crate::cache::{Cache, CacheKey, CacheProvider, CacheTtlConfig};
use crate::constants::coach::{DEFAULT_ROUTINE_NAME, DEFAULT_WORKOUT_NAME};
use crate::database::EntityStore;
use crate::errors::AppResult;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// How an existing entity was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    /// Same name ignoring case
    Exact,
    /// Within the fuzzy distance threshold
    Fuzzy,
}

/// Outcome of resolving a name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// An existing entity
    Matched {
        /// Entity id
        id: Uuid,
        /// Exact or fuzzy
        kind: MatchKind,
    },
    /// A new entity was inserted
    Created {
        /// Entity id
        id: Uuid,
    },
    /// Scope not owned by the caller
    NotFound,
}

impl Resolution {
    /// Entity id when one was matched or created
    #[must_use]
    pub const fn id(&self) -> Option<Uuid> {
        match self {
            Self::Matched { id, .. } | Self::Created { id } => Some(*id),
            Self::NotFound => None,
        }
    }

    /// Whether this call inserted the entity
    #[must_use]
    pub const fn is_created(&self) -> bool {
        matches!(self, Self::Created { .. })
    }
}

/// Existing entity located by name, carrying its stored name
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedMatch {
    /// Entity id
    pub id: Uuid,
    /// Name as stored, which differs from the query on a fuzzy match
    pub name: String,
    /// Exact or fuzzy
    pub kind: MatchKind,
}

impl From<NamedMatch> for Resolution {
    fn from(found: NamedMatch) -> Self {
        Self::Matched {
            id: found.id,
            kind: found.kind,
        }
    }
}

/// Cached candidate entry
#[derive(Debug, Clone, Serialize, Deserialize)]
struct Candidate {
    id: Uuid,
    name: String,
}

/// Resolves routine and workout names for one store and cache
pub struct EntityResolver<C: CacheProvider = Cache> {
    store: Arc<dyn EntityStore>,
    cache: C,
    ttl: CacheTtlConfig,
    threshold: f64,
}

impl<C: CacheProvider> EntityResolver<C> {
    /// Create a resolver
    #[must_use]
    pub fn new(store: Arc<dyn EntityStore>, cache: C, ttl: CacheTtlConfig, threshold: f64) -> Self {
        Self {
            store,
            cache,
            ttl,
            threshold,
        }
    }

    /// Underlying entity store
    #[must_use]
    pub fn store(&self) -> &Arc<dyn EntityStore> {
        &self.store
    }

    /// Resolve a routine name for `user_id`, creating it when nothing matches
    ///
    /// # Errors
    ///
    /// Returns an error if the entity store fails
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn resolve_routine(&self, user_id: &str, name: Option<&str>) -> AppResult<Resolution> {
        let name = normalize_name(name, DEFAULT_ROUTINE_NAME);
        if let Some(found) = self.match_routine(user_id, &name).await? {
            return Ok(found.into());
        }

        let routine = self.store.create_routine(user_id, &name).await?;
        self.invalidate(&CacheKey::routines(user_id)).await;
        info!(routine_id = %routine.id, name = %routine.name, "Created routine");
        Ok(Resolution::Created { id: routine.id })
    }

    /// Look up a routine without creating one
    ///
    /// # Errors
    ///
    /// Returns an error if the entity store fails
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn find_routine(&self, user_id: &str, name: &str) -> AppResult<Option<NamedMatch>> {
        let name = normalize_name(Some(name), "");
        if name.is_empty() {
            return Ok(None);
        }
        self.match_routine(user_id, &name).await
    }

    /// Resolve a workout name inside `routine_id`, dated today when created
    ///
    /// # Errors
    ///
    /// Returns an error if the entity store fails
    pub async fn resolve_workout(
        &self,
        user_id: &str,
        routine_id: Uuid,
        name: Option<&str>,
    ) -> AppResult<Resolution> {
        self.resolve_workout_on(user_id, routine_id, name, Utc::now().date_naive())
            .await
    }

    /// Resolve a workout name inside `routine_id`, dating a created workout `date`
    ///
    /// # Errors
    ///
    /// Returns an error if the entity store fails
    #[instrument(skip(self), fields(user_id = %user_id, routine_id = %routine_id))]
    pub async fn resolve_workout_on(
        &self,
        user_id: &str,
        routine_id: Uuid,
        name: Option<&str>,
        date: NaiveDate,
    ) -> AppResult<Resolution> {
        if !self.owns_routine(user_id, routine_id).await? {
            return Ok(Resolution::NotFound);
        }

        let name = normalize_name(name, DEFAULT_WORKOUT_NAME);
        if let Some(found) = self.match_workout(user_id, routine_id, &name).await? {
            return Ok(found.into());
        }

        let workout = self.store.create_workout(routine_id, &name, date).await?;
        self.invalidate(&CacheKey::workouts(user_id, routine_id))
            .await;
        info!(workout_id = %workout.id, name = %workout.name, "Created workout");
        Ok(Resolution::Created { id: workout.id })
    }

    /// Look up a workout without creating one
    ///
    /// # Errors
    ///
    /// Returns an error if the entity store fails
    #[instrument(skip(self), fields(user_id = %user_id, routine_id = %routine_id))]
    pub async fn find_workout(
        &self,
        user_id: &str,
        routine_id: Uuid,
        name: &str,
    ) -> AppResult<Option<NamedMatch>> {
        let name = normalize_name(Some(name), "");
        if name.is_empty() || !self.owns_routine(user_id, routine_id).await? {
            return Ok(None);
        }
        self.match_workout(user_id, routine_id, &name).await
    }

    /// Whether `routine_id` exists and belongs to `user_id`
    ///
    /// # Errors
    ///
    /// Returns an error if the entity store fails
    pub async fn owns_routine(&self, user_id: &str, routine_id: Uuid) -> AppResult<bool> {
        let owned = self
            .store
            .get_routine(routine_id)
            .await?
            .is_some_and(|r| r.is_owned_by(user_id));
        if !owned {
            debug!(%routine_id, "Routine missing or owned by another user");
        }
        Ok(owned)
    }

    /// Drop the cached routine list for a user
    pub async fn invalidate_routines(&self, user_id: &str) {
        self.invalidate(&CacheKey::routines(user_id)).await;
    }

    /// Drop the cached workout list for one routine
    pub async fn invalidate_workouts(&self, user_id: &str, routine_id: Uuid) {
        self.invalidate(&CacheKey::workouts(user_id, routine_id))
            .await;
    }

    /// Drop every cached list for a user
    pub async fn invalidate_user(&self, user_id: &str) {
        if let Err(e) = self
            .cache
            .invalidate_prefix(&CacheKey::user_prefix(user_id))
            .await
        {
            warn!(user_id, error = %e, "Failed to invalidate cached entity lists");
        }
    }

    async fn match_routine(&self, user_id: &str, name: &str) -> AppResult<Option<NamedMatch>> {
        if let Some(routine) = self.store.find_routine_by_name(user_id, name).await? {
            debug!(routine_id = %routine.id, "Exact routine match");
            return Ok(Some(NamedMatch {
                id: routine.id,
                name: routine.name,
                kind: MatchKind::Exact,
            }));
        }

        let key = CacheKey::routines(user_id);
        let candidates = match self.cached_candidates(&key).await {
            Some(hit) => hit,
            None => {
                let fresh: Vec<Candidate> = self
                    .store
                    .list_routines(user_id)
                    .await?
                    .into_iter()
                    .map(|r| Candidate {
                        id: r.id,
                        name: r.name,
                    })
                    .collect();
                self.store_candidates(&key, &fresh).await;
                fresh
            }
        };

        Ok(self.fuzzy(name, &candidates))
    }

    async fn match_workout(
        &self,
        user_id: &str,
        routine_id: Uuid,
        name: &str,
    ) -> AppResult<Option<NamedMatch>> {
        if let Some(workout) = self.store.find_workout_by_name(routine_id, name).await? {
            debug!(workout_id = %workout.id, "Exact workout match");
            return Ok(Some(NamedMatch {
                id: workout.id,
                name: workout.name,
                kind: MatchKind::Exact,
            }));
        }

        let key = CacheKey::workouts(user_id, routine_id);
        let candidates = match self.cached_candidates(&key).await {
            Some(hit) => hit,
            None => {
                let fresh: Vec<Candidate> = self
                    .store
                    .list_workouts(routine_id)
                    .await?
                    .into_iter()
                    .map(|w| Candidate {
                        id: w.id,
                        name: w.name,
                    })
                    .collect();
                self.store_candidates(&key, &fresh).await;
                fresh
            }
        };

        Ok(self.fuzzy(name, &candidates))
    }

    fn fuzzy(&self, name: &str, candidates: &[Candidate]) -> Option<NamedMatch> {
        let (candidate, distance) = best_match(
            name,
            candidates.iter().map(|c| (c.name.as_str(), c)),
            self.threshold,
        )?;
        debug!(id = %candidate.id, matched = %candidate.name, distance, "Fuzzy match");
        Some(NamedMatch {
            id: candidate.id,
            name: candidate.name.clone(),
            kind: MatchKind::Fuzzy,
        })
    }

    /// Cache read; failures degrade to a miss
    async fn cached_candidates(&self, key: &CacheKey) -> Option<Vec<Candidate>> {
        match self.cache.get::<Vec<Candidate>>(key).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!(%key, error = %e, "Candidate cache read failed");
                None
            }
        }
    }

    async fn store_candidates(&self, key: &CacheKey, candidates: &[Candidate]) {
        let ttl = self.ttl.ttl_for_resource(&key.resource);
        if let Err(e) = self.cache.set(key, &candidates, ttl).await {
            warn!(%key, error = %e, "Candidate cache write failed");
        }
    }

    async fn invalidate(&self, key: &CacheKey) {
        if let Err(e) = self.cache.invalidate(key).await {
            warn!(%key, error = %e, "Candidate cache invalidation failed");
        }
    }
}
