// ABOUTME: ParsedAction sum type decoded from model JSON, with the action alias table
// ABOUTME: Tolerates code fences and prose around the object; field shapes decode leniently
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

//! # Parsed actions
//!
//! The model answers with one JSON object whose `action` label selects the
//! variant. Labels are normalized once through [`ActionKind::from_label`];
//! anything outside the table becomes [`ActionBody::Unrecognized`] so the
//! reply text still reaches the user.

use crate::intelligence::CheckIn;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use thiserror::Error;
use uuid::Uuid;

/// Labels the model may use for logging training
const LOG_WORKOUT_ALIASES: &[&str] = &[
    "log_workout",
    "log_workouts",
    "record_workout",
    "record_workouts",
    "save_workout",
    "save_workouts",
    "add_workout",
    "add_workouts",
    "log_exercise",
    "log_exercises",
    "log_sets",
    "log_set",
];

/// Canonical action kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    /// Record sets against a workout, creating routine/workout on demand
    LogWorkout,
    /// Create a named routine
    CreateRoutine,
    /// Delete a routine with everything under it
    DeleteRoutine,
    /// Delete one workout with its sets
    DeleteWorkout,
    /// Delete one set or all sets of a workout
    DeleteSet,
    /// Daily readiness report
    CheckIn,
    /// Ask the coach what to train
    GetRecommendation,
    /// Free-form question or chat
    FitnessQuestion,
}

impl ActionKind {
    /// Every kind, in prompt order
    pub const ALL: [Self; 8] = [
        Self::LogWorkout,
        Self::CreateRoutine,
        Self::DeleteRoutine,
        Self::DeleteWorkout,
        Self::DeleteSet,
        Self::CheckIn,
        Self::GetRecommendation,
        Self::FitnessQuestion,
    ];

    /// Map a model label onto a kind
    ///
    /// Case-insensitive; `-` and spaces count as `_`.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let normalized: String = label
            .trim()
            .chars()
            .map(|c| match c {
                '-' | ' ' => '_',
                other => other.to_ascii_lowercase(),
            })
            .collect();

        if LOG_WORKOUT_ALIASES.contains(&normalized.as_str()) {
            return Some(Self::LogWorkout);
        }

        match normalized.as_str() {
            "create_routine" => Some(Self::CreateRoutine),
            "delete_routine" => Some(Self::DeleteRoutine),
            "delete_workout" => Some(Self::DeleteWorkout),
            "delete_set" | "delete_sets" => Some(Self::DeleteSet),
            "check_in" | "checkin" | "daily_check_in" => Some(Self::CheckIn),
            "get_recommendation" | "get_recommendations" | "recommendation" => {
                Some(Self::GetRecommendation)
            }
            "fitness_question" | "fitness_response" => Some(Self::FitnessQuestion),
            _ => None,
        }
    }

    /// Canonical label
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::LogWorkout => "log_workout",
            Self::CreateRoutine => "create_routine",
            Self::DeleteRoutine => "delete_routine",
            Self::DeleteWorkout => "delete_workout",
            Self::DeleteSet => "delete_set",
            Self::CheckIn => "check_in",
            Self::GetRecommendation => "get_recommendation",
            Self::FitnessQuestion => "fitness_question",
        }
    }
}

/// Why model output could not become a [`ParsedAction`]
#[derive(Debug, Error)]
pub enum ActionParseError {
    /// No `{...}` object anywhere in the text
    #[error("no JSON object found in model output")]
    NoJsonObject,
    /// The object did not decode
    #[error("invalid action JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
    /// The object has no usable `action` label
    #[error("action JSON has no action label")]
    MissingAction,
}

/// One logged set
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SetInput {
    /// Repetitions
    pub reps: i64,
    /// Load
    pub weight: f64,
    /// Calories for this set, when reported
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calories: Option<f64>,
}

/// One workout inside a log action
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkoutEntry {
    /// Exercise name, `None` falls back to the default workout name
    pub workout_name: Option<String>,
    /// Sets to append
    pub sets: Vec<SetInput>,
    /// Aggregate calories to store on the workout
    pub calories: Option<f64>,
}

/// Payload of a log-workout action
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogWorkout {
    /// Routine name, `None` falls back to the default routine
    pub routine_name: Option<String>,
    /// Explicit routine id; takes precedence over the name and is ownership checked
    pub routine_id: Option<Uuid>,
    /// Workouts to log, never empty after parsing
    pub entries: Vec<WorkoutEntry>,
}

/// Coaching recommendation payload
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    /// Text shown to the user
    #[serde(default)]
    pub message: Option<String>,
    /// Suggested intensity multiplier
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub intensity: Option<f64>,
    /// Body part or quality to focus on
    #[serde(default)]
    pub focus: Option<String>,
    /// Suggested exercises
    #[serde(default, deserialize_with = "lenient::vec_or_empty")]
    pub exercises: Vec<String>,
}

/// Variant-specific payload
#[derive(Debug, Clone, PartialEq)]
pub enum ActionBody {
    /// Log training
    LogWorkout(LogWorkout),
    /// Create a routine
    CreateRoutine {
        /// Routine to create
        routine_name: Option<String>,
    },
    /// Delete a routine
    DeleteRoutine {
        /// Routine to delete
        routine_name: Option<String>,
    },
    /// Delete a workout
    DeleteWorkout {
        /// Routine holding the workout
        routine_name: Option<String>,
        /// Workout to delete
        workout_name: Option<String>,
    },
    /// Delete a set, or every set of a workout
    DeleteSet {
        /// Routine holding the workout
        routine_name: Option<String>,
        /// Workout holding the sets
        workout_name: Option<String>,
        /// Single set to delete
        set_id: Option<Uuid>,
    },
    /// Daily readiness report
    CheckIn(Option<CheckIn>),
    /// Recommendation request
    GetRecommendation(Option<Recommendation>),
    /// Free-form question
    FitnessQuestion,
    /// Label outside the table, kept verbatim
    Unrecognized {
        /// Label as the model sent it
        label: String,
    },
}

/// Structured action produced by the interpreter
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedAction {
    /// Day the action refers to
    pub date: Option<NaiveDate>,
    /// Reply text from the model
    pub response: Option<String>,
    /// Secondary reply text some actions use
    pub message: Option<String>,
    /// Variant payload
    pub body: ActionBody,
}

impl ParsedAction {
    /// Action with the given body and no text
    #[must_use]
    pub const fn new(body: ActionBody) -> Self {
        Self {
            date: None,
            response: None,
            message: None,
            body,
        }
    }

    /// Fitness question answered with `response`
    #[must_use]
    pub fn fitness_question(response: impl Into<String>) -> Self {
        Self {
            response: Some(response.into()),
            ..Self::new(ActionBody::FitnessQuestion)
        }
    }

    /// Set the reply text
    #[must_use]
    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    /// Set the action date
    #[must_use]
    pub const fn with_date(mut self, date: NaiveDate) -> Self {
        self.date = Some(date);
        self
    }

    /// Canonical kind, `None` for unrecognized labels
    #[must_use]
    pub const fn kind(&self) -> Option<ActionKind> {
        match &self.body {
            ActionBody::LogWorkout(_) => Some(ActionKind::LogWorkout),
            ActionBody::CreateRoutine { .. } => Some(ActionKind::CreateRoutine),
            ActionBody::DeleteRoutine { .. } => Some(ActionKind::DeleteRoutine),
            ActionBody::DeleteWorkout { .. } => Some(ActionKind::DeleteWorkout),
            ActionBody::DeleteSet { .. } => Some(ActionKind::DeleteSet),
            ActionBody::CheckIn(_) => Some(ActionKind::CheckIn),
            ActionBody::GetRecommendation(_) => Some(ActionKind::GetRecommendation),
            ActionBody::FitnessQuestion => Some(ActionKind::FitnessQuestion),
            ActionBody::Unrecognized { .. } => None,
        }
    }

    /// Label for logs: canonical for known kinds, verbatim otherwise
    #[must_use]
    pub fn label(&self) -> &str {
        match &self.body {
            ActionBody::Unrecognized { label } => label,
            _ => self.kind().map_or("unknown", |k| k.as_str()),
        }
    }

    /// First non-blank of `response` then `message`
    #[must_use]
    pub fn reply_text(&self) -> Option<&str> {
        non_blank(self.response.as_deref()).or_else(|| non_blank(self.message.as_deref()))
    }

    /// First non-blank of `message` then `response`
    #[must_use]
    pub fn message_text(&self) -> Option<&str> {
        non_blank(self.message.as_deref()).or_else(|| non_blank(self.response.as_deref()))
    }

    /// Decode model output, locating the JSON object first
    ///
    /// # Errors
    ///
    /// Returns an error when no object can be found or it does not decode
    pub fn from_model_output(text: &str) -> Result<Self, ActionParseError> {
        let json = extract_json(text).ok_or(ActionParseError::NoJsonObject)?;
        Self::from_json(json)
    }

    /// Decode one JSON action object
    ///
    /// # Errors
    ///
    /// Returns an error when the text is not a JSON object or has no label
    pub fn from_json(json: &str) -> Result<Self, ActionParseError> {
        let raw: RawAction = serde_json::from_str(json)?;
        raw.into_action()
    }

    /// Re-encode with the canonical label
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut value = match &self.body {
            ActionBody::LogWorkout(log) => json!({
                "routineName": log.routine_name,
                "routineId": log.routine_id,
                "workouts": log.entries.iter().map(|e| json!({
                    "workoutName": e.workout_name,
                    "sets": e.sets,
                    "calories": e.calories,
                })).collect::<Vec<_>>(),
            }),
            ActionBody::CreateRoutine { routine_name } | ActionBody::DeleteRoutine { routine_name } => {
                json!({ "routineName": routine_name })
            }
            ActionBody::DeleteWorkout {
                routine_name,
                workout_name,
            } => json!({ "routineName": routine_name, "workoutName": workout_name }),
            ActionBody::DeleteSet {
                routine_name,
                workout_name,
                set_id,
            } => json!({
                "routineName": routine_name,
                "workoutName": workout_name,
                "setId": set_id,
            }),
            ActionBody::CheckIn(check_in) => json!({ "checkIn": check_in }),
            ActionBody::GetRecommendation(rec) => json!({ "recommendation": rec }),
            ActionBody::FitnessQuestion | ActionBody::Unrecognized { .. } => json!({}),
        };

        if let Value::Object(map) = &mut value {
            map.insert("action".to_owned(), Value::from(self.label()));
            map.insert("date".to_owned(), json!(self.date));
            map.insert("response".to_owned(), json!(self.response));
            map.insert("message".to_owned(), json!(self.message));
            map.retain(|_, v| !v.is_null());
        }
        value
    }
}

fn non_blank(text: Option<&str>) -> Option<&str> {
    text.filter(|t| !t.trim().is_empty())
}

/// Locate the single JSON object in model output
///
/// Accepts a bare object, a fenced block (with or without a `json` tag) or
/// prose surrounding one object.
#[must_use]
pub fn extract_json(text: &str) -> Option<&str> {
    let trimmed = text.trim();
    if trimmed.starts_with('{') && trimmed.ends_with('}') {
        return Some(trimmed);
    }

    if let Some(start) = trimmed.find("```") {
        let after_fence = &trimmed[start + 3..];
        // Skip the info string ("json", "JSON", ...) up to the newline
        let body_start = after_fence.find('\n').map_or(0, |i| i + 1);
        let body = &after_fence[body_start..];
        if let Some(end) = body.find("```") {
            let block = body[..end].trim();
            if block.starts_with('{') && block.ends_with('}') {
                return Some(block);
            }
        }
    }

    let start = trimmed.find('{')?;
    let end = trimmed.rfind('}')?;
    (end > start).then(|| &trimmed[start..=end])
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAction {
    #[serde(default, alias = "type")]
    action: Option<String>,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_date")]
    date: Option<NaiveDate>,
    #[serde(default)]
    routine_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_uuid")]
    routine_id: Option<Uuid>,
    #[serde(default)]
    workout_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::vec_or_empty")]
    sets: Vec<RawSet>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    calories: Option<f64>,
    #[serde(default, deserialize_with = "lenient::vec_or_empty")]
    workouts: Vec<RawWorkout>,
    #[serde(default, deserialize_with = "lenient::opt_uuid")]
    set_id: Option<Uuid>,
    #[serde(default, alias = "check_in")]
    check_in: Option<RawCheckIn>,
    #[serde(default, deserialize_with = "lenient::opt_recommendation")]
    recommendation: Option<Recommendation>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawWorkout {
    #[serde(default, alias = "name")]
    workout_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::vec_or_empty")]
    sets: Vec<RawSet>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    calories: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawSet {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    reps: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    weight: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    calories: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawCheckIn {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    energy_level: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    sleep_quality: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    soreness_level: Option<f64>,
}

impl RawSet {
    #[allow(clippy::cast_possible_truncation)]
    fn into_set(self) -> SetInput {
        SetInput {
            reps: self.reps.map_or(0, |r| r.round().max(0.0) as i64),
            weight: self.weight.unwrap_or(0.0).max(0.0),
            calories: self.calories,
        }
    }
}

impl RawCheckIn {
    /// Missing values count as neutral; present values clamp into 1..=5
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn into_check_in(self) -> CheckIn {
        let scale = |v: Option<f64>| v.map_or(3, |v| v.round().clamp(1.0, 5.0) as u8);
        CheckIn::new(
            scale(self.energy_level),
            scale(self.sleep_quality),
            scale(self.soreness_level),
        )
    }
}

fn clean_name(name: Option<String>) -> Option<String> {
    name.filter(|n| !n.trim().is_empty())
}

impl RawAction {
    fn into_action(self) -> Result<ParsedAction, ActionParseError> {
        let label = clean_name(self.action).ok_or(ActionParseError::MissingAction)?;

        let body = match ActionKind::from_label(&label) {
            Some(ActionKind::LogWorkout) => {
                let mut entries: Vec<WorkoutEntry> = self
                    .workouts
                    .into_iter()
                    .map(|w| WorkoutEntry {
                        workout_name: clean_name(w.workout_name),
                        sets: w.sets.into_iter().map(RawSet::into_set).collect(),
                        calories: w.calories,
                    })
                    .collect();
                if entries.is_empty() {
                    entries.push(WorkoutEntry {
                        workout_name: clean_name(self.workout_name),
                        sets: self.sets.into_iter().map(RawSet::into_set).collect(),
                        calories: self.calories,
                    });
                }
                ActionBody::LogWorkout(LogWorkout {
                    routine_name: clean_name(self.routine_name),
                    routine_id: self.routine_id,
                    entries,
                })
            }
            Some(ActionKind::CreateRoutine) => ActionBody::CreateRoutine {
                routine_name: clean_name(self.routine_name),
            },
            Some(ActionKind::DeleteRoutine) => ActionBody::DeleteRoutine {
                routine_name: clean_name(self.routine_name),
            },
            Some(ActionKind::DeleteWorkout) => ActionBody::DeleteWorkout {
                routine_name: clean_name(self.routine_name),
                workout_name: clean_name(self.workout_name),
            },
            Some(ActionKind::DeleteSet) => ActionBody::DeleteSet {
                routine_name: clean_name(self.routine_name),
                workout_name: clean_name(self.workout_name),
                set_id: self.set_id,
            },
            Some(ActionKind::CheckIn) => {
                ActionBody::CheckIn(self.check_in.map(RawCheckIn::into_check_in))
            }
            Some(ActionKind::GetRecommendation) => ActionBody::GetRecommendation(self.recommendation),
            Some(ActionKind::FitnessQuestion) => ActionBody::FitnessQuestion,
            None => ActionBody::Unrecognized { label },
        };

        Ok(ParsedAction {
            date: self.date,
            response: self.response,
            message: self.message,
            body,
        })
    }
}

/// Deserializers that accept the loose shapes models produce
mod lenient {
    use super::{Deserialize, Deserializer, NaiveDate, Recommendation, Uuid, Value};
    use serde::de::{DeserializeOwned, Error as _};

    /// Array of `T`; null or any non-array is an empty list
    pub fn vec_or_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned,
    {
        match Value::deserialize(deserializer)? {
            items @ Value::Array(_) => serde_json::from_value(items).map_err(D::Error::custom),
            _ => Ok(Vec::new()),
        }
    }

    /// Recommendation object, or a bare string taken as its message
    pub fn opt_recommendation<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<Recommendation>, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(message) => Ok(Some(Recommendation {
                message: Some(message),
                ..Recommendation::default()
            })),
            fields @ Value::Object(_) => serde_json::from_value(fields)
                .map(Some)
                .map_err(D::Error::custom),
            _ => Ok(None),
        }
    }

    /// Number, numeric string or null
    pub fn opt_f64<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        })
    }

    /// ISO date; anything else is treated as absent
    pub fn opt_date<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDate>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => s
                .get(..10)
                .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()),
            _ => None,
        })
    }

    /// UUID string; anything else is treated as absent
    pub fn opt_uuid<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Uuid>, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Uuid::parse_str(s.trim()).ok(),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_json_variants() {
        assert_eq!(extract_json(r#"{"a":1}"#), Some(r#"{"a":1}"#));
        assert_eq!(
            extract_json("```json\n{\"a\":1}\n```"),
            Some("{\"a\":1}")
        );
        assert_eq!(extract_json("```\n{\"a\":1}\n```"), Some("{\"a\":1}"));
        assert_eq!(
            extract_json("Sure! {\"a\":1} hope that helps"),
            Some("{\"a\":1}")
        );
        assert_eq!(extract_json("no json here"), None);
    }

    #[test]
    fn test_lenient_numbers_and_dates() {
        let action = ParsedAction::from_json(
            r#"{"action":"log_workout","date":"2025-03-04T10:00:00Z",
                "sets":[{"reps":"10","weight":"135.5"}]}"#,
        )
        .unwrap();
        assert_eq!(action.date, NaiveDate::from_ymd_opt(2025, 3, 4));
        let ActionBody::LogWorkout(log) = action.body else {
            panic!("expected log workout");
        };
        assert_eq!(log.entries[0].sets[0].reps, 10);
        assert!((log.entries[0].sets[0].weight - 135.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_partial_check_in_defaults_to_neutral() {
        let action =
            ParsedAction::from_json(r#"{"action":"check_in","checkIn":{"energyLevel":9}}"#)
                .unwrap();
        assert_eq!(
            action.body,
            ActionBody::CheckIn(Some(CheckIn::new(5, 3, 3)))
        );
    }
}
