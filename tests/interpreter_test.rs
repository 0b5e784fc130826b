// ABOUTME: Integration tests for turning utterances into parsed actions through a model
// ABOUTME: Uses a scripted provider to cover fallbacks, prompt context and check-in guidance
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use anyhow::Result;
use chrono::Utc;
use common::{Scripted, ScriptedLlmProvider};
use repcoach::coach::{
    build_system_prompt, finalize_action, ActionBody, ActionInterpreter, ConversationHistory,
    HistoryEntry, ParsedAction,
};
use repcoach::config::CoachConfig;
use repcoach::constants::coach::{FALLBACK_RESPONSE, INTENSITY_BOOST_MESSAGE};
use repcoach::database::{HistoryStore, ProfileStore, SqliteDatabase};
use repcoach::errors::AppError;
use repcoach::intelligence::CheckIn;
use repcoach::llm::MessageRole;
use repcoach::models::UserProfile;
use std::sync::Arc;
use std::time::Duration;

fn interpreter_with(
    db: &Arc<SqliteDatabase>,
    llm: &Arc<ScriptedLlmProvider>,
    config: CoachConfig,
) -> ActionInterpreter {
    let history = ConversationHistory::new(Arc::clone(db) as _, config.history_limit);
    ActionInterpreter::new(Arc::clone(llm) as _, history, Arc::clone(db) as _, config)
}

fn interpreter(db: &Arc<SqliteDatabase>, llm: &Arc<ScriptedLlmProvider>) -> ActionInterpreter {
    interpreter_with(db, llm, CoachConfig::default())
}

fn assert_fallback(action: &ParsedAction) {
    assert_eq!(action.body, ActionBody::FitnessQuestion);
    assert_eq!(action.response.as_deref(), Some(FALLBACK_RESPONSE));
}

#[tokio::test]
async fn test_valid_output_is_parsed_and_dated() -> Result<()> {
    let db = common::create_test_database().await?;
    let llm = ScriptedLlmProvider::replying(
        r#"{"action":"create_routine","routineName":"Pull Day","response":"Done!"}"#,
    );

    let action = interpreter(&db, &llm).interpret("make a pull day", "alice").await;

    assert_eq!(
        action.body,
        ActionBody::CreateRoutine {
            routine_name: Some("Pull Day".to_owned())
        }
    );
    assert_eq!(action.date, Some(Utc::now().date_naive()));
    Ok(())
}

#[tokio::test]
async fn test_invalid_json_falls_back() -> Result<()> {
    let db = common::create_test_database().await?;
    let llm = ScriptedLlmProvider::replying("Sure, logging that for you now!");

    let action = interpreter(&db, &llm).interpret("3x10 bench", "alice").await;

    assert_fallback(&action);
    Ok(())
}

#[tokio::test]
async fn test_provider_error_falls_back() -> Result<()> {
    let db = common::create_test_database().await?;
    let llm = Arc::new(ScriptedLlmProvider::new());
    llm.push(Scripted::Fail(AppError::external_service(
        "groq",
        "503 Service Unavailable",
    )));

    let action = interpreter(&db, &llm).interpret("hello", "alice").await;

    assert_fallback(&action);
    Ok(())
}

#[tokio::test]
async fn test_timeout_falls_back() -> Result<()> {
    let db = common::create_test_database().await?;
    let llm = Arc::new(ScriptedLlmProvider::new());
    llm.push(Scripted::Delayed(
        Duration::from_secs(3),
        r#"{"action":"fitness_question","response":"late"}"#.to_owned(),
    ));
    let config = CoachConfig {
        llm_timeout_secs: 1,
        ..CoachConfig::default()
    };

    let action = interpreter_with(&db, &llm, config)
        .interpret("hello", "alice")
        .await;

    assert_fallback(&action);
    Ok(())
}

#[tokio::test]
async fn test_low_readiness_check_in_appends_reduction() -> Result<()> {
    let db = common::create_test_database().await?;
    let llm = ScriptedLlmProvider::replying(
        r#"{"action":"check_in","checkIn":{"energyLevel":1,"sleepQuality":1,"sorenessLevel":1},
            "response":"Thanks for checking in."}"#,
    );

    let action = interpreter(&db, &llm).interpret("wrecked today", "alice").await;

    assert_eq!(action.body, ActionBody::CheckIn(Some(CheckIn::new(1, 1, 1))));
    assert_eq!(
        action.response.as_deref(),
        Some(
            "Thanks for checking in. Based on your check-in, I recommend reducing today's training intensity by 23%."
        )
    );
    Ok(())
}

#[test]
fn test_high_readiness_check_in_appends_boost() {
    let today = Utc::now().date_naive();
    let action = ParsedAction::new(ActionBody::CheckIn(Some(CheckIn::new(5, 5, 1))));

    let action = finalize_action(action, today);

    assert_eq!(action.response.as_deref(), Some(INTENSITY_BOOST_MESSAGE));
}

#[test]
fn test_neutral_check_in_leaves_response_alone() {
    let today = Utc::now().date_naive();
    let action = ParsedAction::new(ActionBody::CheckIn(Some(CheckIn::neutral())))
        .with_response("Noted.");

    let action = finalize_action(action, today);

    assert_eq!(action.response.as_deref(), Some("Noted."));
}

#[tokio::test]
async fn test_request_carries_prompt_and_json_mode() -> Result<()> {
    let db = common::create_test_database().await?;
    let llm = ScriptedLlmProvider::replying(r#"{"action":"fitness_question","response":"ok"}"#);

    interpreter(&db, &llm).interpret("how long to rest?", "alice").await;

    let requests = llm.requests();
    assert_eq!(requests.len(), 1);
    let request = &requests[0];
    assert!(request.json_mode);
    assert_eq!(request.messages.len(), 2);
    assert_eq!(request.messages[0].role, MessageRole::System);
    assert_eq!(request.messages[1].role, MessageRole::User);
    assert_eq!(request.messages[1].content, "how long to rest?");

    let prompt = &request.messages[0].content;
    assert!(prompt.contains(&format!("Today's date is {}", Utc::now().date_naive())));
    assert!(prompt.contains("User: how long to rest?"));
    Ok(())
}

#[tokio::test]
async fn test_history_is_trimmed_to_limit() -> Result<()> {
    let db = common::create_test_database().await?;
    let llm = Arc::new(ScriptedLlmProvider::new());
    for _ in 0..7 {
        llm.push_reply(r#"{"action":"fitness_question","response":"ok"}"#);
    }
    let interpreter = interpreter(&db, &llm);

    for i in 1..=7 {
        interpreter.interpret(&format!("message {i}"), "alice").await;
    }

    let stored = db.get_history("alice").await?;
    assert_eq!(stored.len(), 5);
    let entries: Vec<HistoryEntry> = stored.iter().map(|s| HistoryEntry::decode(s)).collect();
    assert_eq!(entries[0], HistoryEntry::user("message 3"));
    assert_eq!(entries[4], HistoryEntry::user("message 7"));

    let prompt = llm.last_system_prompt();
    assert!(!prompt.contains("message 2"));
    assert!(prompt.contains("message 3"));
    Ok(())
}

#[tokio::test]
async fn test_profile_included_only_when_complete() -> Result<()> {
    let db = common::create_test_database().await?;
    let llm = Arc::new(ScriptedLlmProvider::new());
    llm.push_reply(r#"{"action":"fitness_question","response":"ok"}"#);
    llm.push_reply(r#"{"action":"fitness_question","response":"ok"}"#);
    let interpreter = interpreter(&db, &llm);

    let mut profile = UserProfile {
        current_weight: Some(82.0),
        height: Some(180.0),
        goal_weight: Some(78.0),
        fitness_goal: Some("build muscle".to_owned()),
        profile_complete: false,
    };
    db.upsert_profile("alice", &profile).await?;
    interpreter.interpret("hi", "alice").await;
    assert!(!llm.last_system_prompt().contains("## User profile"));

    profile.profile_complete = true;
    db.upsert_profile("alice", &profile).await?;
    interpreter.interpret("hi again", "alice").await;
    let prompt = llm.last_system_prompt();
    assert!(prompt.contains("## User profile"));
    assert!(prompt.contains("build muscle"));
    Ok(())
}

#[test]
fn test_system_prompt_without_context() {
    let today = Utc::now().date_naive();
    let prompt = build_system_prompt(None, &[], today);

    assert!(!prompt.contains("## User profile"));
    assert!(!prompt.contains("## Recent conversation"));
    for label in [
        "log_workout",
        "create_routine",
        "delete_routine",
        "delete_workout",
        "delete_set",
        "check_in",
        "get_recommendation",
        "fitness_question",
    ] {
        assert!(prompt.contains(label), "prompt is missing {label}");
    }
}

#[test]
fn test_fallback_action_keeps_explicit_date() {
    let date = chrono::NaiveDate::from_ymd_opt(2025, 2, 3).unwrap();
    let action = ParsedAction::fitness_question("hi").with_date(date);

    let action = finalize_action(action, Utc::now().date_naive());

    assert_eq!(action.date, Some(date));
}
