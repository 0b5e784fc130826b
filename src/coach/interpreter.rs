// ABOUTME: Turns one user utterance into a ParsedAction through the language model
// ABOUTME: Builds the prompt from profile and history; every failure becomes a fallback action
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

//! # Action Interpreter
//!
//! `interpret` never fails. Malformed output, provider errors and timeouts
//! all collapse into a `fitness_question` carrying an apologetic reply.

use super::actions::{ActionBody, ParsedAction};
use super::history::{render_history, ConversationHistory, HistoryEntry};
use crate::config::CoachConfig;
use crate::constants::coach::FALLBACK_RESPONSE;
use crate::database::ProfileStore;
use crate::errors::{AppError, AppResult};
use crate::intelligence::{adjust_intensity, intensity_message};
use crate::llm::prompts::{COACH_ACTIONS_PROMPT, EQUIPMENT_CONTEXT};
use crate::llm::{ChatMessage, ChatRequest, LlmProvider};
use crate::models::UserProfile;
use chrono::{NaiveDate, Utc};
use std::fmt::Write as _;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

/// Build the system prompt for one interpretation
///
/// The profile section is present only for completed profiles; the history
/// section only when there is history.
#[must_use]
pub fn build_system_prompt(
    profile: Option<&UserProfile>,
    history: &[HistoryEntry],
    today: NaiveDate,
) -> String {
    let mut prompt = String::with_capacity(COACH_ACTIONS_PROMPT.len() + EQUIPMENT_CONTEXT.len() + 512);
    prompt.push_str(COACH_ACTIONS_PROMPT);
    prompt.push('\n');
    prompt.push_str(EQUIPMENT_CONTEXT);
    let _ = write!(prompt, "\nToday's date is {today}.\n");

    if let Some(summary) = profile.and_then(UserProfile::prompt_summary) {
        prompt.push_str("\n## User profile\n");
        prompt.push_str(&summary);
        prompt.push('\n');
    }

    if !history.is_empty() {
        prompt.push_str("\n## Recent conversation\n");
        prompt.push_str(&render_history(history));
    }

    prompt
}

/// Fill the action date and extend check-in replies with intensity guidance
#[must_use]
pub fn finalize_action(mut action: ParsedAction, today: NaiveDate) -> ParsedAction {
    if action.date.is_none() {
        action.date = Some(today);
    }

    if let ActionBody::CheckIn(Some(check_in)) = &action.body {
        let multiplier = adjust_intensity(check_in);
        if let Some(sentence) = intensity_message(multiplier) {
            action.response = Some(match action.response.take() {
                Some(text) if !text.trim().is_empty() => format!("{} {sentence}", text.trim_end()),
                _ => sentence,
            });
        }
    }

    action
}

/// LLM-backed utterance interpreter
pub struct ActionInterpreter {
    llm: Arc<dyn LlmProvider>,
    history: ConversationHistory,
    profiles: Arc<dyn ProfileStore>,
    config: CoachConfig,
}

impl ActionInterpreter {
    /// Create an interpreter
    #[must_use]
    pub fn new(
        llm: Arc<dyn LlmProvider>,
        history: ConversationHistory,
        profiles: Arc<dyn ProfileStore>,
        config: CoachConfig,
    ) -> Self {
        Self {
            llm,
            history,
            profiles,
            config,
        }
    }

    /// Interpret `utterance` for `user_id`
    #[instrument(skip(self, utterance), fields(user_id = %user_id, provider = self.llm.name()))]
    pub async fn interpret(&self, utterance: &str, user_id: &str) -> ParsedAction {
        let today = Utc::now().date_naive();

        let history = self
            .history
            .append(user_id, &HistoryEntry::user(utterance))
            .await;
        let profile = self.load_profile(user_id).await;
        let system_prompt = build_system_prompt(profile.as_ref(), &history, today);

        let action = match self.call_model(&system_prompt, utterance).await {
            Ok(output) => match ParsedAction::from_model_output(&output) {
                Ok(action) => action,
                Err(e) => {
                    warn!(error = %e, "Model output was not a valid action");
                    ParsedAction::fitness_question(FALLBACK_RESPONSE)
                }
            },
            Err(e) => {
                warn!(error = %e, "Model call failed");
                ParsedAction::fitness_question(FALLBACK_RESPONSE)
            }
        };

        let action = finalize_action(action, today);
        info!(action = action.label(), "Interpreted utterance");
        action
    }

    async fn load_profile(&self, user_id: &str) -> Option<UserProfile> {
        match self.profiles.get_profile(user_id).await {
            Ok(profile) => profile,
            Err(e) => {
                warn!(user_id, error = %e, "Failed to load user profile");
                None
            }
        }
    }

    async fn call_model(&self, system_prompt: &str, utterance: &str) -> AppResult<String> {
        let request = ChatRequest::new(vec![
            ChatMessage::system(system_prompt),
            ChatMessage::user(utterance),
        ])
        .with_temperature(self.config.temperature)
        .with_max_tokens(self.config.max_tokens)
        .with_json_mode();

        let budget = self.config.llm_timeout();
        let response = timeout(budget, self.llm.complete(&request))
            .await
            .map_err(|_| AppError::timeout(self.llm.name(), budget.as_secs()))??;

        debug!(
            model = %response.model,
            tokens = response.usage.map_or(0, |u| u.total_tokens),
            "Model responded"
        );
        Ok(response.content)
    }
}
