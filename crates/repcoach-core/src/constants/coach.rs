// ABOUTME: Coaching pipeline constants for entity resolution and reply text
// ABOUTME: Fallback names, fuzzy threshold, history size, and fixed user-facing strings
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

/// Routine name used when a log action names no routine
pub const DEFAULT_ROUTINE_NAME: &str = "General Workout";

/// Workout name used when a log action names no workout
pub const DEFAULT_WORKOUT_NAME: &str = "Workout";

/// Maximum normalized edit distance accepted as a fuzzy match (0 = identical)
pub const FUZZY_MATCH_THRESHOLD: f64 = 0.3;

/// Number of conversation history entries kept per user
pub const HISTORY_LIMIT: usize = 5;

/// Wall-clock budget for one model call
pub const LLM_TIMEOUT_SECS: u64 = 30;

/// Completion token budget for one interpretation
pub const LLM_MAX_TOKENS: u32 = 1024;

/// Sampling temperature for interpretation (low, the output is structured)
pub const LLM_TEMPERATURE: f32 = 0.2;

/// Reply used when model output could not be interpreted
pub const FALLBACK_RESPONSE: &str =
    "I'm sorry, I couldn't process that request. Could you try rephrasing it?";

/// Reply used when an action carries no text of its own
pub const GENERIC_RESPONSE: &str = "I understood your request.";

/// Reply to a routine delete that names no routine
pub const WHICH_ROUTINE: &str = "Which routine do you mean? Tell me its name and I'll delete it.";

/// Reply to a workout or set delete that names no workout
pub const WHICH_WORKOUT: &str = "Which workout do you mean? Tell me its name and I'll delete it.";

/// Reply used after logging a workout when the model gave no text
pub const LOGGED_RESPONSE: &str = "Got it! Your workout has been logged.";

/// Sentence appended to a check-in reply when intensity goes up
pub const INTENSITY_BOOST_MESSAGE: &str =
    "You're feeling great today, so this is a good day to push a little harder.";
