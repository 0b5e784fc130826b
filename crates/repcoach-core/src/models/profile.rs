// ABOUTME: User fitness profile used to personalize the coaching prompt
// ABOUTME: Only included in prompts once the user has completed it
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

use serde::{Deserialize, Serialize};

/// Body metrics and training goal for one user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Current body weight
    pub current_weight: Option<f64>,
    /// Height
    pub height: Option<f64>,
    /// Target body weight
    pub goal_weight: Option<f64>,
    /// Free-text goal (e.g. "build muscle")
    pub fitness_goal: Option<String>,
    /// Whether onboarding filled in the profile
    pub profile_complete: bool,
}

impl UserProfile {
    /// Render the profile as prompt lines, or `None` when incomplete
    #[must_use]
    pub fn prompt_summary(&self) -> Option<String> {
        if !self.profile_complete {
            return None;
        }
        let fmt = |v: Option<f64>| v.map_or_else(|| "unknown".to_owned(), |v| format!("{v}"));
        Some(format!(
            "- Current weight: {}\n- Height: {}\n- Goal weight: {}\n- Fitness goal: {}",
            fmt(self.current_weight),
            fmt(self.height),
            fmt(self.goal_weight),
            self.fitness_goal.as_deref().unwrap_or("not specified"),
        ))
    }
}
