// ABOUTME: Core configuration type definitions for LLM provider selection
// ABOUTME: Contains the LlmProviderType enum and its environment parsing
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// LLM provider selection for action interpretation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LlmProviderType {
    /// Groq cloud inference over the `OpenAI`-compatible API (default)
    #[default]
    Groq,
    /// Local LLM provider - `OpenAI`-compatible endpoint (Ollama, vLLM, `LocalAI`)
    Local,
}

impl LlmProviderType {
    /// Environment variable name for LLM provider selection
    pub const ENV_VAR: &'static str = "REPCOACH_LLM_PROVIDER";

    /// Environment variable for model selection
    pub const MODEL_ENV_VAR: &'static str = "REPCOACH_LLM_MODEL";

    /// Parse from string with fallback to default
    #[must_use]
    pub fn from_str_or_default(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "local" | "ollama" | "vllm" | "localai" => Self::Local,
            _ => Self::Groq,
        }
    }

    /// Load from environment variable
    #[must_use]
    pub fn from_env() -> Self {
        env::var(Self::ENV_VAR)
            .map(|s| Self::from_str_or_default(&s))
            .unwrap_or_default()
    }

    /// Model override from environment, `None` when unset or empty
    #[must_use]
    pub fn model_from_env() -> Option<String> {
        env::var(Self::MODEL_ENV_VAR)
            .ok()
            .filter(|s| !s.is_empty())
    }
}

impl Display for LlmProviderType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Groq => write!(f, "groq"),
            Self::Local => write!(f, "local"),
        }
    }
}
