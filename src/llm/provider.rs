// ABOUTME: LLM provider selector built from environment configuration
// ABOUTME: Chooses Groq cloud or a local OpenAI-compatible endpoint at startup
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

//! # LLM Provider Selector
//!
//! Set `REPCOACH_LLM_PROVIDER`:
//! - `groq` (default): Groq cloud inference (requires `GROQ_API_KEY`)
//! - `local`: Ollama, vLLM or any `OpenAI`-compatible server
//!
//! `REPCOACH_LLM_MODEL` overrides the provider's default model.

use async_trait::async_trait;
use tracing::{debug, info};

use super::{ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, OpenAiCompatibleProvider};
use crate::config::LlmProviderType;
use crate::errors::AppError;

/// Unified chat provider that wraps the configured backend
pub enum ChatProvider {
    /// Groq provider for fast hosted inference
    Groq(OpenAiCompatibleProvider),
    /// Local LLM provider via `OpenAI`-compatible API (Ollama, vLLM, `LocalAI`)
    Local(OpenAiCompatibleProvider),
}

impl ChatProvider {
    /// Create a provider from environment configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the selected provider's required configuration
    /// is missing or its HTTP client cannot be built.
    pub fn from_env() -> Result<Self, AppError> {
        Self::create(LlmProviderType::from_env(), LlmProviderType::model_from_env())
    }

    /// Create a provider of an explicit type
    ///
    /// # Errors
    ///
    /// Returns an error if the provider cannot be initialized.
    pub fn create(provider_type: LlmProviderType, model: Option<String>) -> Result<Self, AppError> {
        info!(
            "Initializing LLM provider: {} (set {} to change)",
            provider_type,
            LlmProviderType::ENV_VAR
        );

        let provider = match provider_type {
            LlmProviderType::Groq => Self::Groq(OpenAiCompatibleProvider::groq_from_env(model)?),
            LlmProviderType::Local => Self::Local(OpenAiCompatibleProvider::local_from_env(model)?),
        };

        debug!(
            "Provider {} initialized with model: {}",
            provider.name(),
            provider.default_model()
        );
        Ok(provider)
    }

    const fn inner(&self) -> &OpenAiCompatibleProvider {
        match self {
            Self::Groq(p) | Self::Local(p) => p,
        }
    }
}

#[async_trait]
impl LlmProvider for ChatProvider {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.inner().capabilities()
    }

    fn default_model(&self) -> &str {
        self.inner().default_model()
    }

    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        self.inner().complete(request).await
    }
}
