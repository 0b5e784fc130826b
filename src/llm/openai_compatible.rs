// ABOUTME: OpenAI-compatible chat completions client for Groq cloud and local endpoints
// ABOUTME: Works with Groq, Ollama, vLLM, LocalAI and any /chat/completions server
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Repcoach Contributors

//! # `OpenAI`-Compatible Provider
//!
//! ## Configuration
//!
//! Groq (default provider):
//! - `GROQ_API_KEY`: API key (required)
//!
//! Local provider:
//! - `LOCAL_LLM_BASE_URL`: Base URL (default: <http://localhost:11434/v1> for Ollama)
//! - `LOCAL_LLM_MODEL`: Model to use (default: `qwen2.5:14b-instruct`)
//! - `LOCAL_LLM_API_KEY`: API key (optional, empty for local servers)

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;
use tracing::{debug, error, info, instrument};

use super::{ChatMessage, ChatRequest, ChatResponse, LlmCapabilities, LlmProvider, TokenUsage};
use crate::errors::AppError;

/// Environment variable for the Groq API key
const GROQ_API_KEY_ENV: &str = "GROQ_API_KEY";

/// Groq `OpenAI`-compatible base URL
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Default Groq model
const GROQ_DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Environment variable for local LLM base URL
const LOCAL_LLM_BASE_URL_ENV: &str = "LOCAL_LLM_BASE_URL";

/// Environment variable for local LLM model
const LOCAL_LLM_MODEL_ENV: &str = "LOCAL_LLM_MODEL";

/// Environment variable for local LLM API key (optional)
const LOCAL_LLM_API_KEY_ENV: &str = "LOCAL_LLM_API_KEY";

/// Default base URL (Ollama)
const LOCAL_DEFAULT_BASE_URL: &str = "http://localhost:11434/v1";

/// Default model for local inference
const LOCAL_DEFAULT_MODEL: &str = "qwen2.5:14b-instruct";

const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Upper bound for the HTTP exchange; the interpreter applies its own shorter budget
const REQUEST_TIMEOUT_SECS: u64 = 120;

#[derive(Debug, Serialize)]
struct OpenAiRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    format_type: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct OpenAiMessage {
    role: String,
    content: String,
}

impl From<&ChatMessage> for OpenAiMessage {
    fn from(msg: &ChatMessage) -> Self {
        Self {
            role: msg.role.as_str().to_owned(),
            content: msg.content.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct OpenAiResponse {
    choices: Vec<OpenAiChoice>,
    #[serde(default)]
    usage: Option<OpenAiUsage>,
    model: String,
}

#[derive(Debug, Deserialize)]
struct OpenAiChoice {
    message: OpenAiResponseMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAiUsage {
    #[serde(rename = "prompt_tokens")]
    prompt: u32,
    #[serde(rename = "completion_tokens")]
    completion: u32,
    #[serde(rename = "total_tokens")]
    total: u32,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorResponse {
    error: OpenAiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct OpenAiErrorDetail {
    message: String,
    #[serde(rename = "type")]
    error_type: Option<String>,
}

/// Configuration for the `OpenAI`-compatible provider
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleConfig {
    /// Base URL for the API (e.g., <http://localhost:11434/v1>)
    pub base_url: String,
    /// API key (optional for local servers)
    pub api_key: Option<String>,
    /// Default model to use
    pub default_model: String,
    /// Provider name for logging and error attribution
    pub provider_name: &'static str,
    /// Capabilities of this provider
    pub capabilities: LlmCapabilities,
}

impl OpenAiCompatibleConfig {
    /// Configuration for Groq cloud inference
    #[must_use]
    pub fn groq(api_key: impl Into<String>, model: Option<String>) -> Self {
        Self {
            base_url: GROQ_BASE_URL.to_owned(),
            api_key: Some(api_key.into()),
            default_model: model.unwrap_or_else(|| GROQ_DEFAULT_MODEL.to_owned()),
            provider_name: "groq",
            capabilities: LlmCapabilities::JSON_MODE,
        }
    }
}

/// Generic `OpenAI`-compatible LLM provider
pub struct OpenAiCompatibleProvider {
    client: Client,
    config: OpenAiCompatibleConfig,
}

impl OpenAiCompatibleProvider {
    /// Create a new provider with the given configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn new(config: OpenAiCompatibleConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(|e| AppError::internal(format!("Failed to create HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Create a Groq provider from `GROQ_API_KEY`
    ///
    /// # Errors
    ///
    /// Returns an error if `GROQ_API_KEY` is not set or the HTTP client cannot be created.
    pub fn groq_from_env(model: Option<String>) -> Result<Self, AppError> {
        let api_key = env::var(GROQ_API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AppError::config(format!(
                    "Missing {GROQ_API_KEY_ENV} environment variable. Get your API key from https://console.groq.com/keys"
                ))
            })?;

        let config = OpenAiCompatibleConfig::groq(api_key, model);
        info!(model = %config.default_model, "Initializing Groq provider");
        Self::new(config)
    }

    /// Create a local provider from `LOCAL_LLM_*` environment variables
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn local_from_env(model: Option<String>) -> Result<Self, AppError> {
        let base_url =
            env::var(LOCAL_LLM_BASE_URL_ENV).unwrap_or_else(|_| LOCAL_DEFAULT_BASE_URL.to_owned());
        let default_model = model
            .or_else(|| env::var(LOCAL_LLM_MODEL_ENV).ok())
            .unwrap_or_else(|| LOCAL_DEFAULT_MODEL.to_owned());
        let api_key = env::var(LOCAL_LLM_API_KEY_ENV)
            .ok()
            .filter(|k| !k.is_empty());

        let provider_name = if base_url.contains(":11434") {
            "ollama"
        } else if base_url.contains(":8000") {
            "vllm"
        } else {
            "local"
        };

        let config = OpenAiCompatibleConfig {
            base_url,
            api_key,
            default_model,
            provider_name,
            capabilities: LlmCapabilities::empty(),
        };

        info!(
            "Initializing {} provider: base_url={}, model={}",
            config.provider_name, config.base_url, config.default_model
        );

        Self::new(config)
    }

    fn api_url(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            endpoint
        )
    }

    fn add_auth_header(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref api_key) = self.config.api_key {
            request.header("Authorization", format!("Bearer {api_key}"))
        } else {
            request
        }
    }

    /// Wire request for `request`, asking for a JSON object only when supported
    fn build_request(&self, request: &ChatRequest) -> OpenAiRequest {
        let model = request
            .model
            .as_deref()
            .unwrap_or(&self.config.default_model);

        let response_format = (request.json_mode && self.config.capabilities.supports_json_mode())
            .then_some(ResponseFormat {
                format_type: "json_object",
            });

        OpenAiRequest {
            model: model.to_owned(),
            messages: request.messages.iter().map(OpenAiMessage::from).collect(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            stream: false,
            response_format,
        }
    }

    /// Map a non-success HTTP response into an `AppError`
    fn parse_error_response(&self, status: reqwest::StatusCode, body: &str) -> AppError {
        let service = self.config.provider_name;
        let Ok(error_response) = serde_json::from_str::<OpenAiErrorResponse>(body) else {
            return match status.as_u16() {
                502..=504 => AppError::external_service(
                    service,
                    format!("{service} server is not responding at {}", self.config.base_url),
                ),
                _ => AppError::external_service(
                    service,
                    format!(
                        "API error ({}): {}",
                        status,
                        body.chars().take(200).collect::<String>()
                    ),
                ),
            };
        };

        let detail = error_response.error.message;
        match status.as_u16() {
            401 => AppError::auth_invalid(format!("API authentication failed: {detail}")),
            400 => AppError::invalid_input(format!("API validation error: {detail}")),
            404 => AppError::not_found(format!("Model or endpoint not found: {detail}")),
            429 => AppError::external_service(service, format!("Rate limit reached: {detail}")),
            _ => AppError::external_service(
                service,
                format!(
                    "{} - {detail}",
                    error_response
                        .error
                        .error_type
                        .as_deref()
                        .unwrap_or("unknown")
                ),
            ),
        }
    }
}

#[async_trait]
impl LlmProvider for OpenAiCompatibleProvider {
    fn name(&self) -> &'static str {
        self.config.provider_name
    }

    fn capabilities(&self) -> LlmCapabilities {
        self.config.capabilities
    }

    fn default_model(&self) -> &str {
        &self.config.default_model
    }

    #[instrument(skip(self, request), fields(provider = self.config.provider_name, model = %request.model.as_deref().unwrap_or(&self.config.default_model)))]
    async fn complete(&self, request: &ChatRequest) -> Result<ChatResponse, AppError> {
        let openai_request = self.build_request(request);

        debug!(
            messages = openai_request.messages.len(),
            "Sending chat completion request"
        );

        let http_request = self
            .client
            .post(self.api_url("chat/completions"))
            .header("Content-Type", "application/json")
            .json(&openai_request);

        let response = self
            .add_auth_header(http_request)
            .send()
            .await
            .map_err(|e| {
                error!("Failed to send request to {}: {}", self.config.provider_name, e);
                if e.is_timeout() {
                    AppError::timeout(self.config.provider_name, REQUEST_TIMEOUT_SECS)
                } else if e.is_connect() {
                    AppError::external_service(
                        self.config.provider_name,
                        format!("Cannot connect to {}", self.config.base_url),
                    )
                } else {
                    AppError::external_service(
                        self.config.provider_name,
                        format!("Failed to connect: {e}"),
                    )
                }
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            AppError::external_service(
                self.config.provider_name,
                format!("Failed to read response: {e}"),
            )
        })?;

        if !status.is_success() {
            return Err(self.parse_error_response(status, &body));
        }

        let openai_response: OpenAiResponse = serde_json::from_str(&body).map_err(|e| {
            error!(
                "Failed to parse API response: {} - body: {}",
                e,
                body.chars().take(500).collect::<String>()
            );
            AppError::external_service(
                self.config.provider_name,
                format!("Failed to parse response: {e}"),
            )
        })?;

        let choice = openai_response.choices.into_iter().next().ok_or_else(|| {
            AppError::external_service(self.config.provider_name, "API response has no choices")
        })?;

        Ok(ChatResponse {
            content: choice.message.content.unwrap_or_default(),
            model: openai_response.model,
            usage: openai_response.usage.map(|u| TokenUsage {
                prompt_tokens: u.prompt,
                completion_tokens: u.completion,
                total_tokens: u.total,
            }),
            finish_reason: choice.finish_reason,
        })
    }
}
