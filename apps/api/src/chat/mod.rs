//! Chat Proxy: forwards a conversation to the OpenAI chat completions API.
//!
//! The API key never lives in server state: it comes from the
//! `x-openai-api-key` request header or, failing that, from `OPENAI_API_KEY`
//! read at request time. One attempt per request; no retries, no streaming.

use serde::{Deserialize, Serialize};
use thiserror::Error;
#[cfg(feature = "chat")]
use tracing::debug;

pub mod handlers;
#[cfg(feature = "chat")]
pub mod prompts;

#[cfg(feature = "chat")]
use prompts::COACH_SYSTEM;

/// Used when the request does not name a model.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const API_KEY_HEADER: &str = "x-openai-api-key";
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";
#[cfg(feature = "chat")]
const MAX_TOKENS: u32 = 800;
#[cfg(feature = "chat")]
const TEMPERATURE: f32 = 0.7;

#[derive(Debug, Error)]
pub enum ChatError {
    #[error("OpenAI client not installed on server")]
    Unavailable,

    #[error("Server missing OPENAI_API_KEY")]
    MissingCredential,

    #[cfg_attr(not(feature = "chat"), allow(dead_code))]
    #[error("{0}")]
    Upstream(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

/// Body of `POST /chat`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatResponse {
    pub content: String,
}

#[cfg(feature = "chat")]
#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
}

#[cfg(feature = "chat")]
#[derive(Debug, Serialize)]
struct WireMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[cfg(feature = "chat")]
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[cfg(feature = "chat")]
#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[cfg(feature = "chat")]
#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
}

#[cfg(feature = "chat")]
#[derive(Debug, Deserialize)]
struct OpenAiError {
    error: OpenAiErrorBody,
}

#[cfg(feature = "chat")]
#[derive(Debug, Deserialize)]
struct OpenAiErrorBody {
    message: String,
}

/// Shared by all `/chat` requests; cloning shares the connection pool.
#[derive(Clone)]
pub struct ChatProxy {
    #[cfg(feature = "chat")]
    client: reqwest::Client,
    #[cfg_attr(not(feature = "chat"), allow(dead_code))]
    base_url: String,
    key_env_var: String,
}

impl ChatProxy {
    pub fn new(base_url: impl Into<String>) -> anyhow::Result<Self> {
        Ok(Self {
            #[cfg(feature = "chat")]
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key_env_var: API_KEY_ENV.to_string(),
        })
    }

    /// Reads the fallback key from `var` instead of `OPENAI_API_KEY`.
    #[cfg(test)]
    pub fn with_key_env_var(mut self, var: &str) -> Self {
        self.key_env_var = var.to_string();
        self
    }

    /// Sends the conversation with the coach system prompt prepended and
    /// returns the first completion's text, or `""` when it carries none.
    pub async fn reply(
        &self,
        header_key: Option<&str>,
        request: &ChatRequest,
    ) -> Result<String, ChatError> {
        if !cfg!(feature = "chat") {
            return Err(ChatError::Unavailable);
        }
        let api_key = resolve_api_key(header_key, std::env::var(&self.key_env_var).ok())?;
        self.complete(&api_key, request).await
    }

    #[cfg(feature = "chat")]
    async fn complete(&self, api_key: &str, request: &ChatRequest) -> Result<String, ChatError> {
        let model = request
            .model
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or(DEFAULT_MODEL);
        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        messages.push(WireMessage {
            role: "system",
            content: COACH_SYSTEM,
        });
        messages.extend(request.messages.iter().map(|m| WireMessage {
            role: &m.role,
            content: &m.content,
        }));

        let body = CompletionRequest {
            model,
            messages,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| ChatError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OpenAiError>(&text)
                .map(|e| e.error.message)
                .unwrap_or(text);
            return Err(ChatError::Upstream(format!(
                "status {}: {message}",
                status.as_u16()
            )));
        }

        let completion: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ChatError::Upstream(e.to_string()))?;

        debug!(model, choices = completion.choices.len(), "Chat completion received");

        completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content.unwrap_or_default())
            .ok_or_else(|| ChatError::Upstream("response contained no choices".to_string()))
    }

    #[cfg(not(feature = "chat"))]
    async fn complete(&self, _api_key: &str, _request: &ChatRequest) -> Result<String, ChatError> {
        Err(ChatError::Unavailable)
    }
}

/// A non-empty header wins over the environment; the chosen value is trimmed
/// and must not end up blank.
fn resolve_api_key(header: Option<&str>, env: Option<String>) -> Result<String, ChatError> {
    let raw = match header {
        Some(h) if !h.is_empty() => h.to_string(),
        _ => env.unwrap_or_default(),
    };
    let key = raw.trim();
    if key.is_empty() {
        return Err(ChatError::MissingCredential);
    }
    Ok(key.to_string())
}
