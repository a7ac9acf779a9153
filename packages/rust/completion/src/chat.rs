//! OpenAI-compatible chat completion client.
//!
//! Sends one `system` + one `user` message to `{base_url}/chat/completions`
//! with fixed sampling parameters and returns the first choice's content.
//! Failures are not retried.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use url::Url;

use vetdischarge_shared::{AppConfig, Credential, DischargeError, Result};

use crate::CompletionClient;

/// System message sent ahead of every prompt.
pub const SYSTEM_PROMPT: &str = "You are a helpful veterinary assistant";

/// User-Agent string for completion requests.
const USER_AGENT: &str = concat!("vetdischarge/", env!("CARGO_PKG_VERSION"));

/// How much of an error body to keep in the error message.
const MAX_ERROR_BODY_CHARS: usize = 500;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// Chat message author.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// Sampling parameters sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct GenerationParams {
    pub temperature: f64,
    pub max_tokens: u32,
    pub frequency_penalty: f64,
    pub presence_penalty: f64,
    pub top_p: f64,
}

impl GenerationParams {
    /// The fixed parameters used for discharge notes.
    pub fn discharge_defaults() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: 500,
            frequency_penalty: 0.2,
            presence_penalty: 0.1,
            top_p: 1.0,
        }
    }
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self::discharge_defaults()
    }
}

/// Request body for `POST /chat/completions`.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest<'a> {
    pub model: &'a str,
    pub messages: Vec<ChatMessage>,
    #[serde(flatten)]
    pub params: GenerationParams,
}

/// Response body; only the fields we read.
#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    #[serde(default)]
    pub choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoice {
    pub message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
pub struct ChatChoiceMessage {
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatResponse {
    /// The first choice's content, trimmed.
    pub fn first_content(&self) -> Result<String> {
        let choice = self
            .choices
            .first()
            .ok_or_else(|| DischargeError::remote("response contained no choices"))?;
        let content = choice
            .message
            .content
            .as_deref()
            .ok_or_else(|| DischargeError::remote("first choice has no message content"))?;
        Ok(content.trim().to_string())
    }
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Everything the HTTP client needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct CompletionConfig {
    pub endpoint: Url,
    pub model: String,
    pub credential: Credential,
    pub timeout: Option<Duration>,
    pub params: GenerationParams,
}

impl CompletionConfig {
    /// Build from the app config and an already-resolved credential.
    pub fn from_app_config(config: &AppConfig, credential: Credential) -> Result<Self> {
        Ok(Self {
            endpoint: chat_endpoint(&config.openai.parsed_base_url()?)?,
            model: config.openai.model.clone(),
            credential,
            timeout: config.openai.timeout_secs.map(Duration::from_secs),
            params: GenerationParams::discharge_defaults(),
        })
    }
}

/// `{base}/chat/completions`, keeping any path prefix such as `/v1`.
fn chat_endpoint(base: &Url) -> Result<Url> {
    let joined = format!("{}/chat/completions", base.as_str().trim_end_matches('/'));
    Url::parse(&joined)
        .map_err(|e| DischargeError::config(format!("invalid completion endpoint '{joined}': {e}")))
}

/// HTTP client for OpenAI-compatible chat completion APIs.
pub struct OpenAiClient {
    http: Client,
    config: CompletionConfig,
}

impl OpenAiClient {
    pub fn new(config: CompletionConfig) -> Result<Self> {
        let mut builder = Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build().map_err(|e| {
            DischargeError::remote(format!("failed to build HTTP client: {e}"))
        })?;
        Ok(Self { http, config })
    }

    fn request_body<'a>(&'a self, prompt: &str) -> ChatRequest<'a> {
        ChatRequest {
            model: &self.config.model,
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(prompt)],
            params: self.config.params,
        }
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    #[instrument(skip_all, fields(model = %self.config.model, prompt_len = prompt.len()))]
    async fn complete(&self, prompt: &str) -> Result<String> {
        let endpoint = self.config.endpoint.as_str();
        info!(endpoint, "requesting chat completion");

        let response = self
            .http
            .post(self.config.endpoint.clone())
            .bearer_auth(self.config.credential.expose())
            .json(&self.request_body(prompt))
            .send()
            .await
            .map_err(|e| DischargeError::remote(format!("{endpoint}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(MAX_ERROR_BODY_CHARS).collect();
            return Err(DischargeError::remote(format!(
                "{endpoint}: HTTP {status}: {body}"
            )));
        }

        let parsed: ChatResponse = response.json().await.map_err(|e| {
            DischargeError::remote(format!("{endpoint}: malformed response: {e}"))
        })?;

        let text = parsed.first_content()?;
        debug!(choices = parsed.choices.len(), chars = text.len(), "completion received");
        Ok(text)
    }
}
