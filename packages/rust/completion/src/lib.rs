//! Completion service client for vetdischarge.
//!
//! The pipeline only depends on the [`CompletionClient`] capability; the
//! OpenAI-compatible HTTP implementation lives in [`chat`].

pub mod chat;

use async_trait::async_trait;
use vetdischarge_shared::Result;

pub use chat::{
    ChatMessage, ChatRequest, ChatResponse, CompletionConfig, GenerationParams, OpenAiClient,
    Role, SYSTEM_PROMPT,
};

/// Sends a rendered prompt to a text-completion service and returns the generated text.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    /// Complete `prompt`, returning the first choice's trimmed text.
    async fn complete(&self, prompt: &str) -> Result<String>;
}
