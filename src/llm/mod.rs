//! Completion backends that turn a prompt into the model's next command.
//!
//! The loop only sees the [`LlmGateway`] trait:
//! - `GroqClient`: OpenAI-compatible chat completions over HTTPS
//! - `ScriptedLlm` (tests only): canned completions returned in order

mod error;
mod groq;
#[cfg(test)]
pub(crate) mod mock;

pub(crate) use error::LlmError;
pub(crate) use groq::GroqClient;

use anyhow::Result;
use async_trait::async_trait;

/// Capability: given a prompt, return the model's text.
#[async_trait]
pub(crate) trait LlmGateway: Send + Sync {
    /// Model identifier for display.
    fn name(&self) -> &str;

    /// Sends one prompt and returns the trimmed completion.
    async fn generate(&self, prompt: &str) -> Result<String>;
}
