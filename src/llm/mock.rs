//! Scripted completion backend for testing.
//!
//! Returns predetermined completions in order and records every prompt so
//! loop tests can run without network access.

use anyhow::Result;
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

use super::LlmGateway;

/// A single scripted reply.
#[derive(Debug, Clone)]
pub(crate) enum ScriptedReply {
    /// Return this completion text.
    Text(String),
    /// Fail the request with this message.
    Error(String),
}

/// A fake gateway that replays a script.
///
/// Once the script is exhausted the last reply repeats.
#[derive(Debug, Clone)]
pub(crate) struct ScriptedLlm {
    replies: Arc<Vec<ScriptedReply>>,
    prompts: Arc<Mutex<Vec<String>>>,
}

impl ScriptedLlm {
    pub fn new(replies: Vec<ScriptedReply>) -> Self {
        assert!(!replies.is_empty(), "script needs at least one reply");
        Self {
            replies: Arc::new(replies),
            prompts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Replies with each text in turn.
    pub fn texts(texts: &[&str]) -> Self {
        Self::new(
            texts
                .iter()
                .map(|t| ScriptedReply::Text((*t).to_string()))
                .collect(),
        )
    }

    /// Always replies with the same text.
    pub fn always(text: &str) -> Self {
        Self::texts(&[text])
    }

    /// Always fails with the given message.
    pub fn always_fail(message: &str) -> Self {
        Self::new(vec![ScriptedReply::Error(message.to_string())])
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmGateway for ScriptedLlm {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        let index = {
            let mut prompts = self.prompts.lock().unwrap();
            prompts.push(prompt.to_string());
            prompts.len() - 1
        };
        let reply = &self.replies[index.min(self.replies.len() - 1)];

        match reply {
            ScriptedReply::Text(text) => Ok(text.trim().to_string()),
            ScriptedReply::Error(msg) => anyhow::bail!("{msg}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order_then_repeats_last() {
        let llm = ScriptedLlm::texts(&["first", "second"]);

        assert_eq!(llm.generate("a").await.unwrap(), "first");
        assert_eq!(llm.generate("b").await.unwrap(), "second");
        assert_eq!(llm.generate("c").await.unwrap(), "second");
        assert_eq!(llm.prompts(), ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn test_always_fail() {
        let llm = ScriptedLlm::always_fail("quota exceeded");
        let err = llm.generate("x").await.unwrap_err();
        assert!(err.to_string().contains("quota exceeded"));
        assert_eq!(llm.call_count(), 1);
    }

    #[test]
    fn test_name() {
        assert_eq!(ScriptedLlm::always("ls").name(), "scripted");
    }
}
