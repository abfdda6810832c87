use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const CONFIG_FILE: &str = "cmd-agent.toml";

/// Environment variable holding the completion API credential.
pub(crate) const API_KEY_ENV: &str = "GROQ_API_KEY";
/// Environment variable selecting the completion model.
pub(crate) const MODEL_ENV: &str = "MODEL_ID";
/// Environment variable overriding the completion API base URL.
pub(crate) const BASE_URL_ENV: &str = "GROQ_BASE_URL";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Config {
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub agent: AgentSettings,
}

/// Completion API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LlmConfig {
    /// OpenAI-compatible endpoint root, `/chat/completions` is appended
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier sent with every request
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature (0 = deterministic)
    #[serde(default)]
    pub temperature: f32,

    /// System turn sent ahead of every prompt
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    /// Credential, never read from the config file
    #[serde(skip)]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: 0.0,
            system_prompt: default_system_prompt(),
            api_key: None,
        }
    }
}

/// Loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct AgentSettings {
    /// Directory every generated command runs in
    #[serde(default = "default_sandbox_dir")]
    pub sandbox_dir: PathBuf,

    /// Maximum number of executed commands
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    /// Number of history entries rendered into each prompt
    #[serde(default = "default_history_window")]
    pub history_window: usize,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            sandbox_dir: default_sandbox_dir(),
            max_steps: default_max_steps(),
            history_window: default_history_window(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "https://api.groq.com/openai/v1".to_string()
}

fn default_model() -> String {
    "gpt-4".to_string()
}

fn default_system_prompt() -> String {
    crate::prompt::SYSTEM_ROLE.to_string()
}

fn default_sandbox_dir() -> PathBuf {
    PathBuf::from("agent_sandbox")
}

fn default_max_steps() -> u32 {
    10
}

fn default_history_window() -> usize {
    20
}

impl Config {
    /// Load configuration from file, using defaults if not found
    pub fn load(project_dir: &Path) -> Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        Ok(config)
    }

    /// Apply environment overrides on top of file values.
    ///
    /// Takes a lookup function so tests don't have to mutate the process env.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty(API_KEY_ENV) {
            self.llm.api_key = Some(key);
        }
        if let Some(model) = non_empty(MODEL_ENV) {
            self.llm.model = model;
        }
        if let Some(url) = non_empty(BASE_URL_ENV) {
            self.llm.base_url = url;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    fn env_of(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.agent.sandbox_dir, PathBuf::from("agent_sandbox"));
        assert_eq!(config.agent.max_steps, 10);
        assert_eq!(config.agent.history_window, 20);
        assert_eq!(config.llm.model, "gpt-4");
        assert!(config.llm.temperature.abs() < f32::EPSILON);
        assert_eq!(config.llm.system_prompt, "You are a coding agent.");
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
[llm]
model = "llama-3.3-70b-versatile"

[agent]
sandbox_dir = "work"
max_steps = 3
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.llm.model, "llama-3.3-70b-versatile");
        assert_eq!(config.llm.base_url, "https://api.groq.com/openai/v1");
        assert_eq!(config.agent.sandbox_dir, PathBuf::from("work"));
        assert_eq!(config.agent.max_steps, 3);
        assert_eq!(config.agent.history_window, 20);
    }

    #[test]
    fn test_api_key_is_not_read_from_file() {
        let toml = r#"
[llm]
api_key = "leaked"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(config.llm.api_key.is_none());
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load(dir.path()).unwrap();
        assert_eq!(config.agent.max_steps, 10);
    }

    #[test]
    fn test_load_invalid_file_fails() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "[agent\nmax_steps =").unwrap();
        let err = Config::load(dir.path()).unwrap_err();
        assert!(err.to_string().contains("Failed to parse config file"));
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Config::default();
        config.apply_env(env_of(&[
            (API_KEY_ENV, "gsk_test"),
            (MODEL_ENV, "mixtral-8x7b"),
            (BASE_URL_ENV, "http://localhost:8080/v1"),
        ]));
        assert_eq!(config.llm.api_key.as_deref(), Some("gsk_test"));
        assert_eq!(config.llm.model, "mixtral-8x7b");
        assert_eq!(config.llm.base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = Config::default();
        config.apply_env(env_of(&[(API_KEY_ENV, ""), (MODEL_ENV, "  ")]));
        assert!(config.llm.api_key.is_none());
        assert_eq!(config.llm.model, "gpt-4");
    }
}
