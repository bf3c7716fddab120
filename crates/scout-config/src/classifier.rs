//! Status classification model (OpenAI-compatible chat completions) configuration.

use serde::{Deserialize, Serialize};

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

const fn default_temperature() -> f32 {
    0.0
}

const fn default_timeout_secs() -> u64 {
    60
}

const fn default_examples_per_status() -> usize {
    4
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ClassifierConfig {
    #[serde(default)]
    pub api_key: String,

    /// Base URL; `/chat/completions` is appended.
    #[serde(default = "default_api_base")]
    pub api_base: String,

    #[serde(default = "default_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// JSONL file of labelled profiles replayed to the model as worked
    /// examples before each request.
    #[serde(default)]
    pub examples_path: Option<String>,

    #[serde(default = "default_examples_per_status")]
    pub examples_per_status: usize,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: default_api_base(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            examples_path: None,
            examples_per_status: default_examples_per_status(),
        }
    }
}

impl ClassifierConfig {
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.api_key.is_empty() && !self.model.is_empty()
    }
}
