//! LLM configuration

use serde::{Deserialize, Serialize};

/// LLM (Large Language Model) configuration
///
/// The API key is read from `OPENAI_API_KEY`; without it grounded answers are
/// unavailable and `answer.llm_fallback` applies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Model name
    ///
    /// Examples: "gpt-4o-mini", "gpt-4o"
    #[serde(default = "default_model")]
    pub model: String,

    /// Maximum tokens for LLM responses
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Sampling temperature; kept low so answers stay close to the context
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Optional API base URL override
    ///
    /// Use this to point to alternative OpenAI-compatible endpoints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            api_base: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl crate::validation::Validate for LlmConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::validate_range;

        if self.model.is_empty() {
            return Err(ConfigError::validation(
                "llm.model",
                "Model name cannot be empty",
            ));
        }

        if self.max_tokens == 0 {
            return Err(ConfigError::validation(
                "llm.max_tokens",
                "max_tokens must be > 0",
            ));
        }

        validate_range("llm.temperature", self.temperature, 0.0, 2.0)?;

        if self.timeout_secs == 0 {
            return Err(ConfigError::validation(
                "llm.timeout_secs",
                "timeout_secs must be > 0",
            ));
        }

        if let Some(api_base) = &self.api_base {
            if api_base.is_empty() {
                return Err(ConfigError::validation(
                    "llm.api_base",
                    "API base URL cannot be empty string (use null to unset)",
                ));
            }

            if !api_base.starts_with("http://") && !api_base.starts_with("https://") {
                return Err(ConfigError::validation(
                    "llm.api_base",
                    format!(
                        "API base must start with http:// or https://, got: {}",
                        api_base
                    ),
                ));
            }
        }

        Ok(())
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    1000
}

fn default_temperature() -> f32 {
    0.2
}

fn default_timeout_secs() -> u64 {
    60
}
