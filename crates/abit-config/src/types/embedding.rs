//! Embedding provider configuration

use serde::{Deserialize, Serialize};

/// Embedding provider configuration
///
/// The same backend and model must be used to build the index and to embed
/// questions; the index records the model id and refuses to load otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Embedding backend to use
    #[serde(default)]
    pub backend: EmbeddingBackend,

    /// Model name for the selected backend
    ///
    /// Examples:
    /// - Local: "intfloat/multilingual-e5-large", "intfloat/multilingual-e5-base"
    /// - OpenAI: "text-embedding-3-small"
    /// - Ollama: "bge-m3"
    #[serde(default = "default_model_name")]
    pub model_name: String,

    /// Texts per embedding call during index builds
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    /// Optional endpoint override for the remote backends
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

/// Embedding backend options
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    /// Local fastembed (ONNX on CPU, model downloaded once)
    #[default]
    Local,

    /// OpenAI API (requires OPENAI_API_KEY)
    #[serde(rename = "openai")]
    External,

    /// Local Ollama server
    Ollama,
}

impl EmbeddingBackend {
    pub const NAMES: [&'static str; 3] = ["local", "openai", "ollama"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "local" | "fastembed" => Some(EmbeddingBackend::Local),
            "openai" | "external" => Some(EmbeddingBackend::External),
            "ollama" => Some(EmbeddingBackend::Ollama),
            _ => None,
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            backend: EmbeddingBackend::Local,
            model_name: default_model_name(),
            batch_size: default_batch_size(),
            base_url: None,
        }
    }
}

impl crate::validation::Validate for EmbeddingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::{validate_non_empty, validate_positive};

        validate_non_empty("embedding.model_name", &self.model_name)?;
        validate_positive("embedding.batch_size", self.batch_size, 0)?;

        if let Some(base) = &self.base_url {
            if !base.starts_with("http://") && !base.starts_with("https://") {
                return Err(ConfigError::validation(
                    "embedding.base_url",
                    format!("must start with http:// or https://, got: {}", base),
                ));
            }
        }

        Ok(())
    }
}

fn default_model_name() -> String {
    "intfloat/multilingual-e5-large".to_string()
}

fn default_batch_size() -> usize {
    32
}
