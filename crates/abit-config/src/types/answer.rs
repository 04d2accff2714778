//! Answer composition configuration

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerConfig {
    #[serde(default)]
    pub mode: AnswerMode,

    /// What to do in grounded mode when no LLM client is available
    #[serde(default)]
    pub llm_fallback: LlmFallback,
}

/// How retrieved chunks become a reply
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AnswerMode {
    /// Retrieved chunks are handed to the LLM as context
    #[default]
    Grounded,
    /// Retrieved chunks are rendered through a fixed template
    Extractive,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LlmFallback {
    /// Answer with the extractive template instead
    #[default]
    Extractive,
    /// Tell the user that generated answers are unavailable
    Notice,
}

impl AnswerMode {
    pub const NAMES: [&'static str; 2] = ["grounded", "extractive"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "grounded" | "llm" => Some(AnswerMode::Grounded),
            "extractive" | "template" => Some(AnswerMode::Extractive),
            _ => None,
        }
    }
}

impl LlmFallback {
    pub const NAMES: [&'static str; 2] = ["extractive", "notice"];

    pub fn parse(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "extractive" => Some(LlmFallback::Extractive),
            "notice" => Some(LlmFallback::Notice),
            _ => None,
        }
    }
}

impl crate::validation::Validate for AnswerConfig {
    fn validate(&self) -> crate::error::Result<()> {
        Ok(())
    }
}
