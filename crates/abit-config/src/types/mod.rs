//! Configuration type definitions
//!
//! One module per concern. Each type carries serde defaults and a
//! [`Validate`](crate::validation::Validate) impl.

pub mod answer;
pub mod bot;
pub mod chunking;
pub mod core;
pub mod embedding;
pub mod llm;
pub mod retrieval;

pub use answer::{AnswerConfig, AnswerMode, LlmFallback};
pub use bot::BotConfig;
pub use chunking::ChunkingConfig;
pub use core::CoreConfig;
pub use embedding::{EmbeddingBackend, EmbeddingConfig};
pub use llm::LlmConfig;
pub use retrieval::RetrievalConfig;

use serde::{Deserialize, Serialize};

/// Top-level configuration, organized by functional area
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Locations of the corpus and the persisted knowledge base
    #[serde(default)]
    pub core: CoreConfig,

    /// Sentence packing limits
    #[serde(default)]
    pub chunking: ChunkingConfig,

    /// Embedding backend and model
    #[serde(default)]
    pub embedding: EmbeddingConfig,

    /// Nearest-neighbor search and relevance cutoff
    #[serde(default)]
    pub retrieval: RetrievalConfig,

    /// How answers are composed
    #[serde(default)]
    pub answer: AnswerConfig,

    /// LLM completion settings
    #[serde(default)]
    pub llm: LlmConfig,

    /// Telegram transport settings
    #[serde(default)]
    pub bot: BotConfig,
}

impl crate::validation::Validate for Config {
    fn validate(&self) -> crate::error::Result<()> {
        self.core.validate()?;
        self.chunking.validate()?;
        self.embedding.validate()?;
        self.retrieval.validate()?;
        self.answer.validate()?;
        self.llm.validate()?;
        self.bot.validate()?;
        Ok(())
    }
}
