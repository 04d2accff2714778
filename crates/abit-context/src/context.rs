use crate::embedder::select_embedder;
use crate::llm::connect_llm;
use abit_config::Config;
use abit_core::{Embedder, ModelProvider};
use abit_index::{IndexError, KnowledgeBase};
use anyhow::{Context, Result};
use std::sync::Arc;

/// Everything a request handler reads. Built once before any traffic is
/// accepted and never mutated afterwards, so it is shared as `Arc` without
/// locks.
pub struct ServiceContext {
    pub config: Config,
    pub embedder: Arc<dyn Embedder>,
    pub knowledge: Arc<KnowledgeBase>,
    /// `None` when no key is configured or the key was rejected at startup
    pub llm: Option<Arc<dyn ModelProvider>>,
}

impl ServiceContext {
    /// Load the embedder, the persisted knowledge base and the optional LLM
    /// client. Any failure here is fatal for the service.
    pub async fn load(config: Config) -> Result<Self> {
        let embedder = select_embedder(&config.embedding)
            .await
            .context("failed to initialize embedding backend")?;

        let knowledge = KnowledgeBase::load(
            &config.core.chunks_path,
            &config.core.index_path,
            embedder.model_id(),
        )
        .context("failed to load knowledge base")?;

        let llm = connect_llm(&config.llm).await;

        Self::assemble(config, embedder, knowledge, llm).await
    }

    /// Wire already-built parts together after checking that the embedder
    /// produces vectors of the index dimension.
    pub async fn assemble(
        config: Config,
        embedder: Arc<dyn Embedder>,
        knowledge: KnowledgeBase,
        llm: Option<Arc<dyn ModelProvider>>,
    ) -> Result<Self> {
        let probe = embedder
            .embed("проверка размерности")
            .await
            .context("embedding backend failed the startup probe")?;

        let expected = knowledge.index().dim();
        if probe.len() != expected {
            return Err(IndexError::DimensionMismatch {
                expected,
                actual: probe.len(),
            })
            .context("embedding model does not match the persisted index; run `abit build`");
        }

        tracing::info!(
            chunks = knowledge.len(),
            dim = expected,
            llm = llm.is_some(),
            "service context ready"
        );

        Ok(Self {
            config,
            embedder,
            knowledge: Arc::new(knowledge),
            llm,
        })
    }

    pub fn llm_available(&self) -> bool {
        self.llm.is_some()
    }
}
