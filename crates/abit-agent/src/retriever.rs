use crate::error::AnswerError;
use abit_context::ServiceContext;
use abit_core::{Chunk, Embedder};
use abit_index::KnowledgeBase;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq)]
pub struct RetrievedChunk {
    pub chunk: Chunk,
    /// Squared L2 distance to the question, smaller is closer
    pub distance: f32,
}

pub struct Retriever {
    embedder: Arc<dyn Embedder>,
    knowledge: Arc<KnowledgeBase>,
}

impl Retriever {
    pub fn new(embedder: Arc<dyn Embedder>, knowledge: Arc<KnowledgeBase>) -> Self {
        Self {
            embedder,
            knowledge,
        }
    }

    pub fn from_context(ctx: &ServiceContext) -> Self {
        Self::new(Arc::clone(&ctx.embedder), Arc::clone(&ctx.knowledge))
    }

    /// Up to `k` chunks within `threshold` of the question, closest first.
    ///
    /// An empty result means nothing relevant is known; it is not an error.
    pub async fn retrieve(
        &self,
        question: &str,
        k: usize,
        threshold: f32,
    ) -> Result<Vec<RetrievedChunk>, AnswerError> {
        let query = self
            .embedder
            .embed(question)
            .await
            .map_err(|e| AnswerError::NotReady(format!("{:#}", e)))?;

        let hits = self
            .knowledge
            .search(&query, k)
            .map_err(|e| AnswerError::Unexpected(e.to_string()))?;

        let best = hits.first().map(|(_, d)| *d);
        let retrieved: Vec<RetrievedChunk> = hits
            .into_iter()
            .filter(|(_, distance)| *distance <= threshold)
            .map(|(chunk, distance)| RetrievedChunk {
                chunk: chunk.clone(),
                distance,
            })
            .collect();

        tracing::debug!(
            k,
            threshold,
            best_distance = ?best,
            kept = retrieved.len(),
            "retrieval finished"
        );
        Ok(retrieved)
    }
}
