use abit_config::Config;
use abit_context::ServiceContext;
use abit_core::{Chunk, Embedder};
use abit_index::{FlatIndex, KnowledgeBase};
use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

struct FixedEmbedder {
    dim: usize,
}

#[async_trait]
impl Embedder for FixedEmbedder {
    async fn embed(&self, _text: &str) -> Result<Vec<f32>> {
        Ok(vec![0.5; self.dim])
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![0.5; self.dim]).collect())
    }

    fn model_id(&self) -> &str {
        "fixed"
    }
}

fn knowledge(dim: usize) -> KnowledgeBase {
    let chunk = Chunk {
        text: "Программа длится два года.".to_string(),
        source: "Искусственный интеллект".to_string(),
        field: "about".to_string(),
        url: "https://abit.itmo.ru/program/master/ai".to_string(),
    };
    let index = FlatIndex::build("fixed", dim, &[vec![0.0; dim]]).unwrap();
    KnowledgeBase::new(vec![chunk], index).unwrap()
}

#[tokio::test]
async fn assemble_accepts_matching_dimension() -> Result<()> {
    let ctx = ServiceContext::assemble(
        Config::default(),
        Arc::new(FixedEmbedder { dim: 4 }),
        knowledge(4),
        None,
    )
    .await?;
    assert_eq!(ctx.knowledge.len(), 1);
    assert!(!ctx.llm_available());
    Ok(())
}

#[tokio::test]
async fn assemble_rejects_dimension_mismatch() {
    let result = ServiceContext::assemble(
        Config::default(),
        Arc::new(FixedEmbedder { dim: 3 }),
        knowledge(4),
        None,
    )
    .await;
    let err = result.err().expect("dimension mismatch must fail");
    assert!(format!("{:#}", err).contains("dimension mismatch"));
}

#[tokio::test]
async fn load_fails_without_knowledge_base() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.embedding.backend = abit_config::EmbeddingBackend::Ollama;
    config.embedding.base_url = Some("http://127.0.0.1:9".to_string());
    config.core.chunks_path = dir.path().join("chunks.json");
    config.core.index_path = dir.path().join("index.bin");

    let err = ServiceContext::load(config).await.err().expect("must fail");
    assert!(format!("{:#}", err).contains("not found"));
}
