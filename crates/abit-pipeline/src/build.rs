//! Offline build: corpus records become chunks, chunks become vectors, and
//! both are persisted together as the knowledge base the service loads.

use crate::corpus::load_corpus;
use abit_config::Config;
use abit_core::{Chunk, Embedder, FieldChunker, ProgramRecord};
use abit_index::{FlatIndex, KnowledgeBase};
use anyhow::{bail, Context, Result};
use indicatif::{ProgressBar, ProgressStyle};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildReport {
    pub programs: usize,
    pub chunks: usize,
    pub dim: usize,
    pub model: String,
}

/// Embed chunk texts `batch_size` at a time, in chunk order.
pub async fn embed_chunks(
    embedder: &dyn Embedder,
    chunks: &[Chunk],
    batch_size: usize,
    progress: &ProgressBar,
) -> Result<Vec<Vec<f32>>> {
    let mut vectors = Vec::with_capacity(chunks.len());

    for (i, batch) in chunks.chunks(batch_size.max(1)).enumerate() {
        let texts: Vec<String> = batch.iter().map(|c| c.text.clone()).collect();
        let embeddings = embedder
            .embed_batch(&texts)
            .await
            .with_context(|| format!("failed to embed batch {}", i))?;
        if embeddings.len() != batch.len() {
            bail!(
                "embedding count mismatch in batch {} (got {}, expected {})",
                i,
                embeddings.len(),
                batch.len()
            );
        }
        vectors.extend(embeddings);
        progress.inc(batch.len() as u64);
    }

    Ok(vectors)
}

/// Chunk and embed `records` into an in-memory knowledge base.
///
/// The index dimension is taken from the embedder's output; an empty corpus
/// still produces a valid, empty index by probing the embedder once.
pub async fn build_knowledge_base(
    records: &[ProgramRecord],
    chunker: &FieldChunker,
    embedder: &dyn Embedder,
    batch_size: usize,
    show_progress: bool,
) -> Result<KnowledgeBase> {
    let chunks = chunker.chunk(records);
    tracing::info!(
        programs = records.len(),
        chunks = chunks.len(),
        "corpus chunked"
    );

    let progress = if show_progress {
        progress_bar(chunks.len())
    } else {
        ProgressBar::hidden()
    };
    progress.set_message("embedding chunks");
    let vectors = embed_chunks(embedder, &chunks, batch_size, &progress).await?;
    progress.finish_with_message("embeddings ready");

    let dim = match vectors.first() {
        Some(v) => v.len(),
        None => embedder
            .embed("проверка размерности")
            .await
            .context("failed to probe embedding dimension")?
            .len(),
    };

    let index = FlatIndex::build(embedder.model_id(), dim, &vectors)
        .context("embedder returned vectors of inconsistent dimension")?;
    Ok(KnowledgeBase::new(chunks, index)?)
}

/// Full `build` command: load the corpus from `core.corpus_path` and write
/// the chunks and index to their configured paths.
pub async fn run_build(
    config: &Config,
    embedder: &dyn Embedder,
    show_progress: bool,
) -> Result<BuildReport> {
    let records = load_corpus(&config.core.corpus_path)?;
    let chunker = FieldChunker::with_config(config.chunking.clone());

    let knowledge = build_knowledge_base(
        &records,
        &chunker,
        embedder,
        config.embedding.batch_size,
        show_progress,
    )
    .await?;

    for path in [&config.core.chunks_path, &config.core.index_path] {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    knowledge
        .persist(&config.core.chunks_path, &config.core.index_path)
        .context("failed to persist knowledge base")?;

    let report = BuildReport {
        programs: records.len(),
        chunks: knowledge.len(),
        dim: knowledge.index().dim(),
        model: knowledge.index().model().to_string(),
    };
    tracing::info!(
        chunks = report.chunks,
        dim = report.dim,
        model = %report.model,
        chunks_path = %config.core.chunks_path.display(),
        index_path = %config.core.index_path.display(),
        "knowledge base written"
    );
    Ok(report)
}

fn progress_bar(len: usize) -> ProgressBar {
    let pb = ProgressBar::new(len as u64);
    let style = ProgressStyle::default_bar()
        .template("[{elapsed_precise}] {bar:30.cyan/blue} {pos}/{len} {msg}")
        .map(|s| s.progress_chars("=>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}
