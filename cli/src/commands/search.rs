use super::ui;
use abit_config::Config;
use abit_context::ServiceContext;
use anyhow::{Context, Result};

/// Raw nearest neighbors, including those beyond the relevance threshold
pub async fn handle_search(config: Config, query: &str, top: usize) -> Result<()> {
    let ctx = ServiceContext::load(config).await?;
    let threshold = ctx.config.retrieval.threshold;

    let vector = ctx
        .embedder
        .embed(query)
        .await
        .context("failed to embed query")?;
    let hits = ctx.knowledge.search(&vector, top)?;

    ui::print_header(&format!("{} (threshold {})", query, threshold));
    if hits.is_empty() {
        println!("Knowledge base is empty.");
        return Ok(());
    }
    for (rank, (chunk, distance)) in hits.into_iter().enumerate() {
        ui::print_hit(
            rank + 1,
            &chunk.source,
            &chunk.field,
            distance,
            distance <= threshold,
            &chunk.text,
        );
    }
    Ok(())
}
