use super::ui;
use abit_config::Config;
use abit_context::select_embedder;
use abit_pipeline::run_build;
use anyhow::{Context, Result};

pub async fn handle_build(config: &Config, show_progress: bool) -> Result<()> {
    ui::print_header("Building knowledge base");
    ui::print_key_value("Corpus", &config.core.corpus_path.display().to_string());
    ui::print_key_value("Embedding model", &config.embedding.model_name);

    let embedder = select_embedder(&config.embedding)
        .await
        .context("failed to initialize embedding backend")?;
    let report = run_build(config, embedder.as_ref(), show_progress).await?;

    ui::print_success(&format!(
        "{} chunks from {} programs, dimension {}",
        report.chunks, report.programs, report.dim
    ));
    ui::print_key_value("Chunks", &config.core.chunks_path.display().to_string());
    ui::print_key_value("Index", &config.core.index_path.display().to_string());
    Ok(())
}
