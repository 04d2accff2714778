use super::ui;
use abit_config::Config;
use abit_index::chunk_store::load_chunks;
use abit_index::FlatIndex;
use anyhow::Result;

fn env_present(name: &str) -> bool {
    std::env::var(name)
        .map(|v| !v.trim().is_empty())
        .unwrap_or(false)
}

pub fn handle_status(config: &Config) -> Result<()> {
    let core = &config.core;

    ui::print_header("Files");
    ui::print_key_value(
        &core.corpus_path.display().to_string(),
        ui::presence(core.corpus_path.exists()),
    );
    ui::print_key_value(
        &core.chunks_path.display().to_string(),
        ui::presence(core.chunks_path.exists()),
    );
    ui::print_key_value(
        &core.index_path.display().to_string(),
        ui::presence(core.index_path.exists()),
    );

    ui::print_header("Knowledge base");
    match (load_chunks(&core.chunks_path), FlatIndex::load(&core.index_path)) {
        (Ok(chunks), Ok(index)) => {
            ui::print_key_value("Chunks", &chunks.len().to_string());
            ui::print_key_value("Vectors", &index.len().to_string());
            ui::print_key_value("Dimension", &index.dim().to_string());
            ui::print_key_value("Built with", index.model());
            if index.model() != config.embedding.model_name {
                ui::print_error(&format!(
                    "index was built with {}, configured model is {}; run `abit build`",
                    index.model(),
                    config.embedding.model_name
                ));
            }
            if chunks.len() != index.len() {
                ui::print_error("chunk and vector counts differ; run `abit build`");
            }
        }
        (Err(err), _) | (_, Err(err)) => ui::print_error(&err.to_string()),
    }

    ui::print_header("Answering");
    ui::print_key_value("Mode", &format!("{:?}", config.answer.mode));
    ui::print_key_value("Fallback", &format!("{:?}", config.answer.llm_fallback));
    ui::print_key_value(
        "top_k / threshold",
        &format!("{} / {}", config.retrieval.top_k, config.retrieval.threshold),
    );
    ui::print_key_value("LLM model", &config.llm.model);
    ui::print_key_value("OPENAI_API_KEY", ui::presence(env_present("OPENAI_API_KEY")));
    ui::print_key_value(
        "TELEGRAM_BOT_TOKEN",
        ui::presence(env_present("TELEGRAM_BOT_TOKEN")),
    );
    Ok(())
}
