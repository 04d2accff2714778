//! Environment variable configuration overlay
//!
//! Supports environment variables in the format `ABIT_<section>_<field>=value`:
//! - `ABIT_RETRIEVAL_TOP_K=5`
//! - `ABIT_ANSWER_MODE=extractive`
//! - `ABIT_EMBEDDING_BACKEND=ollama`

use crate::{error::ConfigError, types::*, Config, Result};
use std::env;
use std::path::PathBuf;
use std::str::FromStr;

const PREFIX: &str = "ABIT_";

/// Parse configuration from environment variables
///
/// Returns `None` when no `ABIT_` variable is set. Variables that fail to
/// parse are reported on stderr and skipped, except for invalid enum values
/// which are returned as errors so typos do not go unnoticed.
pub fn from_env() -> Result<Option<Config>> {
    if !env::vars().any(|(k, _)| k.starts_with(PREFIX)) {
        return Ok(None);
    }

    let mut config = Config::default();
    apply_env(&mut config)?;
    Ok(Some(config))
}

/// Write every `ABIT_` variable onto `config` in place.
///
/// Unlike a merged layer, a variable always wins, even when its value equals
/// the built-in default.
pub fn apply_env(config: &mut Config) -> Result<()> {
    let mut env_vars: Vec<(String, String)> = env::vars()
        .filter(|(k, _)| k.starts_with(PREFIX))
        .collect();
    env_vars.sort();

    for (key, value) in env_vars {
        match apply_env_var(config, &key, &value) {
            Ok(()) => {}
            Err(e @ ConfigError::InvalidEnum { .. }) => return Err(e),
            Err(e) => eprintln!("Warning: ignoring {}: {}", key, e),
        }
    }
    Ok(())
}

fn apply_env_var(config: &mut Config, key: &str, value: &str) -> Result<()> {
    let key = key.strip_prefix(PREFIX).unwrap_or(key);

    let Some((section, field)) = key.split_once('_') else {
        return Err(ConfigError::EnvVarError {
            var: format!("{PREFIX}{key}"),
            message: "Expected format: ABIT_<section>_<field>".to_string(),
        });
    };

    let section = section.to_lowercase();
    let field = field.to_lowercase();
    let var = format!("{PREFIX}{}", key.to_uppercase());
    let value = value.trim();

    match section.as_str() {
        "core" => apply_core_var(&mut config.core, &field, value, &var),
        "chunking" => apply_chunking_var(&mut config.chunking, &field, value, &var),
        "embedding" => apply_embedding_var(&mut config.embedding, &field, value, &var),
        "retrieval" => apply_retrieval_var(&mut config.retrieval, &field, value, &var),
        "answer" => apply_answer_var(&mut config.answer, &field, value, &var),
        "llm" => apply_llm_var(&mut config.llm, &field, value, &var),
        "bot" => apply_bot_var(&mut config.bot, &field, value, &var),
        _ => Err(ConfigError::EnvVarError {
            var,
            message: format!("Unknown section: {}", section),
        }),
    }
}

fn parse_num<T: FromStr>(var: &str, value: &str) -> Result<T> {
    value.parse().map_err(|_| ConfigError::EnvVarError {
        var: var.to_string(),
        message: format!("Invalid number: {}", value),
    })
}

fn unknown_field(var: &str, field: &str) -> ConfigError {
    ConfigError::EnvVarError {
        var: var.to_string(),
        message: format!("Unknown field: {}", field),
    }
}

fn apply_core_var(config: &mut CoreConfig, field: &str, value: &str, var: &str) -> Result<()> {
    match field {
        "corpus_path" => config.corpus_path = PathBuf::from(value),
        "chunks_path" => config.chunks_path = PathBuf::from(value),
        "index_path" => config.index_path = PathBuf::from(value),
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_chunking_var(
    config: &mut ChunkingConfig,
    field: &str,
    value: &str,
    var: &str,
) -> Result<()> {
    match field {
        "max_chars" => config.max_chars = parse_num(var, value)?,
        "min_field_chars" => config.min_field_chars = parse_num(var, value)?,
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_embedding_var(
    config: &mut EmbeddingConfig,
    field: &str,
    value: &str,
    var: &str,
) -> Result<()> {
    match field {
        "backend" => {
            config.backend = EmbeddingBackend::parse(value).ok_or_else(|| {
                ConfigError::invalid_enum("embedding.backend", value, &EmbeddingBackend::NAMES)
            })?;
        }
        "model_name" => config.model_name = value.to_string(),
        "batch_size" => config.batch_size = parse_num(var, value)?,
        "base_url" => config.base_url = Some(value.to_string()),
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_retrieval_var(
    config: &mut RetrievalConfig,
    field: &str,
    value: &str,
    var: &str,
) -> Result<()> {
    match field {
        "top_k" => config.top_k = parse_num(var, value)?,
        "threshold" => config.threshold = parse_num(var, value)?,
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_answer_var(config: &mut AnswerConfig, field: &str, value: &str, var: &str) -> Result<()> {
    match field {
        "mode" => {
            config.mode = AnswerMode::parse(value).ok_or_else(|| {
                ConfigError::invalid_enum("answer.mode", value, &AnswerMode::NAMES)
            })?;
        }
        "llm_fallback" => {
            config.llm_fallback = LlmFallback::parse(value).ok_or_else(|| {
                ConfigError::invalid_enum("answer.llm_fallback", value, &LlmFallback::NAMES)
            })?;
        }
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_llm_var(config: &mut LlmConfig, field: &str, value: &str, var: &str) -> Result<()> {
    match field {
        "model" => config.model = value.to_string(),
        "max_tokens" => config.max_tokens = parse_num(var, value)?,
        "temperature" => config.temperature = parse_num(var, value)?,
        "api_base" => config.api_base = Some(value.to_string()),
        "timeout_secs" => config.timeout_secs = parse_num(var, value)?,
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}

fn apply_bot_var(config: &mut BotConfig, field: &str, value: &str, var: &str) -> Result<()> {
    match field {
        "api_base" => config.api_base = value.to_string(),
        "poll_timeout_secs" => config.poll_timeout_secs = parse_num(var, value)?,
        "retry_backoff_secs" => config.retry_backoff_secs = parse_num(var, value)?,
        "idle_worker_secs" => config.idle_worker_secs = parse_num(var, value)?,
        "dialog_ttl_secs" => config.dialog_ttl_secs = parse_num(var, value)?,
        _ => return Err(unknown_field(var, field)),
    }
    Ok(())
}
