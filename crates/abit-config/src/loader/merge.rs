//! Configuration merging logic
//!
//! A field from `overlay` replaces the one in `base` only when it differs
//! from the default, so a partial file does not reset values set earlier.

use crate::{types::*, Config};

/// Merge two configurations, with `overlay` taking precedence
pub fn merge(mut base: Config, overlay: Config) -> Config {
    base.core = merge_core(base.core, overlay.core);
    base.chunking = merge_chunking(base.chunking, overlay.chunking);
    base.embedding = merge_embedding(base.embedding, overlay.embedding);
    base.retrieval = merge_retrieval(base.retrieval, overlay.retrieval);
    base.answer = merge_answer(base.answer, overlay.answer);
    base.llm = merge_llm(base.llm, overlay.llm);
    base.bot = merge_bot(base.bot, overlay.bot);
    base
}

fn pick<T: PartialEq>(base: T, overlay: T, default: &T) -> T {
    if overlay != *default {
        overlay
    } else {
        base
    }
}

fn pick_f32(base: f32, overlay: f32, default: f32) -> f32 {
    if (overlay - default).abs() > f32::EPSILON {
        overlay
    } else {
        base
    }
}

fn merge_core(base: CoreConfig, overlay: CoreConfig) -> CoreConfig {
    let default = CoreConfig::default();
    CoreConfig {
        corpus_path: pick(base.corpus_path, overlay.corpus_path, &default.corpus_path),
        chunks_path: pick(base.chunks_path, overlay.chunks_path, &default.chunks_path),
        index_path: pick(base.index_path, overlay.index_path, &default.index_path),
    }
}

fn merge_chunking(base: ChunkingConfig, overlay: ChunkingConfig) -> ChunkingConfig {
    let default = ChunkingConfig::default();
    ChunkingConfig {
        max_chars: pick(base.max_chars, overlay.max_chars, &default.max_chars),
        min_field_chars: pick(
            base.min_field_chars,
            overlay.min_field_chars,
            &default.min_field_chars,
        ),
        sentence_delimiter: pick(
            base.sentence_delimiter,
            overlay.sentence_delimiter,
            &default.sentence_delimiter,
        ),
    }
}

fn merge_embedding(base: EmbeddingConfig, overlay: EmbeddingConfig) -> EmbeddingConfig {
    let default = EmbeddingConfig::default();
    EmbeddingConfig {
        backend: pick(base.backend, overlay.backend, &default.backend),
        model_name: pick(base.model_name, overlay.model_name, &default.model_name),
        batch_size: pick(base.batch_size, overlay.batch_size, &default.batch_size),
        base_url: overlay.base_url.or(base.base_url),
    }
}

fn merge_retrieval(base: RetrievalConfig, overlay: RetrievalConfig) -> RetrievalConfig {
    let default = RetrievalConfig::default();
    RetrievalConfig {
        top_k: pick(base.top_k, overlay.top_k, &default.top_k),
        threshold: pick_f32(base.threshold, overlay.threshold, default.threshold),
    }
}

fn merge_answer(base: AnswerConfig, overlay: AnswerConfig) -> AnswerConfig {
    let default = AnswerConfig::default();
    AnswerConfig {
        mode: pick(base.mode, overlay.mode, &default.mode),
        llm_fallback: pick(base.llm_fallback, overlay.llm_fallback, &default.llm_fallback),
    }
}

fn merge_llm(base: LlmConfig, overlay: LlmConfig) -> LlmConfig {
    let default = LlmConfig::default();
    LlmConfig {
        model: pick(base.model, overlay.model, &default.model),
        max_tokens: pick(base.max_tokens, overlay.max_tokens, &default.max_tokens),
        temperature: pick_f32(base.temperature, overlay.temperature, default.temperature),
        api_base: overlay.api_base.or(base.api_base),
        timeout_secs: pick(base.timeout_secs, overlay.timeout_secs, &default.timeout_secs),
    }
}

fn merge_bot(base: BotConfig, overlay: BotConfig) -> BotConfig {
    let default = BotConfig::default();
    BotConfig {
        api_base: pick(base.api_base, overlay.api_base, &default.api_base),
        poll_timeout_secs: pick(
            base.poll_timeout_secs,
            overlay.poll_timeout_secs,
            &default.poll_timeout_secs,
        ),
        retry_backoff_secs: pick(
            base.retry_backoff_secs,
            overlay.retry_backoff_secs,
            &default.retry_backoff_secs,
        ),
        idle_worker_secs: pick(
            base.idle_worker_secs,
            overlay.idle_worker_secs,
            &default.idle_worker_secs,
        ),
        dialog_ttl_secs: pick(
            base.dialog_ttl_secs,
            overlay.dialog_ttl_secs,
            &default.dialog_ttl_secs,
        ),
    }
}
