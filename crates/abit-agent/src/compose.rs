//! Turns retrieved chunks into a reply, either through a fixed template or
//! by grounding an LLM call in them.

use crate::error::AnswerError;
use crate::messages;
use crate::prompts;
use crate::retriever::RetrievedChunk;
use abit_config::{AnswerMode, Config, LlmFallback};
use abit_core::{ChatOptions, Message, ModelProvider};
use std::sync::Arc;

/// Display icon and label per corpus field
const FIELD_LABELS: &[(&str, &str, &str)] = &[
    ("about", "📋", "О программе"),
    ("career", "💼", "Карьера"),
    ("directions", "🎓", "Направления подготовки"),
    ("scholarships", "💰", "Стипендии"),
    ("international", "🌍", "Международные возможности"),
    ("companies", "🏢", "Компании-партнеры"),
];

const FALLBACK_LABEL: (&str, &str) = ("ℹ️", "Информация");

pub fn field_label(field: &str) -> (&'static str, &'static str) {
    FIELD_LABELS
        .iter()
        .find(|(name, _, _)| *name == field)
        .map(|(_, icon, label)| (*icon, *label))
        .unwrap_or(FALLBACK_LABEL)
}

/// Template answer: one block per chunk in retrieval order, or the fixed
/// "nothing found" message.
pub fn compose_extractive(retrieved: &[RetrievedChunk]) -> String {
    if retrieved.is_empty() {
        return messages::NO_KNOWLEDGE_MESSAGE.to_string();
    }

    let blocks: Vec<String> = retrieved
        .iter()
        .map(|r| {
            let (icon, label) = field_label(&r.chunk.field);
            format!(
                "{} {} ({})\n{}\n🔗 {}",
                icon, label, r.chunk.source, r.chunk.text, r.chunk.url
            )
        })
        .collect();

    format!("{}\n\n{}", messages::EXTRACTIVE_HEADER, blocks.join("\n\n"))
}

/// System and user turns for a grounded answer
pub fn grounded_messages(question: &str, retrieved: &[RetrievedChunk]) -> Vec<Message> {
    vec![
        Message::system(prompts::SYSTEM_PROMPT),
        Message::user(prompts::user_prompt(question, retrieved)),
    ]
}

pub struct Composer {
    mode: AnswerMode,
    fallback: LlmFallback,
    llm: Option<Arc<dyn ModelProvider>>,
    options: ChatOptions,
}

impl Composer {
    pub fn new(
        mode: AnswerMode,
        fallback: LlmFallback,
        llm: Option<Arc<dyn ModelProvider>>,
        options: ChatOptions,
    ) -> Self {
        Self {
            mode,
            fallback,
            llm,
            options,
        }
    }

    pub fn from_config(config: &Config, llm: Option<Arc<dyn ModelProvider>>) -> Self {
        Self::new(
            config.answer.mode,
            config.answer.llm_fallback,
            llm,
            ChatOptions {
                temperature: config.llm.temperature,
                max_tokens: config.llm.max_tokens,
            },
        )
    }

    pub async fn compose(
        &self,
        question: &str,
        retrieved: &[RetrievedChunk],
    ) -> Result<String, AnswerError> {
        match (self.mode, &self.llm) {
            (AnswerMode::Extractive, _) => Ok(compose_extractive(retrieved)),
            (AnswerMode::Grounded, Some(llm)) => {
                let messages = grounded_messages(question, retrieved);
                tracing::info!(
                    model = llm.model(),
                    context_chunks = retrieved.len(),
                    "requesting grounded answer"
                );
                let answer = llm.chat(&messages, self.options).await?;
                Ok(answer)
            }
            (AnswerMode::Grounded, None) => match self.fallback {
                LlmFallback::Extractive => Ok(compose_extractive(retrieved)),
                LlmFallback::Notice => Ok(messages::NO_LLM_MESSAGE.to_string()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use abit_core::{Chunk, LlmError};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Records the last request and replies with a canned result
    struct ScriptedProvider {
        reply: fn() -> Result<String, LlmError>,
        seen: Mutex<Option<(Vec<Message>, ChatOptions)>>,
    }

    impl ScriptedProvider {
        fn new(reply: fn() -> Result<String, LlmError>) -> Arc<Self> {
            Arc::new(Self {
                reply,
                seen: Mutex::new(None),
            })
        }
    }

    #[async_trait]
    impl ModelProvider for ScriptedProvider {
        async fn chat(
            &self,
            messages: &[Message],
            options: ChatOptions,
        ) -> Result<String, LlmError> {
            *self.seen.lock().unwrap() = Some((messages.to_vec(), options));
            (self.reply)()
        }

        fn model(&self) -> &str {
            "scripted"
        }
    }

    fn retrieved(field: &str) -> RetrievedChunk {
        RetrievedChunk {
            chunk: Chunk {
                text: "Обучение длится два года.".to_string(),
                source: "Искусственный интеллект".to_string(),
                field: field.to_string(),
                url: "https://abit.itmo.ru/program/master/ai".to_string(),
            },
            distance: 0.2,
        }
    }

    #[test]
    fn test_field_labels() {
        assert_eq!(field_label("career"), ("💼", "Карьера"));
        assert_eq!(field_label("companies"), ("🏢", "Компании-партнеры"));
        assert_eq!(field_label("dormitory"), ("ℹ️", "Информация"));
    }

    #[test]
    fn test_extractive_empty_is_fixed_message() {
        assert_eq!(compose_extractive(&[]), messages::NO_KNOWLEDGE_MESSAGE);
    }

    #[test]
    fn test_extractive_blocks_in_order() {
        let text = compose_extractive(&[retrieved("scholarships"), retrieved("unknown")]);
        let first = text.find("💰 Стипендии").unwrap();
        let second = text.find("ℹ️ Информация").unwrap();
        assert!(first < second);
        assert!(text.contains("🔗 https://abit.itmo.ru/program/master/ai"));
        assert!(text.starts_with(messages::EXTRACTIVE_HEADER));
    }

    #[tokio::test]
    async fn test_grounded_passes_options_and_context() {
        let provider = ScriptedProvider::new(|| Ok("Два года.".to_string()));
        let composer = Composer::new(
            AnswerMode::Grounded,
            LlmFallback::Extractive,
            Some(provider.clone()),
            ChatOptions {
                temperature: 0.2,
                max_tokens: 1000,
            },
        );
        let answer = composer
            .compose("Сколько длится обучение?", &[retrieved("about")])
            .await
            .unwrap();
        assert_eq!(answer, "Два года.");

        let (messages, options) = provider.seen.lock().unwrap().clone().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, "system");
        assert!(messages[1].content.contains("Раздел: about"));
        assert_eq!(options.max_tokens, 1000);
    }

    #[tokio::test]
    async fn test_grounded_without_context_still_asks_llm() {
        let provider = ScriptedProvider::new(|| Ok("Не знаю.".to_string()));
        let composer = Composer::new(
            AnswerMode::Grounded,
            LlmFallback::Extractive,
            Some(provider.clone()),
            ChatOptions::default(),
        );
        composer.compose("Какая погода?", &[]).await.unwrap();
        let (messages, _) = provider.seen.lock().unwrap().clone().unwrap();
        assert!(messages[1].content.contains("не найдена"));
    }

    #[tokio::test]
    async fn test_llm_errors_are_classified() {
        let composer = Composer::new(
            AnswerMode::Grounded,
            LlmFallback::Extractive,
            Some(ScriptedProvider::new(|| {
                Err(LlmError::RateLimit("429".to_string()))
            })),
            ChatOptions::default(),
        );
        let err = composer.compose("q", &[retrieved("about")]).await.unwrap_err();
        assert!(matches!(err, AnswerError::LlmRateLimit(_)));
    }

    #[tokio::test]
    async fn test_fallback_without_llm() {
        let extractive = Composer::new(
            AnswerMode::Grounded,
            LlmFallback::Extractive,
            None,
            ChatOptions::default(),
        );
        let text = extractive.compose("q", &[retrieved("about")]).await.unwrap();
        assert!(text.contains("📋 О программе"));

        let notice = Composer::new(
            AnswerMode::Grounded,
            LlmFallback::Notice,
            None,
            ChatOptions::default(),
        );
        assert_eq!(
            notice.compose("q", &[retrieved("about")]).await.unwrap(),
            messages::NO_LLM_MESSAGE
        );
    }
}
