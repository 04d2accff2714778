use abit_agent::messages;
use abit_agent::Assistant;
use abit_bot::{Dispatcher, Outbox};
use abit_config::Config;
use abit_context::ServiceContext;
use abit_core::{ChatOptions, Chunk, Embedder, LlmError, Message, ModelProvider};
use abit_index::{FlatIndex, KnowledgeBase};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct ConstantEmbedder;

#[async_trait]
impl Embedder for ConstantEmbedder {
    async fn embed(&self, _: &str) -> anyhow::Result<Vec<f32>> {
        Ok(vec![1.0, 0.0])
    }

    async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|_| vec![1.0, 0.0]).collect())
    }

    fn model_id(&self) -> &str {
        "constant"
    }
}

/// Answers the startup dimension check at once and stalls on everything else.
struct StallingEmbedder;

const DIMENSION_CHECK: &str = "проверка размерности";

#[async_trait]
impl Embedder for StallingEmbedder {
    async fn embed(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        if text != DIMENSION_CHECK {
            tokio::time::sleep(Duration::from_secs(3600)).await;
        }
        Ok(vec![1.0, 0.0])
    }

    async fn embed_batch(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }

    fn model_id(&self) -> &str {
        "stalling"
    }
}

/// A model that answers with whitespace only
struct BlankProvider;

#[async_trait]
impl ModelProvider for BlankProvider {
    async fn chat(&self, _: &[Message], _: ChatOptions) -> Result<String, LlmError> {
        Ok("  \n".to_string())
    }

    fn model(&self) -> &str {
        "blank"
    }
}

#[derive(Default)]
struct RecordingOutbox {
    sent: Mutex<Vec<(i64, String)>>,
}

#[async_trait]
impl Outbox for RecordingOutbox {
    async fn send_message(&self, chat_id: i64, text: &str) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push((chat_id, text.to_string()));
        Ok(())
    }
}

impl RecordingOutbox {
    async fn wait_for(&self, count: usize) -> Vec<(i64, String)> {
        for _ in 0..200 {
            {
                let sent = self.sent.lock().unwrap();
                if sent.len() >= count {
                    return sent.clone();
                }
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("expected {} replies", count);
    }

    async fn wait_for_chat(&self, chat_id: i64) -> Vec<String> {
        for _ in 0..200 {
            let texts: Vec<String> = {
                let sent = self.sent.lock().unwrap();
                sent.iter()
                    .filter(|(id, _)| *id == chat_id)
                    .map(|(_, text)| text.clone())
                    .collect()
            };
            if !texts.is_empty() {
                return texts;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        panic!("no reply for chat {}", chat_id);
    }
}

async fn assistant() -> Arc<Assistant> {
    let index = FlatIndex::new("constant", 2).unwrap();
    let knowledge = KnowledgeBase::new(Vec::new(), index).unwrap();
    let ctx = ServiceContext::assemble(Config::default(), Arc::new(ConstantEmbedder), knowledge, None)
        .await
        .unwrap();
    Arc::new(Assistant::new(Arc::new(ctx)))
}

fn fee_chunk() -> Chunk {
    Chunk {
        text: "Стоимость обучения 599 000 рублей в год.".to_string(),
        source: "Искусственный интеллект".to_string(),
        field: "about".to_string(),
        url: "https://abit.itmo.ru/program/master/ai".to_string(),
    }
}

async fn blank_llm_assistant() -> Arc<Assistant> {
    let index = FlatIndex::build("constant", 2, &[vec![1.0, 0.0]]).unwrap();
    let knowledge = KnowledgeBase::new(vec![fee_chunk()], index).unwrap();
    let llm: Arc<dyn ModelProvider> = Arc::new(BlankProvider);
    let ctx = ServiceContext::assemble(Config::default(), Arc::new(ConstantEmbedder), knowledge, Some(llm))
        .await
        .unwrap();
    Arc::new(Assistant::new(Arc::new(ctx)))
}

async fn stalling_assistant() -> Arc<Assistant> {
    let index = FlatIndex::build("stalling", 2, &[vec![1.0, 0.0]]).unwrap();
    let knowledge = KnowledgeBase::new(vec![fee_chunk()], index).unwrap();
    let ctx = ServiceContext::assemble(Config::default(), Arc::new(StallingEmbedder), knowledge, None)
        .await
        .unwrap();
    Arc::new(Assistant::new(Arc::new(ctx)))
}

#[tokio::test]
async fn replies_keep_per_chat_order() {
    let outbox = Arc::new(RecordingOutbox::default());
    let mut dispatcher = Dispatcher::new(assistant().await, outbox.clone(), Duration::from_secs(60));

    dispatcher.dispatch(1, "/start".to_string());
    dispatcher.dispatch(2, "/help".to_string());
    dispatcher.dispatch(1, "/recommend".to_string());
    dispatcher.dispatch(1, "экономика".to_string());

    let sent = outbox.wait_for(4).await;
    let chat_one: Vec<&str> = sent
        .iter()
        .filter(|(id, _)| *id == 1)
        .map(|(_, text)| text.as_str())
        .collect();
    assert_eq!(
        chat_one,
        vec![
            messages::START_MESSAGE,
            messages::RECOMMEND_START_MESSAGE,
            messages::RECOMMEND_INTERESTS_MESSAGE,
        ]
    );
    assert!(sent.contains(&(2, messages::HELP_MESSAGE.to_string())));
    assert_eq!(dispatcher.active_workers(), 2);
}

#[tokio::test]
async fn idle_worker_is_replaced() {
    let outbox = Arc::new(RecordingOutbox::default());
    let mut dispatcher =
        Dispatcher::new(assistant().await, outbox.clone(), Duration::from_millis(50));

    dispatcher.dispatch(7, "/start".to_string());
    outbox.wait_for(1).await;
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(dispatcher.active_workers(), 0);

    dispatcher.dispatch(7, "/help".to_string());
    let sent = outbox.wait_for(2).await;
    assert_eq!(sent[1], (7, messages::HELP_MESSAGE.to_string()));
}

#[tokio::test]
async fn flooded_chat_does_not_block_other_chats() {
    let outbox = Arc::new(RecordingOutbox::default());
    let mut dispatcher =
        Dispatcher::new(stalling_assistant().await, outbox.clone(), Duration::from_secs(60));

    // chat 1 is stuck on its first question, so its queue overflows
    for i in 0..50 {
        dispatcher.dispatch(1, format!("Сколько стоит обучение? {}", i));
    }
    dispatcher.dispatch(2, "/start".to_string());

    let chat_two = tokio::time::timeout(Duration::from_secs(2), outbox.wait_for_chat(2))
        .await
        .expect("chat 2 was starved by chat 1");
    assert_eq!(chat_two, vec![messages::START_MESSAGE.to_string()]);

    let chat_one = outbox.wait_for_chat(1).await;
    assert!(chat_one.iter().all(|text| text == messages::BUSY_MESSAGE));
    assert_eq!(dispatcher.active_workers(), 2);
}

#[tokio::test]
async fn blank_answer_is_replaced_with_apology() {
    let outbox = Arc::new(RecordingOutbox::default());
    let mut dispatcher =
        Dispatcher::new(blank_llm_assistant().await, outbox.clone(), Duration::from_secs(60));

    dispatcher.dispatch(3, "Сколько стоит обучение?".to_string());
    dispatcher.dispatch(3, "/help".to_string());

    let sent = outbox.wait_for(2).await;
    assert_eq!(
        sent,
        vec![
            (3, messages::UNEXPECTED_ERROR_MESSAGE.to_string()),
            (3, messages::HELP_MESSAGE.to_string()),
        ]
    );
}
