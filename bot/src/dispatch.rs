//! Per-chat workers.
//!
//! Each chat has at most one worker task fed through an mpsc queue, so one
//! user's messages are answered in arrival order. Workers exit after an idle
//! period and are respawned on the next message.

use crate::api::Outbox;
use crate::split::{split_message, MESSAGE_LIMIT};
use abit_agent::{messages, Assistant, Inbound};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::sync::mpsc::error::TrySendError;

const QUEUE_CAPACITY: usize = 32;

pub struct Dispatcher {
    assistant: Arc<Assistant>,
    outbox: Arc<dyn Outbox>,
    idle: Duration,
    workers: HashMap<i64, mpsc::Sender<String>>,
}

impl Dispatcher {
    pub fn new(assistant: Arc<Assistant>, outbox: Arc<dyn Outbox>, idle: Duration) -> Self {
        Self {
            assistant,
            outbox,
            idle,
            workers: HashMap::new(),
        }
    }

    /// Queue `text` for the chat's worker, starting one if needed.
    ///
    /// Never waits: when the chat's queue is full the message is dropped and
    /// the user is told to retry, so one busy chat cannot stall the poll loop.
    pub fn dispatch(&mut self, chat_id: i64, text: String) {
        self.workers.retain(|_, tx| !tx.is_closed());

        let text = match self.workers.get(&chat_id) {
            Some(tx) => match tx.try_send(text) {
                Ok(()) => return,
                Err(TrySendError::Full(_)) => {
                    tracing::warn!(chat_id, "chat queue is full, dropping message");
                    self.notify_busy(chat_id);
                    return;
                }
                // worker went idle between the check and the send
                Err(TrySendError::Closed(text)) => text,
            },
            None => text,
        };

        let tx = self.spawn_worker(chat_id);
        if tx.try_send(text).is_err() {
            tracing::error!(chat_id, "fresh chat worker refused its first message");
        }
        self.workers.insert(chat_id, tx);
    }

    pub fn active_workers(&self) -> usize {
        self.workers.values().filter(|tx| !tx.is_closed()).count()
    }

    fn notify_busy(&self, chat_id: i64) {
        let outbox = Arc::clone(&self.outbox);
        tokio::spawn(async move {
            if let Err(err) = outbox.send_message(chat_id, messages::BUSY_MESSAGE).await {
                tracing::error!(chat_id, error = %format!("{:#}", err), "failed to send busy notice");
            }
        });
    }

    fn spawn_worker(&self, chat_id: i64) -> mpsc::Sender<String> {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        tokio::spawn(run_worker(
            chat_id,
            rx,
            Arc::clone(&self.assistant),
            Arc::clone(&self.outbox),
            self.idle,
        ));
        tracing::debug!(chat_id, "chat worker started");
        tx
    }
}

async fn run_worker(
    chat_id: i64,
    mut rx: mpsc::Receiver<String>,
    assistant: Arc<Assistant>,
    outbox: Arc<dyn Outbox>,
    idle: Duration,
) {
    loop {
        match tokio::time::timeout(idle, rx.recv()).await {
            Ok(Some(text)) => reply(chat_id, &text, &assistant, outbox.as_ref()).await,
            Ok(None) => break,
            Err(_) => {
                // refuse new messages, then finish what was already queued
                rx.close();
                while let Ok(text) = rx.try_recv() {
                    reply(chat_id, &text, &assistant, outbox.as_ref()).await;
                }
                break;
            }
        }
    }
    tracing::debug!(chat_id, "chat worker stopped");
}

async fn reply(chat_id: i64, text: &str, assistant: &Assistant, outbox: &dyn Outbox) {
    let answer = assistant.handle(chat_id, Inbound::parse(text)).await;
    let mut parts = split_message(&answer, MESSAGE_LIMIT);
    if parts.is_empty() {
        // Telegram rejects empty messages
        tracing::warn!(chat_id, "empty reply replaced with an apology");
        parts.push(messages::UNEXPECTED_ERROR_MESSAGE.to_string());
    }
    for part in parts {
        if let Err(err) = outbox.send_message(chat_id, &part).await {
            tracing::error!(chat_id, error = %format!("{:#}", err), "failed to send reply");
            return;
        }
    }
}
