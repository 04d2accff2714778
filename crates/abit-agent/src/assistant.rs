//! The single entry point for inbound messages.
//!
//! Commands and free text come in, a reply string goes out. Failures never
//! escape: each one is logged and replaced by the message for its kind.

use crate::compose::Composer;
use crate::error::AnswerError;
use crate::messages;
use crate::retriever::Retriever;
use abit_context::ServiceContext;
use abit_core::{DialogState, DialogStep};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{Mutex, MutexGuard};

pub type ChatId = i64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Recommend,
    Cancel,
    Unknown(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound {
    Command(Command),
    Text(String),
}

impl Inbound {
    /// `/name`, `/name@bot` and `/name args` are commands; everything else is text.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Inbound::Text(trimmed.to_string());
        };
        let word = rest.split_whitespace().next().unwrap_or("");
        let name = word.split('@').next().unwrap_or("").to_lowercase();
        let command = match name.as_str() {
            "start" => Command::Start,
            "help" => Command::Help,
            "recommend" => Command::Recommend,
            "cancel" => Command::Cancel,
            _ => Command::Unknown(name),
        };
        Inbound::Command(command)
    }
}

/// A dialog in progress and when the user last moved it forward
struct Session {
    state: DialogState,
    touched: Instant,
}

impl Session {
    fn new(state: DialogState) -> Self {
        Self {
            state,
            touched: Instant::now(),
        }
    }
}

pub struct Assistant {
    ctx: Arc<ServiceContext>,
    retriever: Retriever,
    composer: Composer,
    /// Chats with a recommendation dialog in progress
    sessions: Mutex<HashMap<ChatId, Session>>,
    dialog_ttl: Duration,
}

impl Assistant {
    pub fn new(ctx: Arc<ServiceContext>) -> Self {
        let retriever = Retriever::from_context(&ctx);
        let composer = Composer::from_config(&ctx.config, ctx.llm.clone());
        let dialog_ttl = Duration::from_secs(ctx.config.bot.dialog_ttl_secs);
        Self {
            ctx,
            retriever,
            composer,
            sessions: Mutex::new(HashMap::new()),
            dialog_ttl,
        }
    }

    /// Lock the dialog table after dropping dialogs idle longer than the TTL.
    async fn live_sessions(&self) -> MutexGuard<'_, HashMap<ChatId, Session>> {
        let mut sessions = self.sessions.lock().await;
        let before = sessions.len();
        sessions.retain(|_, session| session.touched.elapsed() < self.dialog_ttl);
        let expired = before - sessions.len();
        if expired > 0 {
            tracing::debug!(expired, "abandoned recommendation dialogs dropped");
        }
        sessions
    }

    pub async fn handle(&self, chat_id: ChatId, inbound: Inbound) -> String {
        match inbound {
            Inbound::Command(Command::Start) => messages::START_MESSAGE.to_string(),
            Inbound::Command(Command::Help) => messages::HELP_MESSAGE.to_string(),
            Inbound::Command(Command::Recommend) => {
                self.live_sessions()
                    .await
                    .insert(chat_id, Session::new(DialogState::start()));
                tracing::debug!(chat_id, "recommendation dialog started");
                messages::RECOMMEND_START_MESSAGE.to_string()
            }
            Inbound::Command(Command::Cancel) => {
                let removed = self.live_sessions().await.remove(&chat_id);
                if removed.is_some() {
                    tracing::debug!(chat_id, "recommendation dialog cancelled");
                    messages::RECOMMEND_CANCEL_MESSAGE.to_string()
                } else {
                    messages::NOTHING_TO_CANCEL_MESSAGE.to_string()
                }
            }
            Inbound::Command(Command::Unknown(name)) => {
                tracing::debug!(chat_id, command = %name, "unknown command");
                messages::UNKNOWN_COMMAND_MESSAGE.to_string()
            }
            Inbound::Text(text) => {
                if let Some(reply) = self.continue_dialog(chat_id, &text).await {
                    return reply;
                }
                self.reply_to_question(chat_id, &text).await
            }
        }
    }

    /// Feed the answer to an active dialog, if there is one for this chat.
    async fn continue_dialog(&self, chat_id: ChatId, answer: &str) -> Option<String> {
        let mut sessions = self.live_sessions().await;
        let session = sessions.remove(&chat_id)?;
        let reply = match session.state.advance(answer) {
            DialogStep::Continue(next) => {
                let prompt = match &next {
                    DialogState::AwaitingInterests { .. } => messages::RECOMMEND_INTERESTS_MESSAGE,
                    DialogState::AwaitingCareer { .. } => messages::RECOMMEND_CAREER_MESSAGE,
                    DialogState::AwaitingBackground => messages::RECOMMEND_START_MESSAGE,
                };
                sessions.insert(chat_id, Session::new(next));
                prompt.to_string()
            }
            DialogStep::Done {
                answers,
                recommendation,
            } => {
                tracing::info!(
                    chat_id,
                    program = recommendation.program.title(),
                    "recommendation given"
                );
                messages::recommend_result(&answers, &recommendation)
            }
        };
        Some(reply)
    }

    async fn reply_to_question(&self, chat_id: ChatId, question: &str) -> String {
        if question.is_empty() {
            return messages::HELP_MESSAGE.to_string();
        }
        tracing::info!(chat_id, question, "question received");
        match self.answer(question).await {
            Ok(answer) => answer,
            Err(err) => {
                match &err {
                    AnswerError::LlmRateLimit(_) | AnswerError::NotReady(_) => {
                        tracing::warn!(chat_id, error = %err, "could not answer")
                    }
                    _ => tracing::error!(chat_id, error = %err, "could not answer"),
                }
                err.user_message().to_string()
            }
        }
    }

    /// Retrieve and compose without converting failures to user text.
    pub async fn answer(&self, question: &str) -> Result<String, AnswerError> {
        let retrieval = &self.ctx.config.retrieval;
        let retrieved = self
            .retriever
            .retrieve(question, retrieval.top_k, retrieval.threshold)
            .await?;
        self.composer.compose(question, &retrieved).await
    }

    pub async fn active_dialogs(&self) -> usize {
        self.live_sessions().await.len()
    }
}
