//! Telegram Bot API transport for the admissions assistant.
//!
//! Updates arrive by long polling. Each chat is served by its own worker task
//! so replies within a chat stay in order while different chats proceed
//! concurrently.

pub mod api;
pub mod dispatch;
pub mod split;

pub use api::{Outbox, TelegramApi, Update};
pub use dispatch::Dispatcher;
pub use split::{split_message, MESSAGE_LIMIT};

use abit_agent::Assistant;
use abit_config::BotConfig;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;

/// Poll until Ctrl-C. Poll failures are logged and retried after the
/// configured backoff.
pub async fn serve(assistant: Arc<Assistant>, api: Arc<TelegramApi>, config: &BotConfig) -> Result<()> {
    let mut dispatcher = Dispatcher::new(
        assistant,
        api.clone(),
        Duration::from_secs(config.idle_worker_secs),
    );
    let backoff = Duration::from_secs(config.retry_backoff_secs);
    let mut offset: Option<i64> = None;

    tracing::info!("bot is polling for updates");
    loop {
        let poll = tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("shutdown requested");
                return Ok(());
            }
            poll = api.get_updates(offset, config.poll_timeout_secs) => poll,
        };

        let updates = match poll {
            Ok(updates) => updates,
            Err(err) => {
                tracing::warn!(error = %format!("{:#}", err), "getUpdates failed, backing off");
                tokio::time::sleep(backoff).await;
                continue;
            }
        };

        for update in updates {
            offset = Some(update.update_id + 1);
            if let Some((chat_id, text)) = update.into_text() {
                dispatcher.dispatch(chat_id, text);
            }
        }
    }
}
