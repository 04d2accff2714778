use abit_agent::Assistant;
use abit_bot::TelegramApi;
use abit_config::Config;
use abit_context::ServiceContext;
use anyhow::{Context, Result};
use std::sync::Arc;

pub async fn handle_serve(config: Config) -> Result<()> {
    let api = Arc::new(TelegramApi::from_env(&config.bot)?);
    let bot_config = config.bot.clone();

    let ctx = ServiceContext::load(config)
        .await
        .context("service is not ready; run `abit build` first")?;
    if !ctx.llm_available() {
        tracing::warn!("no usable LLM client, grounded answers fall back per answer.llm_fallback");
    }
    let assistant = Arc::new(Assistant::new(Arc::new(ctx)));

    let username = api
        .get_me()
        .await
        .context("Telegram rejected the bot token")?;
    tracing::info!(bot = %username, "connected to Telegram");

    abit_bot::serve(assistant, api, &bot_config).await
}
