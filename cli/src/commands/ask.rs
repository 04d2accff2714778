use super::ui;
use abit_agent::Assistant;
use abit_config::Config;
use abit_context::ServiceContext;
use anyhow::Result;
use std::sync::Arc;

pub async fn handle_ask(config: Config, question: &str) -> Result<()> {
    let ctx = Arc::new(ServiceContext::load(config).await?);
    let assistant = Assistant::new(ctx);

    match assistant.answer(question).await {
        Ok(answer) => {
            ui::print_header(question);
            println!("{}", answer);
        }
        Err(err) => {
            tracing::debug!(error = %err, "answer failed");
            ui::print_error(&err.to_string());
            println!("{}", err.user_message());
        }
    }
    Ok(())
}
