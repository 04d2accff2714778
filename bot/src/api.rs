use abit_config::BotConfig;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Where replies go. Implemented by the HTTP client and by test doubles.
#[async_trait]
pub trait Outbox: Send + Sync {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()>;
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
}

impl Update {
    /// Chat id and text of a text message; other update kinds yield `None`.
    pub fn into_text(self) -> Option<(i64, String)> {
        let message = self.message?;
        let text = message.text?;
        Some((message.chat.id, text))
    }
}

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    error_code: Option<u16>,
}

pub struct TelegramApi {
    client: Client,
    base: String,
}

impl TelegramApi {
    pub fn new(config: &BotConfig, token: &str) -> Result<Self> {
        // the HTTP timeout has to outlast the long-poll timeout
        let client = Client::builder()
            .timeout(Duration::from_secs(config.poll_timeout_secs + 10))
            .build()
            .context("failed to build Telegram HTTP client")?;
        Ok(Self {
            client,
            base: format!("{}/bot{}", config.api_base.trim_end_matches('/'), token),
        })
    }

    /// Token from `TELEGRAM_BOT_TOKEN`
    pub fn from_env(config: &BotConfig) -> Result<Self> {
        let token = std::env::var("TELEGRAM_BOT_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty())
            .ok_or_else(|| anyhow!("TELEGRAM_BOT_TOKEN is not set"))?;
        Self::new(config, token.trim())
    }

    async fn call<T: DeserializeOwned>(&self, method: &str, body: serde_json::Value) -> Result<T> {
        let response = self
            .client
            .post(format!("{}/{}", self.base, method))
            .json(&body)
            .send()
            .await
            .with_context(|| format!("Telegram {} request failed", method))?;

        let parsed: ApiResponse<T> = response
            .json()
            .await
            .with_context(|| format!("Telegram {} returned an unreadable body", method))?;
        unwrap_response(method, parsed)
    }

    pub async fn get_updates(&self, offset: Option<i64>, timeout_secs: u64) -> Result<Vec<Update>> {
        let mut body = json!({
            "timeout": timeout_secs,
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            body["offset"] = json!(offset);
        }
        self.call("getUpdates", body).await
    }

    /// Identity of the bot behind the token
    pub async fn get_me(&self) -> Result<String> {
        #[derive(Deserialize)]
        struct Me {
            username: Option<String>,
        }
        let me: Me = self.call("getMe", json!({})).await?;
        Ok(me.username.unwrap_or_default())
    }
}

#[async_trait]
impl Outbox for TelegramApi {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()> {
        let _: serde_json::Value = self
            .call("sendMessage", json!({ "chat_id": chat_id, "text": text }))
            .await?;
        Ok(())
    }
}

fn unwrap_response<T>(method: &str, response: ApiResponse<T>) -> Result<T> {
    if !response.ok {
        bail!(
            "Telegram {} failed ({}): {}",
            method,
            response.error_code.unwrap_or_default(),
            response.description.unwrap_or_default()
        );
    }
    response
        .result
        .ok_or_else(|| anyhow!("Telegram {} returned ok without a result", method))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_updates() {
        let body = r#"{
            "ok": true,
            "result": [
                {"update_id": 10, "message": {"message_id": 1, "chat": {"id": 42, "type": "private"}, "text": "/start"}},
                {"update_id": 11, "message": {"message_id": 2, "chat": {"id": 42, "type": "private"}, "sticker": {}}},
                {"update_id": 12, "edited_message": {"message_id": 1}}
            ]
        }"#;
        let response: ApiResponse<Vec<Update>> = serde_json::from_str(body).unwrap();
        let updates = unwrap_response("getUpdates", response).unwrap();
        assert_eq!(updates.len(), 3);

        let texts: Vec<Option<(i64, String)>> =
            updates.into_iter().map(Update::into_text).collect();
        assert_eq!(texts[0], Some((42, "/start".to_string())));
        assert_eq!(texts[1], None);
        assert_eq!(texts[2], None);
    }

    #[test]
    fn test_error_response() {
        let body = r#"{"ok": false, "error_code": 401, "description": "Unauthorized"}"#;
        let response: ApiResponse<Vec<Update>> = serde_json::from_str(body).unwrap();
        let err = unwrap_response("getUpdates", response).unwrap_err();
        assert!(err.to_string().contains("401"));
        assert!(err.to_string().contains("Unauthorized"));
    }

    #[test]
    fn test_base_url_includes_token() {
        let api = TelegramApi::new(&BotConfig::default(), "123:abc").unwrap();
        assert_eq!(api.base, "https://api.telegram.org/bot123:abc");
    }
}
