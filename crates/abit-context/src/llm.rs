use abit_config::LlmConfig;
use abit_core::{ChatOptions, LlmError, Message, ModelProvider};
use async_trait::async_trait;
use reqwest::StatusCode;
use std::env;
use std::sync::Arc;

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// OpenAI-compatible chat completions client
#[derive(Clone)]
pub struct OpenAIProvider {
    model: String,
    api_key: String,
    client: reqwest::Client,
    api_base: String,
}

impl OpenAIProvider {
    pub fn new(config: &LlmConfig, api_key: String) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            model: config.model.clone(),
            api_key,
            client,
            api_base: config
                .api_base
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE.to_string()),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.api_base.trim_end_matches('/'), path)
    }
}

/// Map a non-success HTTP status onto the error taxonomy
fn classify_status(status: StatusCode, body: String) -> LlmError {
    let detail = format!("{} - {}", status, body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => LlmError::Authentication(detail),
        StatusCode::TOO_MANY_REQUESTS => LlmError::RateLimit(detail),
        _ => LlmError::Api(detail),
    }
}

#[async_trait]
impl ModelProvider for OpenAIProvider {
    async fn chat(&self, messages: &[Message], options: ChatOptions) -> Result<String, LlmError> {
        let body = serde_json::json!({
            "model": self.model,
            "messages": messages,
            "temperature": options.temperature,
            "max_tokens": options.max_tokens,
        });

        let res = self
            .client
            .post(self.url("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::Api(e.to_string()))?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(classify_status(status, text));
        }

        let json: serde_json::Value = res
            .json()
            .await
            .map_err(|e| LlmError::Api(format!("invalid response body: {}", e)))?;

        if let Some(error) = json.get("error") {
            return Err(LlmError::Api(format!("API returned error: {}", error)));
        }

        json["choices"][0]["message"]["content"]
            .as_str()
            .map(|s| s.to_string())
            .ok_or_else(|| LlmError::Api("missing content in choices".to_string()))
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        let res = self
            .client
            .get(self.url("models"))
            .bearer_auth(&self.api_key)
            .send()
            .await
            .map_err(|e| LlmError::Api(e.to_string()))?;

        if res.status().is_success() {
            Ok(())
        } else {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            Err(classify_status(status, text))
        }
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Build the LLM client from `OPENAI_API_KEY` and probe it once.
///
/// Returns `None` when no key is set, the client cannot be built, or the
/// probe reports an authentication failure.
pub async fn connect_llm(config: &LlmConfig) -> Option<Arc<dyn ModelProvider>> {
    let Ok(api_key) = env::var("OPENAI_API_KEY") else {
        tracing::warn!("OPENAI_API_KEY not set; generated answers are disabled");
        return None;
    };
    if api_key.trim().is_empty() {
        tracing::warn!("OPENAI_API_KEY is empty; generated answers are disabled");
        return None;
    }

    match OpenAIProvider::new(config, api_key) {
        Ok(provider) => gate_provider(Arc::new(provider)).await,
        Err(e) => {
            tracing::error!(error = %e, "failed to build LLM client");
            None
        }
    }
}

/// Keep a provider unless its health check fails authentication. Other
/// failures may be transient and only produce a warning.
pub async fn gate_provider(provider: Arc<dyn ModelProvider>) -> Option<Arc<dyn ModelProvider>> {
    match provider.health_check().await {
        Ok(()) => {
            tracing::info!(model = provider.model(), "LLM client connected");
            Some(provider)
        }
        Err(LlmError::Authentication(detail)) => {
            tracing::error!(%detail, "LLM key rejected; generated answers are disabled");
            None
        }
        Err(e) => {
            tracing::warn!(error = %e, "LLM health check failed; keeping client");
            Some(provider)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Probe(fn() -> Result<(), LlmError>);

    #[async_trait]
    impl ModelProvider for Probe {
        async fn chat(&self, _: &[Message], _: ChatOptions) -> Result<String, LlmError> {
            Ok(String::new())
        }

        async fn health_check(&self) -> Result<(), LlmError> {
            (self.0)()
        }

        fn model(&self) -> &str {
            "probe"
        }
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, String::new()),
            LlmError::Authentication(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::FORBIDDEN, String::new()),
            LlmError::Authentication(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::TOO_MANY_REQUESTS, String::new()),
            LlmError::RateLimit(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::BAD_GATEWAY, "upstream".to_string()),
            LlmError::Api(msg) if msg.contains("upstream")
        ));
    }

    #[tokio::test]
    async fn test_gate_drops_only_on_auth_failure() {
        let ok = gate_provider(Arc::new(Probe(|| Ok(())))).await;
        assert!(ok.is_some());

        let auth = gate_provider(Arc::new(Probe(|| {
            Err(LlmError::Authentication("bad key".to_string()))
        })))
        .await;
        assert!(auth.is_none());

        let flaky = gate_provider(Arc::new(Probe(|| Err(LlmError::Api("timeout".to_string())))))
            .await;
        assert!(flaky.is_some());
    }

    #[test]
    fn test_api_base_override() {
        let config = LlmConfig {
            api_base: Some("http://localhost:8080/v1/".to_string()),
            ..Default::default()
        };
        let provider = OpenAIProvider::new(&config, "sk-test".to_string()).unwrap();
        assert_eq!(provider.url("models"), "http://localhost:8080/v1/models");
    }
}
