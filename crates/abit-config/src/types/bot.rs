//! Telegram transport configuration

use serde::{Deserialize, Serialize};

/// Long-polling settings. The token itself comes from `TELEGRAM_BOT_TOKEN`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BotConfig {
    /// Bot API endpoint
    #[serde(default = "default_api_base")]
    pub api_base: String,

    /// Server-side wait for `getUpdates`
    #[serde(default = "default_poll_timeout_secs")]
    pub poll_timeout_secs: u64,

    /// Pause after a failed poll before trying again
    #[serde(default = "default_retry_backoff_secs")]
    pub retry_backoff_secs: u64,

    /// A chat worker with no messages for this long is shut down
    #[serde(default = "default_idle_worker_secs")]
    pub idle_worker_secs: u64,

    /// An unfinished recommendation dialog is forgotten after this long without an answer
    #[serde(default = "default_dialog_ttl_secs")]
    pub dialog_ttl_secs: u64,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            api_base: default_api_base(),
            poll_timeout_secs: default_poll_timeout_secs(),
            retry_backoff_secs: default_retry_backoff_secs(),
            idle_worker_secs: default_idle_worker_secs(),
            dialog_ttl_secs: default_dialog_ttl_secs(),
        }
    }
}

impl crate::validation::Validate for BotConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if !self.api_base.starts_with("http://") && !self.api_base.starts_with("https://") {
            return Err(ConfigError::validation(
                "bot.api_base",
                format!("must start with http:// or https://, got: {}", self.api_base),
            ));
        }

        if self.poll_timeout_secs > 50 {
            return Err(ConfigError::validation(
                "bot.poll_timeout_secs",
                "Telegram closes long polls after 50 seconds",
            ));
        }

        if self.idle_worker_secs == 0 {
            return Err(ConfigError::validation(
                "bot.idle_worker_secs",
                "idle_worker_secs must be > 0",
            ));
        }

        if self.dialog_ttl_secs == 0 {
            return Err(ConfigError::validation(
                "bot.dialog_ttl_secs",
                "dialog_ttl_secs must be > 0",
            ));
        }

        Ok(())
    }
}

fn default_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout_secs() -> u64 {
    30
}

fn default_retry_backoff_secs() -> u64 {
    5
}

fn default_idle_worker_secs() -> u64 {
    600
}

fn default_dialog_ttl_secs() -> u64 {
    3600
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        assert!(BotConfig::default().validate().is_ok());
    }

    #[test]
    fn test_long_poll_limit() {
        let config = BotConfig {
            poll_timeout_secs: 120,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
