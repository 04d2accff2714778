use crate::messages;
use abit_core::LlmError;
use thiserror::Error;

/// Everything that can go wrong while answering one question. Each kind
/// maps to exactly one user-facing message.
#[derive(Debug, Error)]
pub enum AnswerError {
    /// The embedding backend could not embed the question
    #[error("knowledge base not ready: {0}")]
    NotReady(String),

    #[error("LLM authentication failed: {0}")]
    LlmAuthentication(String),

    #[error("LLM rate limit exceeded: {0}")]
    LlmRateLimit(String),

    #[error("LLM API failure: {0}")]
    LlmApi(String),

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

impl AnswerError {
    pub fn user_message(&self) -> &'static str {
        match self {
            AnswerError::NotReady(_) => messages::NOT_READY_MESSAGE,
            AnswerError::LlmAuthentication(_) => messages::LLM_AUTH_ERROR_MESSAGE,
            AnswerError::LlmRateLimit(_) => messages::LLM_RATE_LIMIT_MESSAGE,
            AnswerError::LlmApi(_) => messages::LLM_API_ERROR_MESSAGE,
            AnswerError::Unexpected(_) => messages::UNEXPECTED_ERROR_MESSAGE,
        }
    }
}

impl From<LlmError> for AnswerError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Authentication(detail) => AnswerError::LlmAuthentication(detail),
            LlmError::RateLimit(detail) => AnswerError::LlmRateLimit(detail),
            LlmError::Api(detail) => AnswerError::LlmApi(detail),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_llm_errors_keep_their_kind() {
        let err = AnswerError::from(LlmError::RateLimit("429".to_string()));
        assert!(matches!(err, AnswerError::LlmRateLimit(_)));
        assert_eq!(err.user_message(), messages::LLM_RATE_LIMIT_MESSAGE);

        let err = AnswerError::from(LlmError::Authentication("401".to_string()));
        assert_eq!(err.user_message(), messages::LLM_AUTH_ERROR_MESSAGE);
    }

    #[test]
    fn test_each_kind_has_distinct_message() {
        let all = [
            AnswerError::NotReady(String::new()),
            AnswerError::LlmAuthentication(String::new()),
            AnswerError::LlmRateLimit(String::new()),
            AnswerError::LlmApi(String::new()),
            AnswerError::Unexpected(String::new()),
        ];
        let mut texts: Vec<&str> = all.iter().map(AnswerError::user_message).collect();
        texts.sort();
        texts.dedup();
        assert_eq!(texts.len(), 5);
    }
}
