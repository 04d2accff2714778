//! Retrieval configuration

use serde::{Deserialize, Serialize};

/// Nearest-neighbor search settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of nearest chunks to fetch per question
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Largest squared L2 distance at which a chunk still counts as relevant
    ///
    /// Depends on the embedding model. For unit-normalized embeddings the
    /// distance lies in [0, 4] and equals `2 - 2 * cosine`.
    #[serde(default = "default_threshold")]
    pub threshold: f32,
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_k: default_top_k(),
            threshold: default_threshold(),
        }
    }
}

impl crate::validation::Validate for RetrievalConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        if self.top_k == 0 {
            return Err(ConfigError::InvalidInteger {
                field: "retrieval.top_k".to_string(),
                value: self.top_k,
                min: 0,
            });
        }

        if self.top_k > 1000 {
            return Err(ConfigError::validation(
                "retrieval.top_k",
                format!("top_k too large ({}), consider using <= 1000", self.top_k),
            ));
        }

        if !self.threshold.is_finite() {
            return Err(ConfigError::validation(
                "retrieval.threshold",
                "threshold must be a finite number",
            ));
        }

        Ok(())
    }
}

fn default_top_k() -> usize {
    3
}

fn default_threshold() -> f32 {
    0.5
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = RetrievalConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.top_k, 3);
    }

    #[test]
    fn test_zero_top_k_invalid() {
        let config = RetrievalConfig {
            top_k: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_negative_threshold_allowed() {
        // Disables retrieval entirely; useful for smoke-testing the fallback path.
        let config = RetrievalConfig {
            threshold: -1.0,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nan_threshold_invalid() {
        let config = RetrievalConfig {
            threshold: f32::NAN,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
