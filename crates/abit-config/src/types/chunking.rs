//! Chunking configuration

use serde::{Deserialize, Serialize};

/// Limits for packing field text into chunks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Maximum characters per chunk
    ///
    /// A single sentence longer than this still becomes one chunk.
    #[serde(default = "default_max_chars")]
    pub max_chars: usize,

    /// Text fields with this many characters or fewer are not indexed
    #[serde(default = "default_min_field_chars")]
    pub min_field_chars: usize,

    /// Separator between sentences
    #[serde(default = "default_sentence_delimiter")]
    pub sentence_delimiter: String,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            max_chars: default_max_chars(),
            min_field_chars: default_min_field_chars(),
            sentence_delimiter: default_sentence_delimiter(),
        }
    }
}

impl crate::validation::Validate for ChunkingConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;
        use crate::validation::validate_positive;

        validate_positive("chunking.max_chars", self.max_chars, 0)?;

        if self.sentence_delimiter.trim().is_empty() {
            return Err(ConfigError::validation(
                "chunking.sentence_delimiter",
                "delimiter must contain a non-whitespace character",
            ));
        }

        Ok(())
    }
}

fn default_max_chars() -> usize {
    800
}

fn default_min_field_chars() -> usize {
    50
}

fn default_sentence_delimiter() -> String {
    ". ".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_is_valid() {
        let config = ChunkingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.max_chars, 800);
        assert_eq!(config.min_field_chars, 50);
    }

    #[test]
    fn test_zero_cap_invalid() {
        let config = ChunkingConfig {
            max_chars: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_delimiter_invalid() {
        let config = ChunkingConfig {
            sentence_delimiter: " ".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
