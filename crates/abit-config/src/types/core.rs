//! Core configuration (corpus and knowledge base locations)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// File locations shared by the build pipeline and the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Scraped program records (JSON array)
    #[serde(default = "default_corpus_path")]
    pub corpus_path: PathBuf,

    /// Persisted chunks (JSON array, row order = vector ids)
    #[serde(default = "default_chunks_path")]
    pub chunks_path: PathBuf,

    /// Persisted vector index (binary)
    #[serde(default = "default_index_path")]
    pub index_path: PathBuf,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            corpus_path: default_corpus_path(),
            chunks_path: default_chunks_path(),
            index_path: default_index_path(),
        }
    }
}

impl crate::validation::Validate for CoreConfig {
    fn validate(&self) -> crate::error::Result<()> {
        use crate::error::ConfigError;

        for (field, path) in [
            ("core.corpus_path", &self.corpus_path),
            ("core.chunks_path", &self.chunks_path),
            ("core.index_path", &self.index_path),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::validation(field, "path cannot be empty"));
            }
        }

        if self.chunks_path == self.index_path {
            return Err(ConfigError::validation(
                "core.index_path",
                "chunks and index must be stored in different files",
            ));
        }

        Ok(())
    }
}

fn default_corpus_path() -> PathBuf {
    PathBuf::from("data/programs_data.json")
}

fn default_chunks_path() -> PathBuf {
    PathBuf::from("models/chunks.json")
}

fn default_index_path() -> PathBuf {
    PathBuf::from("models/vector_index.bin")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::Validate;

    #[test]
    fn test_default_config_is_valid() {
        assert!(CoreConfig::default().validate().is_ok());
    }

    #[test]
    fn test_shared_file_invalid() {
        let config = CoreConfig {
            index_path: PathBuf::from("models/chunks.json"),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_serialize_deserialize() {
        let config = CoreConfig::default();
        let yaml = serde_yaml::to_string(&config).unwrap();
        let deserialized: CoreConfig = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(config, deserialized);
    }
}
