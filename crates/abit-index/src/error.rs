use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, IndexError>;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("{path} not found; run `abit build` first")]
    Missing { path: PathBuf },

    #[error("{path} is corrupt: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    #[error("vector dimension mismatch: index has {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("index was built with model '{found}' but '{expected}' is configured; rebuild the index")]
    ModelMismatch { expected: String, found: String },

    #[error("knowledge base holds {chunks} chunks but {vectors} vectors; rebuild the index")]
    LengthMismatch { chunks: usize, vectors: usize },

    #[error("vector dimension must be positive")]
    ZeroDimension,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IndexError {
    /// Map a read failure, turning a missing file into [`IndexError::Missing`]
    pub(crate) fn from_read(path: &std::path::Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            IndexError::Missing {
                path: path.to_path_buf(),
            }
        } else {
            IndexError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub(crate) fn io(path: &std::path::Path, source: std::io::Error) -> Self {
        IndexError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}
