//! Chunks persisted as a pretty-printed UTF-8 JSON array.

use crate::error::{IndexError, Result};
use crate::flat::write_file;
use abit_core::Chunk;
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

pub fn save_chunks(path: &Path, chunks: &[Chunk]) -> Result<()> {
    write_file(path, &encode_chunks(path, chunks)?)
}

pub(crate) fn encode_chunks(path: &Path, chunks: &[Chunk]) -> Result<Vec<u8>> {
    serde_json::to_vec_pretty(chunks).map_err(|e| IndexError::Corrupt {
        path: path.to_path_buf(),
        reason: format!("failed to encode chunks: {}", e),
    })
}

/// SHA-256 over every chunk field, length-prefixed, in order
pub fn chunks_digest(chunks: &[Chunk]) -> String {
    let mut hasher = Sha256::new();
    for chunk in chunks {
        for part in [&chunk.text, &chunk.source, &chunk.field, &chunk.url] {
            hasher.update((part.len() as u64).to_le_bytes());
            hasher.update(part.as_bytes());
        }
    }
    hex::encode(hasher.finalize())
}

pub fn load_chunks(path: &Path) -> Result<Vec<Chunk>> {
    let bytes = fs::read(path).map_err(|e| IndexError::from_read(path, e))?;
    let chunks: Vec<Chunk> = serde_json::from_slice(&bytes).map_err(|e| IndexError::Corrupt {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    if let Some(pos) = chunks.iter().position(|c| c.text.trim().is_empty()) {
        return Err(IndexError::Corrupt {
            path: path.to_path_buf(),
            reason: format!("chunk {} has empty text", pos),
        });
    }
    Ok(chunks)
}
