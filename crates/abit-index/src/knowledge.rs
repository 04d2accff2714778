use crate::chunk_store::{chunks_digest, encode_chunks, load_chunks};
use crate::error::{IndexError, Result};
use crate::flat::{commit_file, stage_file, FlatIndex, Neighbor};
use abit_core::Chunk;
use std::path::Path;

/// Chunks and their vectors, always built, persisted and loaded together.
///
/// Row `i` of the index is the embedding of `chunks[i]`.
#[derive(Debug, Clone)]
pub struct KnowledgeBase {
    chunks: Vec<Chunk>,
    index: FlatIndex,
}

impl KnowledgeBase {
    /// Pair chunks with their vectors and stamp the index with the chunks' digest.
    pub fn new(chunks: Vec<Chunk>, mut index: FlatIndex) -> Result<Self> {
        check_lengths(&chunks, &index)?;
        index.set_chunks_digest(chunks_digest(&chunks));
        Ok(Self { chunks, index })
    }

    /// Load both files. Either one missing is an error, as is an index built
    /// with a different embedding model or from different chunks.
    pub fn load(chunks_path: &Path, index_path: &Path, expected_model: &str) -> Result<Self> {
        let chunks = load_chunks(chunks_path)?;
        let index = FlatIndex::load_for_model(index_path, expected_model)?;
        check_lengths(&chunks, &index)?;
        if let Some(stored) = index.chunks_digest() {
            if stored != chunks_digest(&chunks) {
                return Err(IndexError::Corrupt {
                    path: index_path.to_path_buf(),
                    reason: format!(
                        "index was built from different chunks than {}; rebuild the index",
                        chunks_path.display()
                    ),
                });
            }
        }
        let kb = Self { chunks, index };
        tracing::info!(
            chunks = kb.len(),
            dim = kb.index.dim(),
            model = kb.index.model(),
            "knowledge base loaded"
        );
        Ok(kb)
    }

    /// Both files are staged before either is replaced, so a failed write
    /// leaves the previous pair in place.
    pub fn persist(&self, chunks_path: &Path, index_path: &Path) -> Result<()> {
        let chunks_bytes = encode_chunks(chunks_path, &self.chunks)?;
        let index_bytes = self.index.encode(index_path)?;

        let chunks_tmp = stage_file(chunks_path, &chunks_bytes)?;
        let index_tmp = match stage_file(index_path, &index_bytes) {
            Ok(tmp) => tmp,
            Err(e) => {
                let _ = std::fs::remove_file(&chunks_tmp);
                return Err(e);
            }
        };

        commit_file(&index_tmp, index_path)?;
        commit_file(&chunks_tmp, chunks_path)?;
        tracing::debug!(
            chunks = self.len(),
            index = %index_path.display(),
            "persisted knowledge base"
        );
        Ok(())
    }

    /// Nearest chunks with their squared L2 distances, closest first
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<(&Chunk, f32)>> {
        let hits = self.index.search(query, k)?;
        Ok(hits
            .into_iter()
            .filter_map(|Neighbor { id, distance }| {
                self.chunks.get(id).map(|chunk| (chunk, distance))
            })
            .collect())
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn index(&self) -> &FlatIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

fn check_lengths(chunks: &[Chunk], index: &FlatIndex) -> Result<()> {
    if chunks.len() != index.len() {
        return Err(IndexError::LengthMismatch {
            chunks: chunks.len(),
            vectors: index.len(),
        });
    }
    Ok(())
}
