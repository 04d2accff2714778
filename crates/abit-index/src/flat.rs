//! Exact nearest-neighbor search over a flat, row-major `f32` matrix.
//!
//! Distances are squared Euclidean. Row ids are insertion positions, which
//! line up with chunk positions in the chunk store.

use crate::error::{IndexError, Result};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const MAGIC: [u8; 8] = *b"ABITIDX\0";
const FORMAT_VERSION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub id: usize,
    pub distance: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlatIndex {
    model: String,
    dim: usize,
    data: Vec<f32>,
    /// Fingerprint of the chunks the rows were embedded from, when known
    chunks_digest: Option<String>,
}

/// On-disk layout, bincode encoded
#[derive(Serialize, Deserialize)]
struct IndexFile {
    magic: [u8; 8],
    version: u32,
    model: String,
    dim: u32,
    chunks_digest: Option<String>,
    data: Vec<f32>,
}

impl FlatIndex {
    pub fn new(model: impl Into<String>, dim: usize) -> Result<Self> {
        if dim == 0 {
            return Err(IndexError::ZeroDimension);
        }
        Ok(Self {
            model: model.into(),
            dim,
            data: Vec::new(),
            chunks_digest: None,
        })
    }

    /// Build from one vector per chunk. Every vector must have length `dim`.
    pub fn build(model: impl Into<String>, dim: usize, vectors: &[Vec<f32>]) -> Result<Self> {
        let mut index = Self::new(model, dim)?;
        index.data.reserve(vectors.len() * dim);
        for vector in vectors {
            index.add(vector)?;
        }
        Ok(index)
    }

    /// Append one row and return its id
    pub fn add(&mut self, vector: &[f32]) -> Result<usize> {
        self.check_dim(vector)?;
        self.data.extend_from_slice(vector);
        Ok(self.len() - 1)
    }

    pub fn len(&self) -> usize {
        self.data.len() / self.dim
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn chunks_digest(&self) -> Option<&str> {
        self.chunks_digest.as_deref()
    }

    pub(crate) fn set_chunks_digest(&mut self, digest: String) {
        self.chunks_digest = Some(digest);
    }

    pub fn vector(&self, id: usize) -> Option<&[f32]> {
        let start = id.checked_mul(self.dim)?;
        self.data.get(start..start + self.dim)
    }

    /// The `k` closest rows, ascending by distance, ties broken by id.
    /// Asking for more rows than exist returns all of them.
    pub fn search(&self, query: &[f32], k: usize) -> Result<Vec<Neighbor>> {
        self.check_dim(query)?;
        if k == 0 || self.is_empty() {
            return Ok(Vec::new());
        }

        let distances: Vec<f32> = self
            .data
            .par_chunks_exact(self.dim)
            .map(|row| squared_l2(row, query))
            .collect();

        let mut neighbors: Vec<Neighbor> = distances
            .into_iter()
            .enumerate()
            .map(|(id, distance)| Neighbor { id, distance })
            .collect();

        neighbors.sort_by(|a, b| a.distance.total_cmp(&b.distance).then(a.id.cmp(&b.id)));
        neighbors.truncate(k);
        Ok(neighbors)
    }

    pub fn persist(&self, path: &Path) -> Result<()> {
        write_file(path, &self.encode(path)?)?;
        tracing::debug!(path = %path.display(), rows = self.len(), dim = self.dim, "persisted index");
        Ok(())
    }

    pub(crate) fn encode(&self, path: &Path) -> Result<Vec<u8>> {
        let file = IndexFile {
            magic: MAGIC,
            version: FORMAT_VERSION,
            model: self.model.clone(),
            dim: self.dim as u32,
            chunks_digest: self.chunks_digest.clone(),
            data: self.data.clone(),
        };
        bincode::serialize(&file).map_err(|e| IndexError::Corrupt {
            path: path.to_path_buf(),
            reason: format!("failed to encode index: {}", e),
        })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| IndexError::from_read(path, e))?;
        let corrupt = |reason: String| IndexError::Corrupt {
            path: path.to_path_buf(),
            reason,
        };

        let file: IndexFile =
            bincode::deserialize(&bytes).map_err(|e| corrupt(format!("undecodable: {}", e)))?;

        if file.magic != MAGIC {
            return Err(corrupt("not an abit index file".to_string()));
        }
        if file.version != FORMAT_VERSION {
            return Err(corrupt(format!(
                "format version {} is not supported (expected {})",
                file.version, FORMAT_VERSION
            )));
        }
        let dim = file.dim as usize;
        if dim == 0 || file.data.len() % dim != 0 {
            return Err(corrupt(format!(
                "{} values do not form rows of dimension {}",
                file.data.len(),
                dim
            )));
        }

        Ok(Self {
            model: file.model,
            dim,
            data: file.data,
            chunks_digest: file.chunks_digest,
        })
    }

    /// Load and require the index to come from `expected_model`
    pub fn load_for_model(path: &Path, expected_model: &str) -> Result<Self> {
        let index = Self::load(path)?;
        if index.model != expected_model {
            return Err(IndexError::ModelMismatch {
                expected: expected_model.to_string(),
                found: index.model,
            });
        }
        Ok(index)
    }

    fn check_dim(&self, vector: &[f32]) -> Result<()> {
        if vector.len() != self.dim {
            return Err(IndexError::DimensionMismatch {
                expected: self.dim,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

fn squared_l2(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Write through a sibling temp file so readers never see a half-written file.
pub(crate) fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let tmp = stage_file(path, bytes)?;
    commit_file(&tmp, path)
}

/// First half of [`write_file`]: the bytes land next to `path`, which is untouched.
pub(crate) fn stage_file(path: &Path, bytes: &[u8]) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| IndexError::io(parent, e))?;
    }
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, bytes).map_err(|e| IndexError::io(&tmp, e))?;
    Ok(tmp)
}

pub(crate) fn commit_file(tmp: &Path, path: &Path) -> Result<()> {
    fs::rename(tmp, path).map_err(|e| IndexError::io(path, e))
}
