use abit_config::{EmbeddingBackend, EmbeddingConfig};
use abit_core::Embedder;
use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

/// Build the configured embedding backend. The local model is loaded (and
/// downloaded on first use) before this returns.
pub async fn select_embedder(config: &EmbeddingConfig) -> Result<Arc<dyn Embedder>> {
    match config.backend {
        EmbeddingBackend::Local => {
            let model_name = config.model_name.clone();
            let embedder = tokio::task::spawn_blocking(move || LocalEmbedder::new(&model_name))
                .await
                .context("model loading task failed")??;
            tracing::info!(model = %config.model_name, "local embedding model ready");
            Ok(Arc::new(embedder))
        }
        EmbeddingBackend::External => {
            let api_key = env::var("OPENAI_API_KEY")
                .map_err(|_| anyhow!("embedding.backend = openai requires OPENAI_API_KEY"))?;
            let base_url = config
                .base_url
                .clone()
                .unwrap_or_else(|| "https://api.openai.com/v1".to_string());
            Ok(Arc::new(ExternalEmbedder::new(
                config.model_name.clone(),
                api_key,
                &base_url,
            )?))
        }
        EmbeddingBackend::Ollama => {
            let base_url = config
                .base_url
                .clone()
                .or_else(|| env::var("OLLAMA_BASE_URL").ok())
                .unwrap_or_else(|| "http://localhost:11434".to_string());
            Ok(Arc::new(OllamaEmbedder::new(config.model_name.clone(), &base_url)?))
        }
    }
}

/// fastembed (ONNX runtime) on the CPU. Inference is blocking, so every call
/// is moved to the blocking pool.
pub struct LocalEmbedder {
    model: Arc<TextEmbedding>,
    model_id: String,
}

impl LocalEmbedder {
    pub fn new(model_name: &str) -> Result<Self> {
        let embedding_model = local_model(model_name)?;

        // Use global cache directory to avoid re-downloading models per checkout
        let cache_dir = env::var("FASTEMBED_CACHE_PATH")
            .ok()
            .or_else(|| {
                env::var("HOME")
                    .ok()
                    .map(|home| format!("{}/.cache/fastembed", home))
            })
            .unwrap_or_else(|| ".fastembed_cache".to_string());

        let model = TextEmbedding::try_new(
            InitOptions::new(embedding_model)
                .with_cache_dir(PathBuf::from(cache_dir))
                .with_show_download_progress(true),
        )
        .map_err(|e| anyhow!("Failed to initialize local embedding model: {}", e))?;

        Ok(Self {
            model: Arc::new(model),
            model_id: model_name.to_string(),
        })
    }
}

/// Map a configured model name onto the fastembed catalogue
fn local_model(name: &str) -> Result<EmbeddingModel> {
    match name {
        "intfloat/multilingual-e5-large" => Ok(EmbeddingModel::MultilingualE5Large),
        "intfloat/multilingual-e5-base" => Ok(EmbeddingModel::MultilingualE5Base),
        "intfloat/multilingual-e5-small" => Ok(EmbeddingModel::MultilingualE5Small),
        "sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2" => {
            Ok(EmbeddingModel::ParaphraseMLMiniLML12V2)
        }
        other => Err(anyhow!(
            "Unsupported local embedding model '{}'. Supported: intfloat/multilingual-e5-large, \
             intfloat/multilingual-e5-base, intfloat/multilingual-e5-small, \
             sentence-transformers/paraphrase-multilingual-MiniLM-L12-v2",
            other
        )),
    }
}

#[async_trait]
impl Embedder for LocalEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut list = self.embed_batch(&[text.to_string()]).await?;
        list.pop().ok_or_else(|| anyhow!("Empty embedding response"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let model = Arc::clone(&self.model);
        let texts = texts.to_vec();
        tokio::task::spawn_blocking(move || model.embed(texts, None))
            .await
            .context("embedding task failed")?
            .map_err(|e| anyhow!("Failed to generate embeddings: {}", e))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

const REMOTE_TIMEOUT: Duration = Duration::from_secs(60);

fn remote_client() -> Result<Client> {
    Client::builder()
        .timeout(REMOTE_TIMEOUT)
        .build()
        .context("failed to build embedding HTTP client")
}

/// Status check plus typed body for the remote backends
async fn read_response<T: DeserializeOwned>(backend: &str, resp: reqwest::Response) -> Result<T> {
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        bail!("{} embeddings failed ({}): {}", backend, status, body);
    }
    resp.json()
        .await
        .with_context(|| format!("{} returned an unreadable embeddings body", backend))
}

/// Vectors that are safe to put into the index: one per input, none empty,
/// all of one dimension, all values finite.
fn checked_vectors(backend: &str, vectors: Vec<Vec<f32>>, expected: usize) -> Result<Vec<Vec<f32>>> {
    if vectors.len() != expected {
        bail!(
            "{} returned {} embeddings for {} texts",
            backend,
            vectors.len(),
            expected
        );
    }
    let Some(dim) = vectors.first().map(Vec::len) else {
        return Ok(vectors);
    };
    if dim == 0 {
        bail!("{} returned an empty embedding", backend);
    }
    if let Some(pos) = vectors.iter().position(|v| v.len() != dim) {
        bail!(
            "{} returned embedding {} with dimension {}, expected {}",
            backend,
            pos,
            vectors[pos].len(),
            dim
        );
    }
    if vectors.iter().flatten().any(|x| !x.is_finite()) {
        bail!("{} returned non-finite embedding values", backend);
    }
    Ok(vectors)
}

/// OpenAI-compatible `/embeddings`, one request per batch
pub struct ExternalEmbedder {
    model: String,
    api_key: String,
    endpoint: String,
    client: Client,
}

#[derive(Deserialize)]
struct EmbeddingList {
    data: Vec<EmbeddingRow>,
}

#[derive(Deserialize)]
struct EmbeddingRow {
    #[serde(default)]
    index: usize,
    embedding: Vec<f32>,
}

impl ExternalEmbedder {
    pub fn new(model: String, api_key: String, base_url: &str) -> Result<Self> {
        Ok(Self {
            model,
            api_key,
            endpoint: format!("{}/embeddings", base_url.trim_end_matches('/')),
            client: remote_client()?,
        })
    }
}

#[async_trait]
impl Embedder for ExternalEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut list = self.embed_batch(&[text.to_string()]).await?;
        list.pop().ok_or_else(|| anyhow!("OpenAI returned no embedding"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        let resp = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .json(&serde_json::json!({ "model": self.model, "input": texts }))
            .send()
            .await
            .context("OpenAI embeddings request failed")?;

        let mut list: EmbeddingList = read_response("OpenAI", resp).await?;
        // rows carry their input position; keep chunk order
        list.data.sort_by_key(|row| row.index);
        let vectors = list.data.into_iter().map(|row| row.embedding).collect();
        checked_vectors("OpenAI", vectors, texts.len())
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}

/// Ollama `/api/embeddings`. The endpoint takes one prompt per request.
pub struct OllamaEmbedder {
    model: String,
    endpoint: String,
    client: Client,
}

#[derive(Deserialize)]
struct OllamaEmbedding {
    #[serde(default)]
    embedding: Vec<f32>,
}

impl OllamaEmbedder {
    pub fn new(model: String, base_url: &str) -> Result<Self> {
        Ok(Self {
            model,
            endpoint: format!("{}/api/embeddings", base_url.trim_end_matches('/')),
            client: remote_client()?,
        })
    }

    async fn request(&self, text: &str) -> Result<Vec<f32>> {
        let resp = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "model": self.model, "prompt": text }))
            .send()
            .await
            .context("Ollama embeddings request failed")?;
        let body: OllamaEmbedding = read_response("Ollama", resp).await?;
        Ok(body.embedding)
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let vector = self.request(text).await?;
        let mut checked = checked_vectors("Ollama", vec![vector], 1)?;
        checked.pop().ok_or_else(|| anyhow!("Ollama returned no embedding"))
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());
        for text in texts {
            vectors.push(self.request(text).await?);
        }
        checked_vectors("Ollama", vectors, texts.len())
    }

    fn model_id(&self) -> &str {
        &self.model
    }
}
