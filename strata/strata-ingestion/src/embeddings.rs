//! Embedding generation interface for the pipeline.
//!
//! The actual models live behind the [`Embedder`] trait; this module
//! wraps any provider with batching, truncation and retry so the
//! pipeline can hand over one flat list of chunk texts.

use async_trait::async_trait;
use std::sync::Arc;
use strata_core::error::Result;
use strata_core::traits::Embedder;
use tracing::warn;
use unicode_segmentation::UnicodeSegmentation;

/// Configuration for embedding generation
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Batch size for batch processing
    pub batch_size: usize,
    /// Maximum text length (chars) before truncation
    pub max_text_length: usize,
    /// Retry attempts per failed batch
    pub max_retries: usize,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            batch_size: 32,
            max_text_length: 8000,
            max_retries: 3,
        }
    }
}

/// Called after each finished batch with `(texts_done, texts_total)`.
pub type ProgressFn = dyn Fn(usize, usize) + Send + Sync;

/// Embedding service that manages batched embedding generation.
pub struct EmbeddingService {
    provider: Arc<dyn Embedder>,
    config: EmbeddingConfig,
    progress: Option<Arc<ProgressFn>>,
}

impl EmbeddingService {
    pub fn new(provider: Arc<dyn Embedder>, config: EmbeddingConfig) -> Self {
        Self {
            provider,
            config,
            progress: None,
        }
    }

    /// Create with default config
    pub fn with_provider(provider: Arc<dyn Embedder>) -> Self {
        Self::new(provider, EmbeddingConfig::default())
    }

    /// Report batch progress through `callback`.
    pub fn with_progress(mut self, callback: impl Fn(usize, usize) + Send + Sync + 'static) -> Self {
        self.progress = Some(Arc::new(callback));
        self
    }

    /// Truncate at a grapheme boundary so multi-byte text never
    /// splits mid-character.
    fn truncate(&self, text: &str) -> String {
        if text.chars().count() <= self.config.max_text_length {
            return text.to_string();
        }
        text.graphemes(true)
            .take(self.config.max_text_length)
            .collect()
    }

    /// Generate embedding for a single text
    pub async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.provider.embed(&self.truncate(text)).await
    }

    /// Generate embeddings in batches with retry and backoff.
    ///
    /// Returns one vector per input text, in input order; empty input
    /// yields an empty result without touching the provider.
    pub async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let mut all_embeddings = Vec::with_capacity(texts.len());

        for batch in texts.chunks(self.config.batch_size) {
            let truncated: Vec<String> = batch.iter().map(|t| self.truncate(t)).collect();

            let mut retries = 0;
            let batch_embeddings = loop {
                match self.provider.embed_batch(&truncated).await {
                    Ok(embeddings) => break embeddings,
                    Err(e) if retries < self.config.max_retries => {
                        retries += 1;
                        let delay =
                            std::time::Duration::from_millis(100 * 2u64.pow(retries as u32));
                        warn!(
                            "Embedding batch failed (attempt {retries}/{}), retrying in {delay:?}: {e}",
                            self.config.max_retries
                        );
                        tokio::time::sleep(delay).await;
                    }
                    Err(e) => return Err(e),
                }
            };

            all_embeddings.extend(batch_embeddings);
            if let Some(progress) = &self.progress {
                progress(all_embeddings.len(), texts.len());
            }
        }

        Ok(all_embeddings)
    }

    /// Get provider model name
    pub fn model_name(&self) -> &str {
        self.provider.model_name()
    }

    /// Get embedding dimension
    pub fn dimension(&self) -> usize {
        self.provider.dimension()
    }
}

/// Deterministic fake embedder for tests and local wiring.
pub struct MockEmbedder {
    dimension: usize,
}

impl MockEmbedder {
    pub fn new(dimension: usize) -> Self {
        Self { dimension }
    }
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new(384)
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        // Deterministic fake vector derived from text length
        let seed = text.chars().count() as f32;
        let mut embedding = vec![0.0; self.dimension];
        for (i, val) in embedding.iter_mut().enumerate() {
            *val = ((seed + i as f32) * 0.01).sin();
        }
        Ok(embedding)
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for text in texts {
            embeddings.push(self.embed(text).await?);
        }
        Ok(embeddings)
    }

    fn model_name(&self) -> &str {
        "mock-embedder"
    }

    fn dimension(&self) -> usize {
        self.dimension
    }
}
