//! Core traits for the pipeline's external collaborators.
//!
//! Embedding generation and vector storage are black boxes behind
//! these signatures; the pipeline receives explicit handles at
//! construction instead of reaching for hidden global state.

use crate::error::Result;
use crate::types::{Chunk, SearchHit};
use async_trait::async_trait;

/// Trait for embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding for text
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts; one vector per input,
    /// same order
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    /// Get the model name
    fn model_name(&self) -> &str;

    /// Get the embedding dimension
    fn dimension(&self) -> usize;
}

/// Trait for the vector index receiving finished chunk batches.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Store chunks with their vectors; `chunks` and `vectors` must
    /// have equal length and matching order
    async fn upsert(&self, chunks: &[Chunk], vectors: &[Vec<f32>]) -> Result<()>;

    /// Rank stored chunks by similarity to the query vector
    async fn search(&self, vector: &[f32], limit: usize) -> Result<Vec<SearchHit>>;
}
