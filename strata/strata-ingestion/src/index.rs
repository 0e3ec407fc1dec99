//! In-memory vector index.
//!
//! A reference [`VectorIndex`] backed by a `RwLock`ed map, used by the
//! pipeline tests and as a wiring default until a real store is
//! configured. Search is brute-force cosine similarity.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::RwLock;
use strata_core::error::{Result, StrataError};
use strata_core::traits::VectorIndex;
use strata_core::types::{Chunk, SearchHit};
use tracing::debug;

struct Entry {
    chunk: Chunk,
    vector: Vec<f32>,
}

/// Brute-force in-memory index keyed by chunk id.
///
/// Upserting the same chunk id replaces the previous entry, so
/// re-ingesting a file never duplicates points.
#[derive(Default)]
pub struct MemoryIndex {
    entries: RwLock<HashMap<String, Entry>>,
}

impl MemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored points.
    pub fn len(&self) -> usize {
        self.entries.read().map(|e| e.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn upsert(&self, chunks: &[Chunk], vectors: &[Vec<f32>]) -> Result<()> {
        if chunks.len() != vectors.len() {
            return Err(StrataError::index(format!(
                "chunk/vector count mismatch: {} chunks, {} vectors",
                chunks.len(),
                vectors.len()
            )));
        }

        let mut entries = self
            .entries
            .write()
            .map_err(|_| StrataError::index("index lock poisoned"))?;
        for (chunk, vector) in chunks.iter().zip(vectors) {
            entries.insert(
                chunk.chunk_id.clone(),
                Entry {
                    chunk: chunk.clone(),
                    vector: vector.clone(),
                },
            );
        }
        debug!("Index now holds {} points", entries.len());
        Ok(())
    }

    async fn search(&self, query: &[f32], limit: usize) -> Result<Vec<SearchHit>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| StrataError::index("index lock poisoned"))?;

        let mut hits: Vec<SearchHit> = entries
            .values()
            .map(|entry| SearchHit {
                score: cosine_similarity(query, &entry.vector),
                content: entry.chunk.content.clone(),
                metadata: entry.chunk.metadata.clone(),
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);
        Ok(hits)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use strata_core::types::ChunkLevel;

    fn chunk(id: &str, content: &str) -> Chunk {
        Chunk {
            chunk_id: id.to_string(),
            content: content.to_string(),
            level: ChunkLevel::Micro,
            parent_id: None,
            metadata: HashMap::new(),
        }
    }

    #[tokio::test]
    async fn upsert_and_search_ranks_by_similarity() {
        let index = MemoryIndex::new();
        let chunks = vec![chunk("a", "close"), chunk("b", "far")];
        let vectors = vec![vec![1.0, 0.0], vec![0.0, 1.0]];
        index.upsert(&chunks, &vectors).await.unwrap();

        let hits = index.search(&[1.0, 0.1], 10).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].content, "close");
        assert!(hits[0].score > hits[1].score);
    }

    #[tokio::test]
    async fn limit_caps_results() {
        let index = MemoryIndex::new();
        let chunks: Vec<Chunk> = (0..5).map(|i| chunk(&format!("c{i}"), "text")).collect();
        let vectors = vec![vec![1.0, 0.0]; 5];
        index.upsert(&chunks, &vectors).await.unwrap();

        let hits = index.search(&[1.0, 0.0], 2).await.unwrap();
        assert_eq!(hits.len(), 2);
    }

    #[tokio::test]
    async fn mismatched_counts_are_rejected() {
        let index = MemoryIndex::new();
        let err = index
            .upsert(&[chunk("a", "x")], &[])
            .await
            .unwrap_err();
        assert!(err.to_string().contains("mismatch"));
        assert!(index.is_empty());
    }

    #[tokio::test]
    async fn same_id_replaces_instead_of_duplicating() {
        let index = MemoryIndex::new();
        index
            .upsert(&[chunk("a", "v1")], &[vec![1.0, 0.0]])
            .await
            .unwrap();
        index
            .upsert(&[chunk("a", "v2")], &[vec![1.0, 0.0]])
            .await
            .unwrap();

        assert_eq!(index.len(), 1);
        let hits = index.search(&[1.0, 0.0], 1).await.unwrap();
        assert_eq!(hits[0].content, "v2");
    }

    #[tokio::test]
    async fn zero_vector_scores_zero() {
        let index = MemoryIndex::new();
        index
            .upsert(&[chunk("a", "x")], &[vec![0.0, 0.0]])
            .await
            .unwrap();
        let hits = index.search(&[1.0, 0.0], 1).await.unwrap();
        assert_eq!(hits[0].score, 0.0);
    }
}
