//! End-to-end ingestion pipeline.
//!
//! Wires the loader, cleaner and chunker together and hands finished
//! chunk batches to the embedding and index collaborators. A unit
//! that fails to extract is recorded in the report and skipped; the
//! rest of the file still goes through.

use crate::chunker::HierarchicalChunker;
use crate::cleaner::TextCleaner;
use crate::embeddings::{EmbeddingConfig, EmbeddingService};
use crate::extract::{NullOcr, OcrEngine};
use crate::loader::UniversalLoader;
use futures::StreamExt;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use strata_core::config::EngineConfig;
use strata_core::error::{Result, StrataError};
use strata_core::traits::{Embedder, VectorIndex};
use strata_core::types::{Chunk, IngestReport, SearchHit};
use tracing::{info, warn};

/// Orchestrates extraction, cleaning, chunking, embedding and
/// indexing for one file at a time.
///
/// All collaborators are explicit handles passed in at construction;
/// the pipeline holds no global state.
pub struct IngestPipeline {
    loader: UniversalLoader,
    cleaner: TextCleaner,
    chunker: HierarchicalChunker,
    embeddings: EmbeddingService,
    index: Arc<dyn VectorIndex>,
    max_workers: usize,
    skip_boilerplate: bool,
}

impl IngestPipeline {
    /// Build a pipeline from an engine config and explicit
    /// collaborator handles.
    pub fn new(
        config: &EngineConfig,
        ocr: Arc<dyn OcrEngine>,
        embedder: Arc<dyn Embedder>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        Self {
            loader: UniversalLoader::new(ocr, config.ocr_text_threshold),
            cleaner: TextCleaner::new(),
            chunker: HierarchicalChunker::from_config(&config.chunking),
            embeddings: EmbeddingService::new(embedder, EmbeddingConfig::default()),
            index,
            max_workers: config.max_workers.max(1),
            skip_boilerplate: true,
        }
    }

    /// Default config with no OCR engine attached.
    pub fn with_defaults(embedder: Arc<dyn Embedder>, index: Arc<dyn VectorIndex>) -> Self {
        Self::new(&EngineConfig::default(), Arc::new(NullOcr), embedder, index)
    }

    /// Keep boilerplate units (page numbers, bare numerals) instead of
    /// skipping them before chunking.
    pub fn keep_boilerplate(mut self) -> Self {
        self.skip_boilerplate = false;
        self
    }

    /// Swap in a different loader, e.g. one with extra extractors
    /// registered.
    pub fn with_loader(mut self, loader: UniversalLoader) -> Self {
        self.loader = loader;
        self
    }

    /// Ingest one file: stream its units, clean and chunk them
    /// concurrently in unit order, then embed and index the batch.
    ///
    /// Per-unit extraction failures land in the report's `failures`;
    /// only a missing file or a collaborator failure is an error.
    pub async fn ingest_file(&self, path: &Path) -> Result<IngestReport> {
        let stream = self.loader.load(path)?;
        let source_hash = hash_file(path).await?;

        let cleaner = self.cleaner.clone();
        let chunker = self.chunker.clone();
        let skip_boilerplate = self.skip_boilerplate;

        // Clean and chunk units concurrently; buffered() preserves
        // the original unit order in the output.
        let mut staged = stream
            .map(|unit| {
                let cleaner = cleaner.clone();
                let chunker = chunker.clone();
                async move {
                    let unit = match unit {
                        Ok(unit) => unit,
                        Err(e) => return Err(e),
                    };

                    let content_hash = blake3::hash(unit.content.as_bytes()).to_hex().to_string();
                    let cleaned = cleaner.process_unit(unit);

                    if skip_boilerplate && TextCleaner::is_boilerplate(&cleaned.content) {
                        return Ok(Vec::new());
                    }

                    let mut chunks = chunker.chunk(&cleaned);
                    for chunk in &mut chunks {
                        chunk
                            .metadata
                            .insert("content_hash".to_string(), json!(content_hash));
                    }
                    Ok(chunks)
                }
            })
            .buffered(self.max_workers);

        let mut report = IngestReport {
            chunks: Vec::new(),
            units_ok: 0,
            units_failed: 0,
            failures: Vec::new(),
            finished_at: chrono::Utc::now(),
        };

        while let Some(result) = staged.next().await {
            match result {
                Ok(mut chunks) => {
                    for chunk in &mut chunks {
                        chunk
                            .metadata
                            .insert("source_hash".to_string(), json!(source_hash));
                    }
                    report.units_ok += 1;
                    report.chunks.extend(chunks);
                }
                Err(e) => {
                    warn!("Unit failed for {}: {e}", path.display());
                    report.units_failed += 1;
                    report.failures.push(e.to_string());
                }
            }
        }

        self.store(&report.chunks).await?;

        report.finished_at = chrono::Utc::now();
        info!(
            "Ingested {}: {} chunks, {} units ok, {} failed",
            path.display(),
            report.chunks.len(),
            report.units_ok,
            report.units_failed
        );
        Ok(report)
    }

    /// Embed a chunk batch and upsert it into the index. Empty
    /// batches never touch the collaborators.
    async fn store(&self, chunks: &[Chunk]) -> Result<()> {
        if chunks.is_empty() {
            return Ok(());
        }

        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = self.embeddings.embed_batch(&texts).await?;
        self.index.upsert(chunks, &vectors).await
    }

    /// Embed a query string and rank indexed chunks against it.
    pub async fn search(&self, query: &str, limit: usize) -> Result<Vec<SearchHit>> {
        let vector = self.embeddings.embed(query).await?;
        self.index.search(&vector, limit).await
    }
}

/// Blake3 hash of the whole source file, computed off the runtime.
async fn hash_file(path: &Path) -> Result<String> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<String> {
        let mut hasher = blake3::Hasher::new();
        let mut file = std::fs::File::open(&path)?;
        std::io::copy(&mut file, &mut hasher)?;
        Ok(hasher.finalize().to_hex().to_string())
    })
    .await
    .map_err(|e| StrataError::internal(format!("hash task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embeddings::MockEmbedder;
    use crate::extract::{Extractor, UnitStream};
    use crate::index::MemoryIndex;
    use async_stream::stream;
    use std::io::Write;
    use strata_core::types::{ExtractionMode, ExtractionUnit, Modality, Position};

    /// First unit fails, second carries usable prose.
    struct HalfBrokenExtractor;

    impl Extractor for HalfBrokenExtractor {
        fn stream(&self, _path: &Path) -> UnitStream {
            Box::pin(stream! {
                yield Err(StrataError::extraction("page 1 unreadable"));
                yield Ok(ExtractionUnit::new(
                    "The second unit still carries enough prose to chunk.".to_string(),
                    Some(Position::Page(2)),
                    ExtractionMode::Digital,
                )
                .with_metadata("source", json!("doc.txt")));
            })
        }
    }

    #[tokio::test]
    async fn failed_units_are_reported_not_fatal() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"plain text body").unwrap();
        file.flush().unwrap();

        let mut loader = UniversalLoader::new(Arc::new(NullOcr), 50);
        loader.register(Modality::Text, Arc::new(HalfBrokenExtractor));

        let index = Arc::new(MemoryIndex::new());
        let pipeline =
            IngestPipeline::with_defaults(
                Arc::new(MockEmbedder::new(8)),
                Arc::clone(&index) as Arc<dyn VectorIndex>,
            )
                .with_loader(loader);

        let report = pipeline.ingest_file(file.path()).await.unwrap();

        assert_eq!(report.units_failed, 1);
        assert_eq!(report.units_ok, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].contains("page 1 unreadable"));

        // The good unit still produced indexed chunks
        assert!(!report.chunks.is_empty());
        assert_eq!(index.len(), report.chunks.len());
        assert!(report.chunks[0].chunk_id.starts_with("doc.txt_P2_S0"));
    }
}
