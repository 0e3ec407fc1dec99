//! Document ingestion for the Strata semantic pipeline.
//!
//! Takes a file of any supported modality (PDF, image, audio, video)
//! and turns it into a hierarchy of cleaned, embedded chunks:
//!
//! 1. [`detector`] sniffs the modality from the content signature
//! 2. [`extract`] streams page/segment units per modality
//! 3. [`cleaner`] normalizes text without losing the original
//! 4. [`chunker`] builds the meso/micro chunk hierarchy
//! 5. [`pipeline`] embeds the batch and hands it to the vector index

pub mod chunker;
pub mod cleaner;
pub mod detector;
pub mod embeddings;
pub mod extract;
pub mod index;
pub mod loader;
pub mod pipeline;

pub use chunker::HierarchicalChunker;
pub use cleaner::TextCleaner;
pub use embeddings::{EmbeddingConfig, EmbeddingService, MockEmbedder};
pub use extract::{Extractor, NullOcr, OcrEngine, UnitStream};
pub use index::MemoryIndex;
pub use loader::UniversalLoader;
pub use pipeline::IngestPipeline;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::chunker::HierarchicalChunker;
    pub use crate::cleaner::TextCleaner;
    pub use crate::embeddings::{EmbeddingService, MockEmbedder};
    pub use crate::extract::{Extractor, NullOcr, OcrEngine, UnitStream};
    pub use crate::index::MemoryIndex;
    pub use crate::loader::UniversalLoader;
    pub use crate::pipeline::IngestPipeline;
    pub use strata_core::prelude::*;
}
