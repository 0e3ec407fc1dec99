//! Core types flowing through the extraction-and-chunking pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Coarse type of an input file, detected from its content signature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modality {
    Pdf,
    Image,
    Audio,
    Video,
    Text,
    Unknown,
}

impl fmt::Display for Modality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pdf => "pdf",
            Self::Image => "image",
            Self::Audio => "audio",
            Self::Video => "video",
            Self::Text => "text",
            Self::Unknown => "unknown",
        };
        write!(f, "{s}")
    }
}

/// How the content of an extraction unit was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ExtractionMode {
    /// Digital text layer of the document
    Digital,
    /// Optical character recognition over a rendered page or image
    Ocr,
    /// Automatic speech recognition over audio/video
    Asr,
}

impl fmt::Display for ExtractionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Digital => "DIGITAL",
            Self::Ocr => "OCR",
            Self::Asr => "ASR",
        };
        write!(f, "{s}")
    }
}

/// Modality-dependent locator for an extraction unit.
///
/// Exactly one variant applies per unit; single-unit modalities
/// (images) carry no position at all.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Position {
    /// 1-based page number in a paged document
    Page(u32),
    /// Timestamp in seconds for audio/video segments
    Timestamp(f64),
}

impl Position {
    /// Deterministic label used when deriving chunk ids.
    pub fn label(position: Option<Position>) -> String {
        match position {
            Some(Position::Page(n)) => format!("P{n}"),
            Some(Position::Timestamp(ts)) => format!("T{ts}"),
            // Single-unit modalities behave as one logical page.
            None => "P0".to_string(),
        }
    }
}

/// One page or segment emitted by an extractor while streaming a file.
///
/// Immutable once yielded; consumed exactly once by the cleaner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionUnit {
    /// Raw extracted text (may be empty)
    pub content: String,
    /// Page number or timestamp, when the modality has one
    pub position: Option<Position>,
    /// How the content was obtained
    pub mode: ExtractionMode,
    /// Source filename plus modality-specific flags (`is_ocr`, ...)
    pub metadata: HashMap<String, serde_json::Value>,
}

impl ExtractionUnit {
    /// Create a unit with empty metadata
    pub fn new(content: String, position: Option<Position>, mode: ExtractionMode) -> Self {
        Self {
            content,
            position,
            mode,
            metadata: HashMap::new(),
        }
    }

    /// Add a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    /// Source filename recorded by the extractor, if any
    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").and_then(|v| v.as_str())
    }
}

/// An extraction unit after cleaning.
///
/// `content_original` is always the verbatim pre-clean text
/// (Detail-Preservation Rule) and is never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CleanedUnit {
    /// Verbatim copy of the pre-clean content
    pub content_original: String,
    /// Cleaned text
    pub content: String,
    /// `chars(original) - chars(cleaned)`; negative when cleaning
    /// lengthens the text (e.g. Unicode expansion)
    pub char_reduction: i64,
    /// Carried over from the extraction unit
    pub position: Option<Position>,
    /// Carried over from the extraction unit
    pub mode: ExtractionMode,
    /// Inherited metadata plus cleaning flags
    pub metadata: HashMap<String, serde_json::Value>,
}

impl CleanedUnit {
    /// Source filename inherited from the extraction unit, if any
    pub fn source(&self) -> Option<&str> {
        self.metadata.get("source").and_then(|v| v.as_str())
    }
}

/// Level of a chunk in the output hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkLevel {
    /// Embedding-sized chunk nested under a meso chunk
    Micro,
    /// Section-sized chunk used for contextual reasoning
    Meso,
}

impl fmt::Display for ChunkLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Micro => "micro",
            Self::Meso => "meso",
        };
        write!(f, "{s}")
    }
}

/// A node in the chunk hierarchy produced from one cleaned unit.
///
/// Invariants: `chunk_id` is unique within a batch and deterministic
/// across runs on identical input; every micro chunk's `parent_id`
/// references a meso chunk emitted earlier in the same batch.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Deterministic id derived from source name, position and index
    pub chunk_id: String,
    pub content: String,
    pub level: ChunkLevel,
    /// Owning meso chunk for micro chunks; `None` for meso chunks
    pub parent_id: Option<String>,
    /// Inherited unit metadata; micro chunks also carry `parent_id`
    pub metadata: HashMap<String, serde_json::Value>,
}

/// One ranked result from the vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchHit {
    pub score: f32,
    pub content: String,
    pub metadata: HashMap<String, serde_json::Value>,
}

/// Outcome of processing one file through the pipeline.
///
/// Unit-level failures are aggregated here instead of aborting the
/// run; a unit that failed to extract contributes no chunks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    /// All chunks in original unit order, parents before children
    pub chunks: Vec<Chunk>,
    /// Units that extracted, cleaned and chunked successfully
    pub units_ok: usize,
    /// Units that failed to extract
    pub units_failed: usize,
    /// Human-readable reasons for each failed unit
    pub failures: Vec<String>,
    pub finished_at: DateTime<Utc>,
}

impl IngestReport {
    /// Chunks at a given hierarchy level
    pub fn at_level(&self, level: ChunkLevel) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter().filter(move |c| c.level == level)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_labels_are_deterministic() {
        assert_eq!(Position::label(Some(Position::Page(3))), "P3");
        assert_eq!(Position::label(Some(Position::Timestamp(0.0))), "T0");
        assert_eq!(Position::label(None), "P0");
    }

    #[test]
    fn extraction_unit_source() {
        let unit = ExtractionUnit::new("x".into(), None, ExtractionMode::Ocr)
            .with_metadata("source", serde_json::json!("scan.png"));
        assert_eq!(unit.source(), Some("scan.png"));
    }

    #[test]
    fn modality_serde_is_lowercase() {
        let json = serde_json::to_string(&Modality::Pdf).unwrap();
        assert_eq!(json, "\"pdf\"");
    }
}
