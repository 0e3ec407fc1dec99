//! Hierarchical chunking of cleaned units.
//!
//! One cleaned unit (usually a page) becomes a two-level hierarchy:
//! section-sized meso chunks for contextual reasoning, each followed
//! by its embedding-sized micro children. Splitting is recursive over
//! a separator priority list with a deterministic hard-slice
//! fallback, so identical input always yields identical chunks and
//! ids.

use serde_json::json;
use strata_core::config::ChunkingConfig;
use strata_core::types::{Chunk, ChunkLevel, CleanedUnit, Position};

/// Separator priority for the section-level (meso) pass.
const MESO_SEPARATORS: [&str; 3] = ["\n\n", "\n", ". "];
/// Separator priority for the embedding-level (micro) pass.
const MICRO_SEPARATORS: [&str; 3] = [". ", ", ", " "];

/// Parts may exceed the target by up to this ratio before a separator
/// is rejected (numerator/denominator of 1.5).
const OVERFLOW_NUM: usize = 3;
const OVERFLOW_DEN: usize = 2;

/// Splits one cleaned unit into meso chunks with nested micro chunks.
///
/// The macro ("summary") level is configured but intentionally not
/// produced here; see `ChunkingConfig::macro_size`.
#[derive(Debug, Clone)]
pub struct HierarchicalChunker {
    micro_size: usize,
    meso_size: usize,
    overlap: usize,
}

impl HierarchicalChunker {
    pub fn new(micro_size: usize, meso_size: usize, overlap: usize) -> Self {
        Self {
            micro_size,
            meso_size,
            overlap,
        }
    }

    pub fn from_config(config: &ChunkingConfig) -> Self {
        Self::new(config.micro_size, config.meso_size, config.overlap)
    }

    /// Default thresholds: 500-char micro, 2000-char meso, 100 overlap.
    pub fn default_config() -> Self {
        Self::from_config(&ChunkingConfig::default())
    }

    /// Break one cleaned unit into an ordered chunk sequence, each
    /// meso chunk immediately followed by its micro children.
    ///
    /// Ids derive from the source name, unit position and per-level
    /// indices, so repeated runs over the same input reproduce the
    /// same ids. Empty content chunks to an empty sequence.
    pub fn chunk(&self, unit: &CleanedUnit) -> Vec<Chunk> {
        let text = &unit.content;
        if text.trim().is_empty() {
            return Vec::new();
        }

        let source = unit.source().unwrap_or("unknown").to_string();
        let pos = Position::label(unit.position);

        let mut chunks = Vec::new();
        let sections = self.split(text, self.meso_size, &MESO_SEPARATORS);

        for (sec_idx, section) in sections.iter().enumerate() {
            let meso_id = format!("{source}_{pos}_S{sec_idx}");

            chunks.push(Chunk {
                chunk_id: meso_id.clone(),
                content: section.clone(),
                level: ChunkLevel::Meso,
                parent_id: None,
                metadata: unit.metadata.clone(),
            });

            let micros = self.split(section, self.micro_size, &MICRO_SEPARATORS);
            for (mic_idx, micro) in micros.iter().enumerate() {
                let mut metadata = unit.metadata.clone();
                metadata.insert("parent_id".to_string(), json!(meso_id));

                chunks.push(Chunk {
                    chunk_id: format!("{meso_id}_M{mic_idx}"),
                    content: micro.clone(),
                    level: ChunkLevel::Micro,
                    parent_id: Some(meso_id.clone()),
                    metadata,
                });
            }
        }

        chunks
    }

    /// Recursive separator splitting with bounded overflow.
    ///
    /// Separators are tried in priority order; pieces are greedily
    /// re-accumulated up to `max_size`, re-appending the separator to
    /// each piece except for the structural `"\n\n"`/`"\n"`
    /// separators. The first separator whose parts all stay within
    /// 1.5x `max_size` wins; otherwise fixed-width slicing with
    /// `overlap` shared characters guarantees parts of at most
    /// `max_size`. All sizes are measured in chars.
    pub fn split(&self, text: &str, max_size: usize, separators: &[&str]) -> Vec<String> {
        if text.chars().count() <= max_size {
            return vec![text.to_string()];
        }

        let bound = max_size * OVERFLOW_NUM / OVERFLOW_DEN;

        for sep in separators {
            let structural = matches!(*sep, "\n\n" | "\n");
            let mut parts: Vec<String> = Vec::new();
            let mut current = String::new();
            let mut current_len = 0usize;

            for piece in text.split(sep) {
                let mut piece = piece.to_string();
                if !structural {
                    piece.push_str(sep);
                }
                let piece_len = piece.chars().count();

                if current_len + piece_len < max_size {
                    current.push_str(&piece);
                    current_len += piece_len;
                } else {
                    if !current.is_empty() {
                        parts.push(current);
                    }
                    current = piece;
                    current_len = piece_len;
                }
            }
            if !current.is_empty() {
                parts.push(current);
            }

            if parts.iter().all(|p| p.chars().count() <= bound) {
                return parts;
            }
        }

        self.hard_slice(text, max_size)
    }

    /// Deterministic fallback: windows of `max_size` chars advancing
    /// by `max_size - overlap`, adjacent windows sharing context.
    fn hard_slice(&self, text: &str, max_size: usize) -> Vec<String> {
        let chars: Vec<char> = text.chars().collect();
        let step = max_size.saturating_sub(self.overlap).max(1);

        let mut parts = Vec::new();
        let mut start = 0;
        while start < chars.len() {
            let end = (start + max_size).min(chars.len());
            parts.push(chars[start..end].iter().collect());
            start += step;
        }
        parts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::collections::HashSet;
    use strata_core::types::ExtractionMode;

    fn unit(content: &str, page: u32) -> CleanedUnit {
        let mut metadata = HashMap::new();
        metadata.insert("source".to_string(), json!("doc.pdf"));
        CleanedUnit {
            content_original: content.to_string(),
            content: content.to_string(),
            char_reduction: 0,
            position: Some(Position::Page(page)),
            mode: ExtractionMode::Digital,
            metadata,
        }
    }

    fn long_prose(sentences: usize) -> String {
        (0..sentences)
            .map(|i| format!("Sentence number {i} talks about one small idea at a time. "))
            .collect::<Vec<_>>()
            .join("")
    }

    /// Whitespace-insensitive view, also dropping the trailing
    /// separator the splitter re-appends to the final piece.
    fn normalized(text: &str) -> String {
        let squeezed: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        squeezed.trim_end_matches(['.', ',']).to_string()
    }

    #[test]
    fn short_text_yields_one_meso_and_one_micro() {
        let chunker = HierarchicalChunker::new(500, 2000, 100);
        let chunks = chunker.chunk(&unit("Hello world.", 1));

        assert_eq!(chunks.len(), 2);
        assert_eq!(chunks[0].level, ChunkLevel::Meso);
        assert_eq!(chunks[0].content, "Hello world.");
        assert_eq!(chunks[0].chunk_id, "doc.pdf_P1_S0");
        assert_eq!(chunks[0].parent_id, None);

        assert_eq!(chunks[1].level, ChunkLevel::Micro);
        assert_eq!(chunks[1].content, "Hello world.");
        assert_eq!(chunks[1].chunk_id, "doc.pdf_P1_S0_M0");
        assert_eq!(chunks[1].parent_id.as_deref(), Some("doc.pdf_P1_S0"));
        assert_eq!(chunks[1].metadata["parent_id"], json!("doc.pdf_P1_S0"));
    }

    #[test]
    fn empty_content_chunks_to_nothing() {
        let chunker = HierarchicalChunker::default_config();
        assert!(chunker.chunk(&unit("", 1)).is_empty());
        assert!(chunker.chunk(&unit("   \n ", 1)).is_empty());
    }

    #[test]
    fn split_respects_overflow_bound() {
        let chunker = HierarchicalChunker::new(100, 400, 50);
        let text = long_prose(40);

        let parts = chunker.split(&text, 400, &MESO_SEPARATORS);
        assert!(parts.len() > 1);
        for part in &parts {
            assert!(
                part.chars().count() <= 600,
                "part exceeds 1.5x bound: {}",
                part.chars().count()
            );
        }
    }

    #[test]
    fn hard_slice_fallback_bounds_and_overlap() {
        let chunker = HierarchicalChunker::new(500, 2000, 100);
        // No separator occurs anywhere, so every candidate fails the
        // bound and fixed-width slicing takes over.
        let text = "a".repeat(1200);

        let parts = chunker.split(&text, 500, &MICRO_SEPARATORS);
        assert_eq!(parts.len(), 3);
        for part in &parts {
            assert!(part.chars().count() <= 500);
        }

        // Adjacent windows share exactly `overlap` characters
        let first: Vec<char> = parts[0].chars().collect();
        let second: Vec<char> = parts[1].chars().collect();
        assert_eq!(&first[400..], &second[..100]);
    }

    #[test]
    fn hard_slice_distinct_content_overlap() {
        let chunker = HierarchicalChunker::new(500, 2000, 4);
        let text = "abcdefghijklmnopqrst".to_string(); // 20 chars, no separators

        let parts = chunker.split(&text, 10, &["@"]);
        assert_eq!(parts, vec!["abcdefghij", "ghijklmnop", "mnopqrst", "st"]);
    }

    #[test]
    fn hierarchy_integrity_and_reconstruction() {
        let chunker = HierarchicalChunker::new(120, 500, 20);
        let text = format!(
            "{}\n\n{}\n\n{}",
            long_prose(12),
            long_prose(10),
            long_prose(8)
        );
        let chunks = chunker.chunk(&unit(&text, 2));

        let meso_ids: HashSet<&str> = chunks
            .iter()
            .filter(|c| c.level == ChunkLevel::Meso)
            .map(|c| c.chunk_id.as_str())
            .collect();
        assert!(!meso_ids.is_empty());

        // Every micro parent resolves to a meso emitted earlier
        let mut seen = HashSet::new();
        for chunk in &chunks {
            match chunk.level {
                ChunkLevel::Meso => {
                    seen.insert(chunk.chunk_id.as_str());
                }
                ChunkLevel::Micro => {
                    let parent = chunk.parent_id.as_deref().expect("micro without parent");
                    assert!(seen.contains(parent), "parent {parent} not emitted yet");
                }
            }
        }

        // Micro children reconstruct their meso chunk
        for meso in chunks.iter().filter(|c| c.level == ChunkLevel::Meso) {
            let rebuilt: String = chunks
                .iter()
                .filter(|c| c.parent_id.as_deref() == Some(meso.chunk_id.as_str()))
                .map(|c| c.content.as_str())
                .collect();
            assert_eq!(normalized(&rebuilt), normalized(&meso.content));
        }
    }

    #[test]
    fn chunk_ids_are_unique_and_deterministic() {
        let chunker = HierarchicalChunker::new(80, 300, 10);
        let text = long_prose(25);
        let first = chunker.chunk(&unit(&text, 7));
        let second = chunker.chunk(&unit(&text, 7));

        assert_eq!(first, second);

        let ids: HashSet<&str> = first.iter().map(|c| c.chunk_id.as_str()).collect();
        assert_eq!(ids.len(), first.len(), "duplicate chunk ids in batch");
        assert!(first[0].chunk_id.starts_with("doc.pdf_P7_S0"));
    }

    #[test]
    fn timestamp_position_feeds_chunk_ids() {
        let chunker = HierarchicalChunker::default_config();
        let mut u = unit("A short transcript.", 1);
        u.position = Some(Position::Timestamp(0.0));
        let chunks = chunker.chunk(&u);
        assert_eq!(chunks[0].chunk_id, "doc.pdf_T0_S0");
    }
}
