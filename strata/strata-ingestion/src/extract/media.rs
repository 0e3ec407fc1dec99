//! Audio/video extraction.
//!
//! Transcription is not implemented; this extractor is the seam for a
//! future ASR engine. It emits exactly one placeholder unit tagged
//! `ASR` at timestamp zero so downstream stages exercise the full
//! path without a speech model.

use super::{Extractor, UnitStream, source_name};
use async_stream::stream;
use serde_json::json;
use std::path::Path;
use strata_core::types::{ExtractionMode, ExtractionUnit, Position};
use tracing::info;

/// Stub extractor for audio and video files.
#[derive(Debug, Default, Clone)]
pub struct MediaExtractor;

impl MediaExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Extractor for MediaExtractor {
    fn stream(&self, path: &Path) -> UnitStream {
        let path = path.to_path_buf();

        Box::pin(stream! {
            let source = source_name(&path);
            info!("Processing media: {source}");

            let text = format!("[TRANSCRIPT PLACEHOLDER FOR {source}]");
            yield Ok(
                ExtractionUnit::new(text, Some(Position::Timestamp(0.0)), ExtractionMode::Asr)
                    .with_metadata("source", json!(source))
                    .with_metadata("model", json!("whisper-base (planned)")),
            );
        })
    }
}
