//! PDF extraction with an adaptive digital-text-vs-OCR decision.
//!
//! Each page is first read through the document's digital text layer.
//! Pages whose stripped text falls below the configured threshold are
//! treated as scans and routed to the OCR engine instead; the unit's
//! mode records which path was taken.

use super::{Extractor, OcrEngine, UnitStream, source_name};
use async_stream::stream;
use lopdf::Document as PdfDocument;
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use strata_core::error::{Result, StrataError};
use strata_core::types::{ExtractionMode, ExtractionUnit, Position};
use tracing::{debug, info, warn};

/// Default character threshold below which a page counts as scanned.
pub const DEFAULT_OCR_TEXT_THRESHOLD: usize = 50;

/// Streams PDF pages as extraction units.
pub struct PdfExtractor {
    ocr: Arc<dyn OcrEngine>,
    ocr_text_threshold: usize,
}

impl PdfExtractor {
    /// Create an extractor with the default scan threshold.
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self {
            ocr,
            ocr_text_threshold: DEFAULT_OCR_TEXT_THRESHOLD,
        }
    }

    /// Override the scanned-page decision threshold.
    pub fn with_ocr_text_threshold(mut self, threshold: usize) -> Self {
        self.ocr_text_threshold = threshold;
        self
    }

    /// Whole-document extraction via `pdf-extract`, used when the
    /// page-level parser cannot load the file.
    async fn full_text_fallback(path: PathBuf, source: String) -> Result<ExtractionUnit> {
        let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path))
            .await
            .map_err(|e| StrataError::extraction(format!("PDF fallback task failed: {e}")))?
            .map_err(|e| {
                StrataError::extraction(format!("Failed to extract text from {source}: {e}"))
            })?;

        Ok(
            ExtractionUnit::new(text, None, ExtractionMode::Digital)
                .with_metadata("source", json!(source))
                .with_metadata("is_ocr", json!(false))
                .with_metadata("fallback", json!("pdf-extract")),
        )
    }
}

impl Extractor for PdfExtractor {
    fn stream(&self, path: &Path) -> UnitStream {
        let path = path.to_path_buf();
        let ocr = Arc::clone(&self.ocr);
        let threshold = self.ocr_text_threshold;

        Box::pin(stream! {
            let source = source_name(&path);

            let load_path = path.clone();
            let loaded = tokio::task::spawn_blocking(move || PdfDocument::load(&load_path)).await;
            let doc = match loaded {
                Ok(Ok(doc)) => doc,
                Ok(Err(e)) => {
                    warn!("Page-level PDF parse failed for {source}: {e}; falling back to full-document text");
                    yield Self::full_text_fallback(path, source).await;
                    return;
                }
                Err(e) => {
                    yield Err(StrataError::extraction(format!("PDF load task failed: {e}")));
                    return;
                }
            };

            let pages: Vec<u32> = doc.get_pages().keys().copied().collect();
            let total_pages = pages.len();
            info!("Processing PDF: {source} ({total_pages} pages)");

            for page_no in pages {
                let digital = match doc.extract_text(&[page_no]) {
                    Ok(text) => text,
                    Err(e) => {
                        // One bad page must not abort the rest of the
                        // document; report it and keep going.
                        yield Err(StrataError::extraction(format!(
                            "page {page_no} of {source}: {e}"
                        )));
                        continue;
                    }
                };

                let is_scanned = digital.trim().chars().count() < threshold;
                let (content, mode) = if is_scanned {
                    debug!("Page {page_no} of {source} seems scanned, running OCR");
                    match ocr.recognize_pdf_page(&path, page_no).await {
                        Ok(text) => (text, ExtractionMode::Ocr),
                        Err(e) => {
                            yield Err(StrataError::ocr(format!(
                                "OCR failed for page {page_no} of {source}: {e}"
                            )));
                            continue;
                        }
                    }
                } else {
                    (digital, ExtractionMode::Digital)
                };

                yield Ok(ExtractionUnit::new(content, Some(Position::Page(page_no)), mode)
                    .with_metadata("source", json!(source))
                    .with_metadata("total_pages", json!(total_pages))
                    .with_metadata("is_ocr", json!(is_scanned)));
            }
        })
    }
}
