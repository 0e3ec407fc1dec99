//! OCR engine seam.
//!
//! Engine selection (Tesseract, a hosted API, ...) is an environment
//! concern; the pipeline only depends on this trait. OCR calls are
//! the dominant latency cost and carry no cross-call shared state, so
//! implementations are safe to invoke concurrently across pages.

use async_trait::async_trait;
use std::path::Path;
use strata_core::error::Result;
use tracing::warn;

/// Transcribes rendered pages and standalone images to text.
#[async_trait]
pub trait OcrEngine: Send + Sync {
    /// Render the given 1-based PDF page to an image and transcribe it.
    async fn recognize_pdf_page(&self, path: &Path, page: u32) -> Result<String>;

    /// Transcribe a standalone image file.
    async fn recognize_image(&self, path: &Path) -> Result<String>;
}

/// Stand-in engine used when no OCR backend is wired up.
///
/// Returns empty text so scanned pages degrade to empty units rather
/// than failing the stream.
#[derive(Debug, Default, Clone)]
pub struct NullOcr;

#[async_trait]
impl OcrEngine for NullOcr {
    async fn recognize_pdf_page(&self, path: &Path, page: u32) -> Result<String> {
        warn!(
            "No OCR engine configured; page {page} of {} yields empty text",
            path.display()
        );
        Ok(String::new())
    }

    async fn recognize_image(&self, path: &Path) -> Result<String> {
        warn!(
            "No OCR engine configured; image {} yields empty text",
            path.display()
        );
        Ok(String::new())
    }
}
