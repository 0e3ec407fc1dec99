//! Modality extractors.
//!
//! Each extractor converts a file into a lazy, finite stream of
//! [`ExtractionUnit`]s. Streams are single-pass: consuming one does
//! not rewind, and a second pass means calling [`Extractor::stream`]
//! again. Per-file resources (parsed documents) live inside the
//! stream and are released when it ends or is dropped early.
//!
//! A failed page or segment surfaces as an `Err` item; the stream
//! continues with the remaining units instead of aborting the whole
//! document.

use futures::stream::BoxStream;
use std::path::Path;
use strata_core::error::Result;
use strata_core::types::ExtractionUnit;

pub mod image;
pub mod media;
pub mod ocr;
pub mod pdf;

pub use image::ImageExtractor;
pub use media::MediaExtractor;
pub use ocr::{NullOcr, OcrEngine};
pub use pdf::PdfExtractor;

/// Lazy sequence of extraction units with per-unit failure results.
pub type UnitStream = BoxStream<'static, Result<ExtractionUnit>>;

/// Common capability of all modality extractors.
pub trait Extractor: Send + Sync {
    /// Stream extraction units for the file at `path`.
    ///
    /// The returned stream is finite, produced incrementally, and not
    /// restartable; callers may stop consuming at any point.
    fn stream(&self, path: &Path) -> UnitStream;
}

/// File name component used as the `source` metadata value.
pub(crate) fn source_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
