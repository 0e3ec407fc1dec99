//! Image extraction: one OCR pass over the whole picture.

use super::{Extractor, OcrEngine, UnitStream, source_name};
use async_stream::stream;
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use strata_core::error::StrataError;
use strata_core::types::{ExtractionMode, ExtractionUnit};
use tracing::info;

/// Single-unit extractor for standalone images.
pub struct ImageExtractor {
    ocr: Arc<dyn OcrEngine>,
}

impl ImageExtractor {
    pub fn new(ocr: Arc<dyn OcrEngine>) -> Self {
        Self { ocr }
    }
}

impl Extractor for ImageExtractor {
    fn stream(&self, path: &Path) -> UnitStream {
        let path = path.to_path_buf();
        let ocr = Arc::clone(&self.ocr);

        Box::pin(stream! {
            let source = source_name(&path);
            info!("Processing image: {source}");

            match ocr.recognize_image(&path).await {
                Ok(text) => {
                    // Images are a single logical page; position stays unset.
                    yield Ok(ExtractionUnit::new(text, None, ExtractionMode::Ocr)
                        .with_metadata("source", json!(source))
                        .with_metadata("is_ocr", json!(true))
                        .with_metadata("type", json!("image")));
                }
                Err(e) => {
                    yield Err(StrataError::ocr(format!("OCR failed for {source}: {e}")));
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use futures::StreamExt;
    use strata_core::error::Result;

    struct FixedOcr(&'static str);

    #[async_trait]
    impl OcrEngine for FixedOcr {
        async fn recognize_pdf_page(&self, _path: &Path, _page: u32) -> Result<String> {
            Ok(self.0.to_string())
        }

        async fn recognize_image(&self, _path: &Path) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    #[tokio::test]
    async fn yields_exactly_one_ocr_unit() {
        let extractor = ImageExtractor::new(Arc::new(FixedOcr("text in the picture")));
        let units: Vec<_> = extractor.stream(Path::new("photo.png")).collect().await;

        assert_eq!(units.len(), 1);
        let unit = units[0].as_ref().unwrap();
        assert_eq!(unit.mode, ExtractionMode::Ocr);
        assert_eq!(unit.position, None);
        assert_eq!(unit.content, "text in the picture");
        assert_eq!(unit.source(), Some("photo.png"));
    }
}
