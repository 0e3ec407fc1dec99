//! Universal loader composing the detector and modality extractors.

use crate::detector;
use crate::extract::{
    Extractor, ImageExtractor, MediaExtractor, OcrEngine, PdfExtractor, UnitStream,
};
use futures::stream;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use strata_core::error::{Result, StrataError};
use strata_core::types::Modality;
use tracing::{info, warn};

/// Single entry point for streaming any supported file.
///
/// Detects the modality from the file's content signature and
/// delegates to the matching extractor. Modalities without a
/// registered extractor yield an empty stream and a warning; only a
/// missing file is an error.
pub struct UniversalLoader {
    extractors: HashMap<Modality, Arc<dyn Extractor>>,
}

impl UniversalLoader {
    /// Build a loader with the default extractor registry.
    ///
    /// Text has no extractor yet; plain-text files are a graceful
    /// no-op until one is registered.
    pub fn new(ocr: Arc<dyn OcrEngine>, ocr_text_threshold: usize) -> Self {
        let media: Arc<dyn Extractor> = Arc::new(MediaExtractor::new());
        let mut extractors: HashMap<Modality, Arc<dyn Extractor>> = HashMap::new();
        extractors.insert(
            Modality::Pdf,
            Arc::new(PdfExtractor::new(Arc::clone(&ocr)).with_ocr_text_threshold(ocr_text_threshold)),
        );
        extractors.insert(Modality::Image, Arc::new(ImageExtractor::new(ocr)));
        extractors.insert(Modality::Audio, Arc::clone(&media));
        extractors.insert(Modality::Video, media);
        Self { extractors }
    }

    /// Register or replace the extractor for a modality.
    pub fn register(&mut self, modality: Modality, extractor: Arc<dyn Extractor>) {
        self.extractors.insert(modality, extractor);
    }

    /// Detect the file's modality and stream its extraction units.
    ///
    /// Fails fast with `NotFound` before any extractor is invoked.
    pub fn load(&self, path: &Path) -> Result<UnitStream> {
        if !path.exists() {
            return Err(StrataError::not_found(path));
        }

        let modality = detector::detect(path);
        info!("Loading {} as {modality}", path.display());

        match self.extractors.get(&modality) {
            Some(extractor) => Ok(extractor.stream(path)),
            None => {
                warn!("No extractor for {modality}, skipping {}", path.display());
                Ok(Box::pin(stream::empty()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::NullOcr;
    use futures::StreamExt;
    use std::io::Write;

    fn loader() -> UniversalLoader {
        UniversalLoader::new(Arc::new(NullOcr), 50)
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let err = match loader().load(Path::new("/does/not/exist.pdf")) {
            Ok(_) => panic!("expected an error for a missing file"),
            Err(e) => e,
        };
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn unsupported_signature_yields_empty_stream() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(&[0x00, 0xDE, 0xAD, 0xBE, 0xEF]).unwrap();
        file.flush().unwrap();

        let stream = loader().load(file.path()).unwrap();
        let units: Vec<_> = stream.collect().await;
        assert!(units.is_empty());
    }

    #[tokio::test]
    async fn text_file_has_no_extractor_yet() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"plain prose, no extractor registered")
            .unwrap();
        file.flush().unwrap();

        let stream = loader().load(file.path()).unwrap();
        let units: Vec<_> = stream.collect().await;
        assert!(units.is_empty());
    }

    #[tokio::test]
    async fn audio_signature_routes_to_media_stub() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        // ID3v2 header marks the file as MP3
        file.write_all(&[0x49, 0x44, 0x33, 0x04, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00])
            .unwrap();
        file.flush().unwrap();

        let stream = loader().load(file.path()).unwrap();
        let units: Vec<_> = stream.collect().await;
        assert_eq!(units.len(), 1);
        assert_eq!(
            units[0].as_ref().unwrap().mode,
            strata_core::types::ExtractionMode::Asr
        );
    }
}
