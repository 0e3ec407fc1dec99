//! Error types for the Strata pipeline.

use std::path::PathBuf;

/// Result type alias for Strata operations.
pub type Result<T> = std::result::Result<T, StrataError>;

/// Main error type for the Strata pipeline.
#[derive(Debug, thiserror::Error)]
pub enum StrataError {
    /// Input file does not exist. Fatal to the whole load.
    #[error("File not found: {path}")]
    NotFound { path: PathBuf },

    /// The detected modality has no registered extractor.
    ///
    /// The loader itself degrades to an empty stream instead of
    /// returning this; the variant exists for callers that want to
    /// surface the condition explicitly.
    #[error("Unsupported modality: {0}")]
    UnsupportedModality(String),

    /// Reading or interpreting the file signature failed.
    #[error("Detection error: {0}")]
    Detection(String),

    /// A single extraction unit could not be produced.
    ///
    /// Non-fatal: extractors report this per unit and continue with
    /// the remaining pages/segments.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// OCR engine failures
    #[error("OCR error: {0}")]
    Ocr(String),

    /// Embedding collaborator errors
    #[error("Embedding error: {0}")]
    Embedding(String),

    /// Vector index collaborator errors
    #[error("Index error: {0}")]
    Index(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic internal errors
    #[error("Internal error: {0}")]
    Internal(String),

    /// Wrapped anyhow errors for compatibility
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl StrataError {
    /// Create a new not found error
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound { path: path.into() }
    }

    /// Create a new unsupported modality error
    pub fn unsupported_modality(msg: impl Into<String>) -> Self {
        Self::UnsupportedModality(msg.into())
    }

    /// Create a new detection error
    pub fn detection(msg: impl Into<String>) -> Self {
        Self::Detection(msg.into())
    }

    /// Create a new extraction error
    pub fn extraction(msg: impl Into<String>) -> Self {
        Self::Extraction(msg.into())
    }

    /// Create a new OCR error
    pub fn ocr(msg: impl Into<String>) -> Self {
        Self::Ocr(msg.into())
    }

    /// Create a new embedding error
    pub fn embedding(msg: impl Into<String>) -> Self {
        Self::Embedding(msg.into())
    }

    /// Create a new index error
    pub fn index(msg: impl Into<String>) -> Self {
        Self::Index(msg.into())
    }

    /// Create a new config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// Create a new internal error
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Check if this is a not found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a per-unit extraction error
    pub fn is_extraction(&self) -> bool {
        matches!(self, Self::Extraction(_) | Self::Ocr(_))
    }
}
