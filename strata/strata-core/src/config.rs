//! Configuration surface consumed by the pipeline.
//!
//! Values load from an optional TOML file and can be overridden per
//! field with `STRATA_*` environment variables. Only the chunking
//! thresholds, the OCR decision threshold and the worker bound affect
//! core behavior.

use crate::error::{Result, StrataError};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

// Environment variable names
pub const ENV_CHUNK_MICRO: &str = "STRATA_CHUNK_MICRO";
pub const ENV_CHUNK_MESO: &str = "STRATA_CHUNK_MESO";
pub const ENV_CHUNK_MACRO: &str = "STRATA_CHUNK_MACRO";
pub const ENV_CHUNK_OVERLAP: &str = "STRATA_CHUNK_OVERLAP";
pub const ENV_MAX_WORKERS: &str = "STRATA_MAX_WORKERS";
pub const ENV_OCR_TEXT_THRESHOLD: &str = "STRATA_OCR_TEXT_THRESHOLD";
pub const ENV_EMBEDDING_MODEL: &str = "STRATA_EMBEDDING_MODEL";

/// Size thresholds for the chunk hierarchy, in characters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ChunkingConfig {
    /// Meso-to-micro split threshold
    pub micro_size: usize,
    /// Section split threshold
    pub meso_size: usize,
    /// Summary-level threshold. Defined for forward compatibility;
    /// the chunker does not emit a macro level yet.
    pub macro_size: usize,
    /// Shared context between adjacent hard-sliced parts
    pub overlap: usize,
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            micro_size: 500,
            meso_size: 2000,
            macro_size: 10_000,
            overlap: 100,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EngineConfig {
    pub chunking: ChunkingConfig,
    /// Maximum concurrent units in the clean/chunk stage
    pub max_workers: usize,
    /// Pages whose digital text strips to fewer characters than this
    /// are treated as scanned and routed to OCR
    pub ocr_text_threshold: usize,
    /// Model identifier forwarded to the embedding collaborator
    pub embedding_model: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            chunking: ChunkingConfig::default(),
            max_workers: 4,
            ocr_text_threshold: 50,
            embedding_model: "all-MiniLM-L6-v2".to_string(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from a TOML file, then apply environment
    /// overrides and validate.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&raw)
            .map_err(|e| StrataError::config(format!("Failed to parse {}: {e}", path.display())))?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Default configuration with environment overrides applied.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn apply_env_overrides(&mut self) {
        if let Some(v) = env_usize(ENV_CHUNK_MICRO) {
            self.chunking.micro_size = v;
        }
        if let Some(v) = env_usize(ENV_CHUNK_MESO) {
            self.chunking.meso_size = v;
        }
        if let Some(v) = env_usize(ENV_CHUNK_MACRO) {
            self.chunking.macro_size = v;
        }
        if let Some(v) = env_usize(ENV_CHUNK_OVERLAP) {
            self.chunking.overlap = v;
        }
        if let Some(v) = env_usize(ENV_MAX_WORKERS) {
            self.max_workers = v;
        }
        if let Some(v) = env_usize(ENV_OCR_TEXT_THRESHOLD) {
            self.ocr_text_threshold = v;
        }
        if let Ok(v) = std::env::var(ENV_EMBEDDING_MODEL) {
            if !v.is_empty() {
                self.embedding_model = v;
            }
        }
        debug!(?self, "Engine configuration resolved");
    }

    /// Reject configurations the chunker cannot honor.
    pub fn validate(&self) -> Result<()> {
        let c = &self.chunking;
        if c.micro_size == 0 || c.meso_size == 0 {
            return Err(StrataError::config("chunk sizes must be positive"));
        }
        if c.micro_size >= c.meso_size {
            return Err(StrataError::config(format!(
                "micro_size ({}) must be smaller than meso_size ({})",
                c.micro_size, c.meso_size
            )));
        }
        if c.overlap >= c.micro_size {
            return Err(StrataError::config(format!(
                "overlap ({}) must be smaller than micro_size ({})",
                c.overlap, c.micro_size
            )));
        }
        if self.max_workers == 0 {
            return Err(StrataError::config("max_workers must be at least 1"));
        }
        Ok(())
    }
}

fn env_usize(name: &str) -> Option<usize> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
