//! Core types and abstractions for the Strata semantic ingestion pipeline.
//!
//! This crate provides the foundational types, traits, error handling
//! and configuration used across all Strata components.

pub mod config;
pub mod error;
pub mod traits;
pub mod types;

pub use config::{ChunkingConfig, EngineConfig};
pub use error::{Result, StrataError};
pub use traits::*;
pub use types::*;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::{ChunkingConfig, EngineConfig};
    pub use crate::error::{Result, StrataError};
    pub use crate::traits::*;
    pub use crate::types::*;
}
