//! Persistence backends for the code→target mapping.
//!
//! A backend only knows how to load and save the whole mapping. Serializing read-modify-write
//! cycles is the job of [`crate::store::AliasStore`]; backends must merely guarantee that a
//! `save` is never observed half-written.

mod file;
mod memory;

pub use file::JsonFileBackend;
pub use memory::InMemoryBackend;

use crate::config::{Config, StorageBackend};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use thiserror::Error;

/// Full code→target mapping as loaded from or saved to a backend.
pub type AliasMap = BTreeMap<String, String>;

/// Errors raised while reading or writing persisted state.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Filesystem operation failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path involved in the failing operation.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// Persisted content exists but does not decode to a string→string object.
    #[error("stored mapping at {} is not a valid JSON object: {source}", path.display())]
    Corrupt {
        /// Path of the unreadable file.
        path: PathBuf,
        /// Decoder error.
        #[source]
        source: serde_json::Error,
    },
    /// Mapping could not be encoded for storage.
    #[error("failed to serialize mapping: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Load/save contract implemented by every persistence backend.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Read the full mapping. A backend that has never been written yields an empty mapping.
    async fn load(&self) -> Result<AliasMap, BackendError>;

    /// Replace the persisted mapping with `links`.
    async fn save(&self, links: &AliasMap) -> Result<(), BackendError>;

    /// Human-readable description used in logs and health payloads.
    fn describe(&self) -> String;
}

/// Build the backend selected by the configuration.
pub fn backend_from_config(config: &Config) -> Box<dyn Backend> {
    match config.storage_backend {
        StorageBackend::File => Box::new(JsonFileBackend::new(config.links_data_path.clone())),
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; links are lost on restart");
            Box::new(InMemoryBackend::new())
        }
    }
}
