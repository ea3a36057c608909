//! Hook persistence behind a uniform store interface.

pub mod memory;
pub mod sled_store;

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use conhook_common::types::hook::Hook;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("hook not found")]
    NotFound,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[async_trait]
pub trait HookStore: Send + Sync {
    async fn get_by_id(&self, id: &str) -> Result<Hook, StorageError>;

    async fn get_all(&self) -> Result<Vec<Hook>, StorageError>;

    /// Upserts the hook. A hook arriving without an id gets one assigned;
    /// the stored copy is returned either way.
    async fn store(&self, hook: Hook) -> Result<Hook, StorageError>;

    async fn delete(&self, id: &str) -> Result<(), StorageError>;
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Memory,
    Sled,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    /// Filesystem path for file-backed backends; ignored by `memory`.
    #[serde(default)]
    pub path: Option<String>,
}

/// Builds the configured store. This is the whole backend registry: an
/// explicit constructor selected at startup, passed down by injection.
pub fn connect(config: &StorageConfig) -> anyhow::Result<Arc<dyn HookStore>> {
    match config.backend {
        StorageBackend::Memory => Ok(Arc::new(memory::MemoryStore::new())),
        StorageBackend::Sled => {
            let path = config
                .path
                .as_deref()
                .ok_or_else(|| anyhow::anyhow!("sled backend requires storage.path"))?;
            Ok(Arc::new(sled_store::SledStore::open(path)?))
        }
    }
}
