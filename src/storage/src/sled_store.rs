use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;

use conhook_common::types::hook::{generate_id, Hook};

use crate::{HookStore, StorageError};

/// File-backed store over an embedded sled tree; hooks survive daemon
/// restarts. Values are JSON-encoded hooks keyed by id.
pub struct SledStore {
    tree: sled::Db,
}

impl SledStore {
    pub fn open(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let tree = sled::open(path.as_ref())
            .with_context(|| format!("failed to open hook database at {:?}", path.as_ref()))?;
        Ok(SledStore { tree })
    }

    fn decode(bytes: &[u8]) -> Result<Hook, StorageError> {
        serde_json::from_slice(bytes)
            .context("corrupt hook record")
            .map_err(StorageError::Backend)
    }
}

#[async_trait]
impl HookStore for SledStore {
    async fn get_by_id(&self, id: &str) -> Result<Hook, StorageError> {
        let value = self
            .tree
            .get(id)
            .context("hook lookup failed")?
            .ok_or(StorageError::NotFound)?;
        Self::decode(&value)
    }

    async fn get_all(&self) -> Result<Vec<Hook>, StorageError> {
        let mut hooks = Vec::new();
        for entry in self.tree.iter() {
            let (_, value) = entry.context("hook scan failed")?;
            hooks.push(Self::decode(&value)?);
        }

        Ok(hooks)
    }

    async fn store(&self, mut hook: Hook) -> Result<Hook, StorageError> {
        if hook.id.is_empty() {
            hook.id = generate_id();
        }

        let encoded = serde_json::to_vec(&hook)
            .context("failed to encode hook")
            .map_err(StorageError::Backend)?;
        self.tree
            .insert(hook.id.as_bytes(), encoded)
            .context("failed to write hook")?;
        self.tree.flush_async().await.context("failed to flush")?;
        Ok(hook)
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let removed = self.tree.remove(id).context("failed to delete hook")?;
        if removed.is_none() {
            return Err(StorageError::NotFound);
        }

        self.tree.flush_async().await.context("failed to flush")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn hook(id: &str, name: &str) -> Hook {
        Hook {
            id: id.to_string(),
            name: name.to_string(),
            url: "http://example.net/hook".to_string(),
            events: Default::default(),
            criteria: Default::default(),
            ttl: -1,
            created: 0,
            format: Default::default(),
        }
    }

    #[tokio::test]
    async fn hooks_survive_reopen() {
        let dir = TempDir::new().unwrap();

        {
            let store = SledStore::open(dir.path()).unwrap();
            store.store(hook("a", "first")).await.unwrap();
        }

        let store = SledStore::open(dir.path()).unwrap();
        assert_eq!(store.get_by_id("a").await.unwrap().name, "first");
    }

    #[tokio::test]
    async fn delete_then_lookup_is_not_found() {
        let dir = TempDir::new().unwrap();
        let store = SledStore::open(dir.path()).unwrap();

        let stored = store.store(hook("", "x")).await.unwrap();
        store.delete(&stored.id).await.unwrap();
        assert!(matches!(
            store.get_by_id(&stored.id).await,
            Err(StorageError::NotFound)
        ));
    }
}
