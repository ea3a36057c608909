use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use conhook_common::types::hook::{generate_id, Hook};

use crate::{HookStore, StorageError};

/// In-memory store; contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    hooks: Mutex<HashMap<String, Hook>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl HookStore for MemoryStore {
    async fn get_by_id(&self, id: &str) -> Result<Hook, StorageError> {
        let hooks = self.hooks.lock().await;
        hooks.get(id).cloned().ok_or(StorageError::NotFound)
    }

    async fn get_all(&self) -> Result<Vec<Hook>, StorageError> {
        let hooks = self.hooks.lock().await;
        Ok(hooks.values().cloned().collect())
    }

    async fn store(&self, mut hook: Hook) -> Result<Hook, StorageError> {
        if hook.id.is_empty() {
            hook.id = generate_id();
        }

        let mut hooks = self.hooks.lock().await;
        hooks.insert(hook.id.clone(), hook.clone());
        Ok(hook)
    }

    async fn delete(&self, id: &str) -> Result<(), StorageError> {
        let mut hooks = self.hooks.lock().await;
        hooks.remove(id).map(|_| ()).ok_or(StorageError::NotFound)
    }
}
