use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::warn;

use conhook_common::types::hook::Hook;
use conhook_storage::HookStore;

/// Interval-refreshed snapshot of the stored hook set, decoupling the hot
/// notification path from storage latency.
///
/// Readers get a point-in-time `Arc` snapshot and never block on a refresh;
/// the mutex guards only the pointer swap. A failed refresh keeps the last
/// good snapshot.
#[derive(Clone)]
pub struct HookCache {
    hooks: Arc<Mutex<Arc<Vec<Hook>>>>,
}

impl HookCache {
    fn empty() -> Self {
        HookCache {
            hooks: Arc::new(Mutex::new(Arc::new(Vec::new()))),
        }
    }

    /// Starts the refresh task. The first fetch happens immediately so the
    /// cache does not serve an empty snapshot for a whole interval after
    /// startup.
    pub fn start(
        interval: Duration,
        store: Arc<dyn HookStore>,
        cancel: CancellationToken,
    ) -> Self {
        let cache = Self::empty();

        let refresher = cache.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {}
                }

                refresher.refresh(store.as_ref()).await;
            }
        });

        cache
    }

    /// Current snapshot; treat it as a read-only point-in-time copy.
    pub fn hooks(&self) -> Arc<Vec<Hook>> {
        self.hooks.lock().expect("hook cache mutex poisoned").clone()
    }

    async fn refresh(&self, store: &dyn HookStore) {
        match store.get_all().await {
            Ok(fresh) => {
                *self.hooks.lock().expect("hook cache mutex poisoned") = Arc::new(fresh);
            }
            Err(err) => {
                warn!("error caching hooks: {err:#}");
            }
        }
    }
}
