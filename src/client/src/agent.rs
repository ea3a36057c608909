use std::sync::Arc;

use tracing::{debug, error, info};

use conhook_common::matching::hook_matches;
use conhook_common::types::container::ContainerState;
use conhook_common::types::event::ContainerEvent;
use conhook_common::types::reaction::{HostInfo, Reaction};
use conhook_watcher::EventStream;

use crate::cache::HookCache;
use crate::shooter::Shooter;

/// The event loop: pulls decorated events, matches them against the cached
/// hook set, and spawns one dispatch per matched hook.
pub struct Agent {
    cache: HookCache,
    shooter: Arc<dyn Shooter>,
    host: HostInfo,
}

impl Agent {
    pub fn new(cache: HookCache, shooter: Arc<dyn Shooter>) -> Self {
        let hostname = sysinfo::System::host_name().unwrap_or_else(|| "unknown".to_string());
        Self::with_host(cache, shooter, HostInfo { hostname })
    }

    pub fn with_host(cache: HookCache, shooter: Arc<dyn Shooter>, host: HostInfo) -> Self {
        Agent {
            cache,
            shooter,
            host,
        }
    }

    /// Runs until the decorated stream closes. Dispatches are fire-and-forget;
    /// the loop never waits for a delivery before taking the next event.
    pub async fn run(self, mut events: EventStream) {
        info!("event monitor started");

        while let Some(event) = events.recv().await {
            self.handle(event);
        }

        info!("event monitor stopped");
    }

    fn handle(&self, event: ContainerEvent) {
        let hooks = self.cache.hooks();

        let mut container = event.container.into_info();
        container.state = ContainerState::from_event(event.event_type);

        info!(
            container = %container.name,
            event = %event.event_type,
            "processing event"
        );

        let matched: Vec<_> = hooks
            .iter()
            .filter(|hook| hook_matches(hook, &container))
            .collect();
        info!("matched {} hook(s)", matched.len());

        for hook in matched {
            let reaction = Reaction {
                timestamp: chrono::Utc::now().timestamp(),
                hook: hook.clone(),
                host: self.host.clone(),
                container: container.clone(),
            };

            // One task per matched hook; a slow or failing endpoint cannot
            // hold up its siblings or the loop.
            let shooter = self.shooter.clone();
            tokio::spawn(async move {
                debug!(hook.id = %reaction.hook.id, "sending hook notification");
                if let Err(err) = shooter.fire(&reaction).await {
                    error!(hook.id = %reaction.hook.id, "error firing hook: {err:#}");
                }
            });
        }
    }
}
