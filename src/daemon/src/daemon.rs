use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::info;

use conhook_client::config_manager::Config;
use conhook_client::shooter::{LiveShooter, LogShooter, Shooter};
use conhook_client::{Agent, HookCache};
use conhook_common::types::event::ContainerEventType;
use conhook_watcher::docker::DockerSource;
use conhook_watcher::{decorate, ContainerSource};

use crate::app::get_app;
use crate::server::DaemonServer;

#[tokio::main]
pub async fn run(config: Config) -> Result<()> {
    let addr: SocketAddr = config
        .server
        .parse()
        .with_context(|| format!("invalid server address {:?}", config.server))?;

    let store = conhook_storage::connect(&config.storage)?;
    let cancel = CancellationToken::new();
    let cache = HookCache::start(
        Duration::from_millis(config.cache_refresh_interval_ms),
        store.clone(),
        cancel.clone(),
    );

    let source = Arc::new(DockerSource::connect()?);

    // Subscribe failure is fatal; there is no reconnect policy.
    let events = source
        .watch_events(&[ContainerEventType::Creation, ContainerEventType::Deletion])
        .await
        .context("error opening event channel")?;
    let events = decorate::track(decorate::resolve(events, source.clone()));
    let stream_closer = events.close_handle();

    let shooter: Arc<dyn Shooter> = if config.dry_run {
        Arc::new(LogShooter)
    } else {
        Arc::new(LiveShooter::new())
    };

    info!("starting agent");
    let agent = Agent::new(cache.clone(), shooter);
    let agent_task = tokio::spawn(agent.run(events));

    let server = DaemonServer::bind(addr).await?;
    info!("listening on {addr}");
    server.run(get_app(store, cache, cancel.clone()), cancel).await?;

    info!("shutting down agent");
    stream_closer.cancel();
    let _ = agent_task.await;

    Ok(())
}
