use std::net::SocketAddr;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tracing::info;

pub struct DaemonServer {
    listener: TcpListener,
}

impl DaemonServer {
    pub async fn bind(addr: SocketAddr) -> anyhow::Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("failed to bind to address {addr}"))?;
        Ok(DaemonServer { listener })
    }

    pub fn local_addr(&self) -> anyhow::Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Serves the control API until the cancellation token fires. Shutdown
    /// is graceful so in-flight responses still reach their clients.
    pub async fn run(self, app: Router, cancel: CancellationToken) -> anyhow::Result<()> {
        axum::serve(self.listener, app)
            .with_graceful_shutdown(async move {
                cancel.cancelled().await;
                info!("terminate requested, stopping server");
            })
            .await
            .context("control server failed")?;

        Ok(())
    }
}
