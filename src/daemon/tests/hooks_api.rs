use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use conhook_client::HookCache;
use conhook_common::types::hook::{BodyFormat, Hook};
use conhook_daemon::app::get_app;
use conhook_daemon::client::DaemonClient;
use conhook_daemon::server::DaemonServer;
use conhook_daemon::structs::ModifyHookRequest;
use conhook_storage::memory::MemoryStore;
use conhook_storage::HookStore;

async fn start_daemon() -> (DaemonClient, CancellationToken) {
    let store: Arc<dyn HookStore> = Arc::new(MemoryStore::new());
    let cancel = CancellationToken::new();
    let cache = HookCache::start(Duration::from_millis(50), store.clone(), cancel.clone());

    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    let server = DaemonServer::bind(addr).await.unwrap();
    let addr = server.local_addr().unwrap();

    let app = get_app(store, cache, cancel.clone());
    tokio::spawn(server.run(app, cancel.clone()));

    (DaemonClient::new(format!("http://{addr}")), cancel)
}

fn new_hook() -> Hook {
    Hook {
        id: String::new(),
        name: "watcher".to_string(),
        url: "http://example.net/hook".to_string(),
        events: Default::default(),
        criteria: Default::default(),
        ttl: -1,
        created: 0,
        format: BodyFormat::Json,
    }
}

#[tokio::test]
async fn hook_crud_round_trip() {
    let (client, cancel) = start_daemon().await;

    let stored = client.create_hook(&new_hook()).await.unwrap();
    assert!(!stored.id.is_empty());
    assert!(stored.created > 0);

    let listed = client.list_hooks().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, stored.id);

    let fetched = client.get_hook(&stored.id).await.unwrap();
    assert_eq!(fetched, stored);

    let modified = client
        .modify_hook(
            &stored.id,
            &ModifyHookRequest {
                name: Some("renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(modified.name, "renamed");
    assert_eq!(modified.id, stored.id);

    client.delete_hook(&stored.id).await.unwrap();
    assert!(client.get_hook(&stored.id).await.is_err());
    assert!(client.list_hooks().await.unwrap().is_empty());

    cancel.cancel();
}

#[tokio::test]
async fn unknown_hooks_are_a_client_error() {
    let (client, cancel) = start_daemon().await;

    assert!(client.get_hook("missing").await.is_err());
    assert!(client.delete_hook("missing").await.is_err());

    cancel.cancel();
}

#[tokio::test]
async fn terminate_cancels_the_daemon_token() {
    let (client, cancel) = start_daemon().await;

    // Graceful shutdown means the terminate call still gets its reply.
    client.send_terminate_request().await.unwrap();
    tokio::time::timeout(Duration::from_secs(1), cancel.cancelled())
        .await
        .unwrap();
}
