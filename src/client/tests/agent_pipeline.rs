use std::collections::HashMap;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::Value;
use tokio_util::sync::CancellationToken;

use conhook_client::shooter::LiveShooter;
use conhook_client::{Agent, HookCache};
use conhook_common::types::container::ContainerInfo;
use conhook_common::types::event::{ContainerEvent, ContainerEventType, ContainerHandle};
use conhook_common::types::hook::{
    BodyFormat, Condition, Criteria, CriteriaField, Hook, Operand,
};
use conhook_common::types::reaction::HostInfo;
use conhook_storage::memory::MemoryStore;
use conhook_storage::HookStore;
use conhook_watcher::EventStream;

type Received = Arc<Mutex<Vec<Value>>>;

async fn capture(State(received): State<Received>, Json(body): Json<Value>) -> StatusCode {
    received.lock().unwrap().push(body);
    StatusCode::OK
}

async fn start_sink() -> (SocketAddr, Received) {
    let received: Received = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/", post(capture))
        .with_state(received.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(axum::serve(listener, app).into_future());

    (addr, received)
}

fn nginx_hook(id: &str, url: String) -> Hook {
    let mut criteria = Criteria::default();
    criteria.fields.insert(
        CriteriaField::ImageName,
        Condition {
            op: Operand::Equal,
            value: "nginx".to_string(),
        },
    );

    Hook {
        id: id.to_string(),
        name: format!("hook-{id}"),
        url,
        events: Default::default(),
        criteria,
        ttl: -1,
        created: 0,
        format: BodyFormat::Json,
    }
}

fn creation_event() -> ContainerEvent {
    ContainerEvent {
        event_type: ContainerEventType::Creation,
        container: ContainerHandle::Info(ContainerInfo {
            name: "web1".to_string(),
            image_name: "nginx".to_string(),
            image_tag: "1.25".to_string(),
            labels: HashMap::from([("env".to_string(), "prod".to_string())]),
            ..Default::default()
        }),
        timestamp: 1,
    }
}

async fn wait_for_payloads(received: &Received, count: usize) -> Vec<Value> {
    for _ in 0..100 {
        if received.lock().unwrap().len() >= count {
            return received.lock().unwrap().clone();
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }

    panic!(
        "expected {count} payloads, got {}",
        received.lock().unwrap().len()
    );
}

async fn primed_cache(store: Arc<dyn HookStore>, cancel: CancellationToken) -> HookCache {
    let cache = HookCache::start(Duration::from_millis(20), store, cancel);
    for _ in 0..100 {
        if !cache.hooks().is_empty() {
            return cache;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    panic!("hook cache never primed");
}

#[tokio::test]
async fn creation_event_reaches_the_subscribed_sink() {
    let (addr, received) = start_sink().await;

    let store = Arc::new(MemoryStore::new());
    store
        .store(nginx_hook("e2e", format!("http://{addr}/")))
        .await
        .unwrap();

    let cancel = CancellationToken::new();
    let cache = primed_cache(store, cancel.clone()).await;

    let (sink, stream) = EventStream::channel();
    let agent = Agent::with_host(
        cache,
        Arc::new(LiveShooter::new()),
        HostInfo {
            hostname: "testhost".to_string(),
        },
    );
    let loop_task = tokio::spawn(agent.run(stream));

    sink.send(creation_event()).await;
    drop(sink);
    loop_task.await.unwrap();

    let payloads = wait_for_payloads(&received, 1).await;
    let body = &payloads[0];
    assert_eq!(body["hook"]["id"], "e2e");
    assert_eq!(body["host"]["hostname"], "testhost");
    assert_eq!(body["container"]["name"], "web1");
    assert_eq!(body["container"]["image_name"], "nginx");
    assert_eq!(body["container"]["state"], "running");

    cancel.cancel();
}

#[tokio::test]
async fn one_unreachable_hook_does_not_block_its_siblings() {
    let (addr, received) = start_sink().await;

    let store = Arc::new(MemoryStore::new());
    store
        .store(nginx_hook("a", format!("http://{addr}/")))
        .await
        .unwrap();
    // Nothing listens on port 1; this dispatch fails on its own.
    store
        .store(nginx_hook("broken", "http://127.0.0.1:1/".to_string()))
        .await
        .unwrap();
    store
        .store(nginx_hook("b", format!("http://{addr}/")))
        .await
        .unwrap();

    let cancel = CancellationToken::new();
    let cache = primed_cache(store, cancel.clone()).await;

    let (sink, stream) = EventStream::channel();
    let agent = Agent::with_host(
        cache,
        Arc::new(LiveShooter::new()),
        HostInfo {
            hostname: "testhost".to_string(),
        },
    );
    let loop_task = tokio::spawn(agent.run(stream));

    sink.send(creation_event()).await;
    drop(sink);
    loop_task.await.unwrap();

    let payloads = wait_for_payloads(&received, 2).await;
    let mut ids: Vec<&str> = payloads
        .iter()
        .map(|p| p["hook"]["id"].as_str().unwrap())
        .collect();
    ids.sort_unstable();
    assert_eq!(ids, vec!["a", "b"]);

    cancel.cancel();
}
