//! Decorators over an [`EventStream`].
//!
//! Each decorator consumes the upstream stream and returns a new one backed
//! by a forwarding task. Events are never dropped: a failed lookup forwards
//! the event unchanged.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use conhook_common::types::container::ContainerInfo;
use conhook_common::types::event::{ContainerEventType, ContainerHandle};

use crate::source::{ContainerSource, SourceError};
use crate::stream::EventStream;

/// Resolves bare container references into full metadata via point lookup.
/// A NotFound lookup forwards the event unresolved; the downstream consumer
/// must tolerate partial data.
pub fn resolve(mut inner: EventStream, source: Arc<dyn ContainerSource>) -> EventStream {
    let (sink, stream) = EventStream::channel();

    tokio::spawn(async move {
        loop {
            let next = tokio::select! {
                biased;
                _ = sink.closed() => {
                    inner.close();
                    break;
                }
                next = inner.recv() => next,
            };

            let Some(mut event) = next else { break };

            if event.container.info().is_none() {
                let name = event.container.name().to_string();
                match source.get_container(&name).await {
                    Ok(info) => event.container = ContainerHandle::Info(info),
                    Err(SourceError::NotFound(_)) => {
                        debug!(container = %name, "container gone before lookup, passing through unresolved");
                    }
                    Err(err) => {
                        warn!(container = %name, "container lookup failed: {err:#}");
                    }
                }
            }

            if !sink.send(event).await {
                inner.close();
                break;
            }
        }
    });

    stream
}

/// Tracks container metadata across a container's lifetime so deletion
/// events, which typically carry only a name, keep the info captured at
/// creation. Best-effort: containers created before the watch started have
/// no index entry and pass through untouched.
pub fn track(mut inner: EventStream) -> EventStream {
    let (sink, stream) = EventStream::channel();

    tokio::spawn(async move {
        // This task is the sole writer of the index.
        let mut index: HashMap<String, ContainerInfo> = HashMap::new();

        loop {
            let next = tokio::select! {
                biased;
                _ = sink.closed() => {
                    inner.close();
                    break;
                }
                next = inner.recv() => next,
            };

            let Some(mut event) = next else { break };

            match event.event_type {
                ContainerEventType::Creation => {
                    let info = event.container.clone().into_info();
                    index.insert(info.name.clone(), info);
                }
                ContainerEventType::Deletion => {
                    if let Some(info) = index.remove(event.container.name()) {
                        event.container = ContainerHandle::Info(info);
                    }
                }
                _ => {}
            }

            if !sink.send(event).await {
                inner.close();
                break;
            }
        }
    });

    stream
}
