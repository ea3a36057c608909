use tokio::sync::mpsc;
use tokio_util::sync::{CancellationToken, WaitForCancellationFuture};

use conhook_common::types::event::ContainerEvent;

const EVENT_BUFFER: usize = 64;

/// Receiving half of a lifecycle event channel.
///
/// Owning the stream means owning the sole right to drain it; decorators take
/// the stream by value and hand back a new one, so a channel can never end up
/// with two competing readers.
pub struct EventStream {
    rx: mpsc::Receiver<ContainerEvent>,
    cancel: CancellationToken,
}

impl EventStream {
    /// Builds a connected (producer, consumer) pair.
    pub fn channel() -> (EventSink, EventStream) {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let cancel = CancellationToken::new();
        (
            EventSink {
                tx,
                cancel: cancel.clone(),
            },
            EventStream { rx, cancel },
        )
    }

    /// Next event, or `None` once the producer side has shut down.
    pub async fn recv(&mut self) -> Option<ContainerEvent> {
        self.rx.recv().await
    }

    /// Asks the producer to stop. Decorated streams forward the request down
    /// to the wrapped source; the channel itself closes once the producer
    /// task exits.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    /// Handle that can request the close later, after the stream itself has
    /// been handed off to its consumer.
    pub fn close_handle(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

/// Producer half handed to the task feeding an `EventStream`.
#[derive(Clone)]
pub struct EventSink {
    tx: mpsc::Sender<ContainerEvent>,
    cancel: CancellationToken,
}

impl EventSink {
    /// Delivers an event to the consumer. Returns false when the consumer is
    /// gone and the producer should wind down.
    pub async fn send(&self, event: ContainerEvent) -> bool {
        self.tx.send(event).await.is_ok()
    }

    /// Resolves when the consumer has requested a close.
    pub fn closed(&self) -> WaitForCancellationFuture<'_> {
        self.cancel.cancelled()
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conhook_common::types::container::ContainerReference;
    use conhook_common::types::event::{ContainerEventType, ContainerHandle};

    fn event(name: &str) -> ContainerEvent {
        ContainerEvent {
            event_type: ContainerEventType::Creation,
            container: ContainerHandle::Reference(ContainerReference {
                name: name.to_string(),
            }),
            timestamp: 0,
        }
    }

    #[tokio::test]
    async fn stream_ends_when_producer_drops() {
        let (sink, mut stream) = EventStream::channel();
        assert!(sink.send(event("a")).await);
        drop(sink);

        assert_eq!(stream.recv().await.unwrap().container.name(), "a");
        assert!(stream.recv().await.is_none());
    }

    #[tokio::test]
    async fn close_is_visible_to_the_producer() {
        let (sink, stream) = EventStream::channel();
        assert!(!sink.is_closed());
        stream.close();
        assert!(sink.is_closed());
        sink.closed().await;
    }
}
