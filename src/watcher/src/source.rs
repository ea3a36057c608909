use async_trait::async_trait;
use thiserror::Error;

use conhook_common::types::container::ContainerInfo;
use conhook_common::types::event::ContainerEventType;

use crate::stream::EventStream;

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("container {0:?} not found")]
    NotFound(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Contract of a container introspection driver: a live event channel plus
/// point lookups of container metadata.
#[async_trait]
pub trait ContainerSource: Send + Sync {
    /// Opens the lifecycle event stream, filtered to the given event types.
    /// An empty slice subscribes to every type. Events may carry bare
    /// references only; resolution is the decorator stack's job.
    async fn watch_events(
        &self,
        types: &[ContainerEventType],
    ) -> Result<EventStream, SourceError>;

    async fn get_containers(&self) -> Result<Vec<ContainerInfo>, SourceError>;

    /// Point lookup by name. `SourceError::NotFound` is distinct so callers
    /// can tolerate partial data instead of failing.
    async fn get_container(&self, name: &str) -> Result<ContainerInfo, SourceError>;
}
