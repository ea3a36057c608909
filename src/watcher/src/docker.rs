//! Docker-backed implementation of [`ContainerSource`] over the local
//! daemon socket.

use std::collections::HashMap;

use anyhow::Context;
use async_trait::async_trait;
use bollard::models::EventMessage;
use bollard::query_parameters::{
    EventsOptionsBuilder, InspectContainerOptions, ListContainersOptionsBuilder,
};
use bollard::Docker;
use futures_util::StreamExt;
use tracing::{debug, warn};

use conhook_common::types::container::{ContainerInfo, ContainerReference};
use conhook_common::types::event::{ContainerEvent, ContainerEventType, ContainerHandle};

use crate::source::{ContainerSource, SourceError};
use crate::stream::EventStream;

#[derive(Clone)]
pub struct DockerSource {
    docker: Docker,
}

impl DockerSource {
    pub fn connect() -> anyhow::Result<Self> {
        let docker =
            Docker::connect_with_unix_defaults().context("failed to connect to the docker daemon")?;
        Ok(DockerSource { docker })
    }

    async fn inspect(&self, name: &str) -> Result<ContainerInfo, SourceError> {
        let inspect = self
            .docker
            .inspect_container(name, None::<InspectContainerOptions>)
            .await
            .map_err(|err| map_docker_error(name, err))?;

        let container_name = inspect
            .name
            .as_deref()
            .map(|n| n.trim_start_matches('/').to_string())
            .unwrap_or_else(|| name.to_string());
        let image = inspect
            .config
            .as_ref()
            .and_then(|cfg| cfg.image.clone())
            .unwrap_or_default();
        let (image_name, image_tag) = split_image(&image);
        let labels = inspect
            .config
            .and_then(|cfg| cfg.labels)
            .unwrap_or_default();

        Ok(ContainerInfo {
            name: container_name,
            image_name,
            image_tag,
            labels,
            state: Default::default(),
        })
    }
}

#[async_trait]
impl ContainerSource for DockerSource {
    async fn watch_events(
        &self,
        types: &[ContainerEventType],
    ) -> Result<EventStream, SourceError> {
        // Surface connectivity problems at subscribe time instead of as a
        // silently empty stream.
        self.docker
            .ping()
            .await
            .context("docker daemon is not reachable")
            .map_err(SourceError::Other)?;

        let filters = HashMap::from_iter([("type", vec!["container".to_string()])]);
        let options = EventsOptionsBuilder::default().filters(&filters).build();
        let mut events = self.docker.events(Some(options));

        let wanted = types.to_vec();
        let (sink, stream) = EventStream::channel();

        tokio::spawn(async move {
            loop {
                let message = tokio::select! {
                    biased;
                    _ = sink.closed() => break,
                    message = events.next() => message,
                };

                match message {
                    Some(Ok(message)) => {
                        let Some(event) = map_event(message) else {
                            continue;
                        };

                        if !wanted.is_empty() && !wanted.contains(&event.event_type) {
                            continue;
                        }

                        debug!(
                            container = event.container.name(),
                            event = %event.event_type,
                            "container event"
                        );

                        if !sink.send(event).await {
                            break;
                        }
                    }
                    Some(Err(err)) => {
                        warn!("docker event stream error: {err}");
                    }
                    None => break,
                }
            }
        });

        Ok(stream)
    }

    async fn get_containers(&self) -> Result<Vec<ContainerInfo>, SourceError> {
        let options = ListContainersOptionsBuilder::default().all(false).build();
        let summaries = self
            .docker
            .list_containers(Some(options))
            .await
            .map_err(|err| SourceError::Other(err.into()))?;

        let mut containers = Vec::with_capacity(summaries.len());
        for summary in summaries {
            let name = summary
                .names
                .unwrap_or_default()
                .first()
                .map(|n| n.trim_start_matches('/').to_string())
                .unwrap_or_default();
            let (image_name, image_tag) = split_image(&summary.image.unwrap_or_default());

            containers.push(ContainerInfo {
                name,
                image_name,
                image_tag,
                labels: summary.labels.unwrap_or_default(),
                state: Default::default(),
            });
        }

        Ok(containers)
    }

    async fn get_container(&self, name: &str) -> Result<ContainerInfo, SourceError> {
        self.inspect(name).await
    }
}

fn map_docker_error(name: &str, err: bollard::errors::Error) -> SourceError {
    match err {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        } => SourceError::NotFound(name.to_string()),
        other => SourceError::Other(other.into()),
    }
}

fn map_event(message: EventMessage) -> Option<ContainerEvent> {
    let action = message.action.as_deref()?;
    let event_type = map_action(action)?;

    let actor = message.actor?;
    let name = actor
        .attributes
        .as_ref()
        .and_then(|attrs| attrs.get("name").cloned())
        .or(actor.id)?;

    Some(ContainerEvent {
        event_type,
        container: ContainerHandle::Reference(ContainerReference { name }),
        timestamp: message
            .time
            .unwrap_or_else(|| chrono::Utc::now().timestamp()),
    })
}

fn map_action(action: &str) -> Option<ContainerEventType> {
    match action {
        "create" => Some(ContainerEventType::Creation),
        "destroy" => Some(ContainerEventType::Deletion),
        "oom" => Some(ContainerEventType::Oom),
        _ => None,
    }
}

fn split_image(image: &str) -> (String, String) {
    // The tag separator is the last ':' after the last '/', so registry
    // ports ("reg:5000/img") survive.
    let slash = image.rfind('/').map(|i| i + 1).unwrap_or(0);
    match image[slash..].rfind(':') {
        Some(colon) => {
            let at = slash + colon;
            (image[..at].to_string(), image[at + 1..].to_string())
        }
        None => (image.to_string(), String::new()),
    }
}
