use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::container::{ContainerInfo, ContainerReference};

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord,
)]
pub enum ContainerEventType {
    #[serde(rename = "containerCreation")]
    Creation,
    #[serde(rename = "containerDeletion")]
    Deletion,
    #[serde(rename = "oom")]
    Oom,
    #[serde(rename = "oomKill")]
    OomKill,
    #[serde(rename = "containerExisted")]
    Existed,
}

impl fmt::Display for ContainerEventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContainerEventType::Creation => "containerCreation",
            ContainerEventType::Deletion => "containerDeletion",
            ContainerEventType::Oom => "oom",
            ContainerEventType::OomKill => "oomKill",
            ContainerEventType::Existed => "containerExisted",
        };
        f.write_str(s)
    }
}

/// The container attached to an event: either a bare reference straight from
/// the source, or full metadata once the resolver got to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ContainerHandle {
    Reference(ContainerReference),
    Info(ContainerInfo),
}

impl ContainerHandle {
    pub fn name(&self) -> &str {
        match self {
            ContainerHandle::Reference(r) => &r.name,
            ContainerHandle::Info(i) => &i.name,
        }
    }

    pub fn info(&self) -> Option<&ContainerInfo> {
        match self {
            ContainerHandle::Reference(_) => None,
            ContainerHandle::Info(i) => Some(i),
        }
    }

    /// Full metadata if resolved, otherwise a name-only stand-in.
    pub fn into_info(self) -> ContainerInfo {
        match self {
            ContainerHandle::Reference(r) => ContainerInfo::from_name(r.name),
            ContainerHandle::Info(i) => i,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ContainerEvent {
    pub event_type: ContainerEventType,
    pub container: ContainerHandle,
    pub timestamp: i64,
}
