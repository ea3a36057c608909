use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::types::event::ContainerEventType;

/// Minimal identity carried by raw lifecycle events before resolution.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct ContainerReference {
    pub name: String,
}

/// Full container metadata, resolved lazily via a point lookup.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct ContainerInfo {
    pub name: String,
    #[serde(default)]
    pub image_name: String,
    #[serde(default)]
    pub image_tag: String,
    #[serde(default)]
    pub labels: HashMap<String, String>,
    #[serde(default)]
    pub state: ContainerState,
}

impl ContainerInfo {
    /// Info carrying only a name, used when a reference could not be resolved.
    pub fn from_name(name: impl Into<String>) -> Self {
        ContainerInfo {
            name: name.into(),
            ..Default::default()
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Running,
    Stopped,
    #[default]
    Unknown,
}

impl ContainerState {
    pub fn from_event(event_type: ContainerEventType) -> Self {
        match event_type {
            ContainerEventType::Creation => ContainerState::Running,
            ContainerEventType::Deletion => ContainerState::Stopped,
            _ => ContainerState::Unknown,
        }
    }
}

impl fmt::Display for ContainerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContainerState::Running => "running",
            ContainerState::Stopped => "stopped",
            ContainerState::Unknown => "unknown",
        };
        f.write_str(s)
    }
}
