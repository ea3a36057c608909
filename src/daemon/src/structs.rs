use serde::{Deserialize, Serialize};

use conhook_common::types::event::ContainerEventType;
use conhook_common::types::hook::{BodyFormat, Criteria, Hook};

/// Partial update applied to a stored hook. Absent fields are left alone;
/// event changes use set semantics (add first, then remove).
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
pub struct ModifyHookRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub criteria: Option<Criteria>,
    #[serde(default)]
    pub format: Option<BodyFormat>,
    #[serde(default)]
    pub add_events: Vec<ContainerEventType>,
    #[serde(default)]
    pub remove_events: Vec<ContainerEventType>,
}

pub fn merge_hook_update(hook: &mut Hook, request: &ModifyHookRequest) {
    if let Some(name) = &request.name {
        if !name.is_empty() {
            hook.name = name.clone();
        }
    }

    if let Some(url) = &request.url {
        if !url.is_empty() {
            hook.url = url.clone();
        }
    }

    if let Some(criteria) = &request.criteria {
        hook.criteria = criteria.clone();
    }

    if let Some(format) = request.format {
        // `none` is the "unset" marker on the wire, never a real encoding.
        if format != BodyFormat::None {
            hook.format = format;
        }
    }

    for event in &request.add_events {
        hook.events.insert(*event);
    }

    for event in &request.remove_events {
        hook.events.remove(event);
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct InfoResponse {
    pub version: String,
    pub hostname: String,
    /// Hook count as the cache sees it, not the store.
    pub cached_hooks: usize,
}
