use serde::{Deserialize, Serialize};

use crate::types::container::ContainerInfo;
use crate::types::hook::Hook;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct HostInfo {
    pub hostname: String,
}

/// The payload envelope handed to the shooter for one matched (hook, event)
/// pair.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Reaction {
    pub timestamp: i64,
    pub hook: Hook,
    pub host: HostInfo,
    pub container: ContainerInfo,
}
