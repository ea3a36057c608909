use std::collections::{BTreeMap, BTreeSet, HashMap};

use serde::{Deserialize, Serialize};

use crate::types::event::ContainerEventType;

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    #[serde(rename = "equal")]
    Equal,
    #[serde(rename = "not_equal")]
    NotEqual,
    #[serde(rename = "match")]
    Match,
}

/// A single operator/value test applied to one container attribute.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Condition {
    pub op: Operand,
    pub value: String,
}

#[derive(
    Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord,
)]
pub enum CriteriaField {
    #[serde(rename = "name")]
    Name,
    #[serde(rename = "image_name")]
    ImageName,
}

/// The matching rule set attached to a hook. Criteria with no fields and no
/// labels never match.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq, Eq)]
pub struct Criteria {
    #[serde(default)]
    pub fields: BTreeMap<CriteriaField, Condition>,
    #[serde(default)]
    pub labels: HashMap<String, String>,
}

impl Criteria {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.labels.is_empty()
    }
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BodyFormat {
    #[serde(rename = "json")]
    #[default]
    Json,
    #[serde(rename = "slack")]
    SlackJson,
    #[serde(rename = "none")]
    None,
}

/// A stored webhook subscription. The id is immutable once assigned; storage
/// generates one when a hook arrives without it.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Hook {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub events: BTreeSet<ContainerEventType>,
    #[serde(default)]
    pub criteria: Criteria,
    #[serde(default = "default_ttl")]
    pub ttl: i64,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub format: BodyFormat,
}

fn default_ttl() -> i64 {
    -1
}

impl Hook {
    /// Fills in what a create request may leave out: the creation time. The
    /// id is left for storage to assign.
    pub fn with_defaults(mut self) -> Self {
        if self.created == 0 {
            self.created = chrono::Utc::now().timestamp();
        }
        self
    }
}

pub fn generate_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
