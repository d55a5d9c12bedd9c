use serde::{Deserialize, Serialize};

/// A task as held by the remote store. The store is authoritative; the
/// dashboard keeps a read-through cached copy partitioned into pending
/// and completed collections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Independently ranked task from the priority endpoint. Read-only and
/// never reconciled with the task store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityTask {
    #[serde(default)]
    pub priority: String,
    #[serde(default)]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[cfg(test)]
impl Task {
    pub fn stub(id: &str, title: &str) -> Self {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            due: None,
            notes: None,
        }
    }
}
