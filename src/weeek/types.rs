//! Weeek API wire types
//!
//! Every response arrives wrapped in an envelope carrying a `success` flag
//! next to the entity; the client rejects envelopes where the flag is false
//! or the entity is absent.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Base URL of the Weeek web app, used to build task deep links
pub const WEEEK_APP_URL: &str = "https://app.weeek.net";

/// A Weeek task, as observed at fetch time
#[derive(Debug, Clone, Deserialize)]
pub struct Task {
    /// Task identifier
    pub id: u64,
    /// Task title
    pub title: String,
    /// Tag ids currently attached to the task
    #[serde(default)]
    pub tags: Vec<u64>,
}

/// A Weeek tag
#[derive(Debug, Clone, Deserialize)]
pub struct Tag {
    /// Service-assigned tag identifier
    pub id: u64,
    /// Tag title
    pub title: String,
}

/// The Weeek workspace the credential belongs to
#[derive(Debug, Clone, Deserialize)]
pub struct Workspace {
    /// Workspace identifier
    pub id: u64,
}

/// Merge-patch payload for task updates
///
/// Only populated fields are serialized; the server leaves absent fields
/// untouched. A populated `tags` replaces the task's whole tag set, so append
/// semantics require fetching the current set first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskUpdate {
    /// Custom field values, keyed by field id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_fields: Option<HashMap<String, String>>,
    /// Replacement tag set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<u64>>,
}

impl TaskUpdate {
    /// Update that sets a single custom field
    #[must_use]
    pub fn custom_field(field_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            custom_fields: Some(HashMap::from([(field_id.into(), value.into())])),
            ..Self::default()
        }
    }

    /// Update that replaces the task's tag set
    #[must_use]
    pub fn tags(tags: Vec<u64>) -> Self {
        Self {
            tags: Some(tags),
            ..Self::default()
        }
    }
}

/// A project/board placement for a new task
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskLocation {
    /// Target project
    pub project_id: u64,
    /// Target board column
    pub board_column_id: u64,
}

/// Payload for creating a task
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTask {
    /// Where the task is placed
    pub locations: Vec<TaskLocation>,
    /// Task title
    pub title: String,
    /// Task description (HTML)
    pub description: String,
    /// Weeek task type
    #[serde(rename = "type")]
    pub kind: String,
}

/// Payload for creating a tag
#[derive(Debug, Clone, Serialize)]
pub struct NewTag {
    /// Tag title
    pub title: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TaskEnvelope {
    #[serde(default)]
    pub success: bool,
    pub task: Option<Task>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TagEnvelope {
    #[serde(default)]
    pub success: bool,
    pub tag: Option<Tag>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct WorkspaceEnvelope {
    #[serde(default)]
    pub success: bool,
    pub workspace: Option<Workspace>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AckEnvelope {
    #[serde(default)]
    pub success: bool,
}
