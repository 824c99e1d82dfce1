//! Internal tasks and projects.

use serde::{Deserialize, Serialize};

use crate::de;
use crate::types::{Priority, ProjectId, TaskId, TaskStatus, Timestamp, UserId};

/// An internal work item, optionally grouped under a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    #[serde(default, alias = "_id")]
    pub id: TaskId,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub priority: Option<Priority>,
    #[serde(default, alias = "project", deserialize_with = "de::lenient_ref")]
    pub project_id: Option<ProjectId>,
    #[serde(default, alias = "assignee", deserialize_with = "de::lenient_ref")]
    pub assignee_id: Option<UserId>,
    #[serde(default, deserialize_with = "de::lenient_datetime")]
    pub due_date: Option<Timestamp>,
    #[serde(default, deserialize_with = "de::lenient_datetime")]
    pub created_at: Option<Timestamp>,
    #[serde(default, deserialize_with = "de::lenient_datetime")]
    pub completed_at: Option<Timestamp>,
}

impl Task {
    /// Whether the task is completed or cancelled.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.status.is_some_and(TaskStatus::is_closed)
    }
}

/// A project grouping tasks.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(default, alias = "_id")]
    pub id: ProjectId,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "de::lenient_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub status: Option<TaskStatus>,
    #[serde(default, deserialize_with = "de::lenient")]
    pub priority: Option<Priority>,
    #[serde(default, deserialize_with = "de::lenient_datetime")]
    pub due_date: Option<Timestamp>,
    #[serde(default, alias = "owner", deserialize_with = "de::lenient_ref")]
    pub owner_id: Option<UserId>,
}
