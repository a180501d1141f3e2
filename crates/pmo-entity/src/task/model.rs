//! Task entity model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::priority::TaskPriority;
use crate::capability::{AuditStamp, Deletion};

/// Progress state of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started.
    #[default]
    Todo,
    /// Being worked on.
    InProgress,
    /// Waiting on something external.
    Blocked,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Blocked => "blocked",
            Self::Done => "done",
        }
    }
}

/// A unit of work inside a project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectTask {
    /// Unique task identifier.
    #[serde(default)]
    pub id: i64,
    /// Owning project.
    pub project_id: i64,
    /// Task title.
    pub title: String,
    /// Details.
    #[serde(default)]
    pub description: Option<String>,
    /// Assigned user.
    #[serde(default)]
    pub assignee_id: Option<i64>,
    /// Urgency.
    #[serde(default)]
    pub priority: TaskPriority,
    /// Progress state.
    #[serde(default)]
    pub status: TaskStatus,
    /// Deadline.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Estimated effort in hours.
    #[serde(default)]
    pub estimate_hours: Option<f64>,
    /// Audit provenance.
    #[serde(flatten)]
    pub audit: AuditStamp,
    /// Soft-delete state.
    #[serde(flatten)]
    pub deletion: Deletion,
}

impl ProjectTask {
    /// Create an unsaved task in `project_id`.
    pub fn new(project_id: i64, title: impl Into<String>) -> Self {
        Self {
            id: 0,
            project_id,
            title: title.into(),
            description: None,
            assignee_id: None,
            priority: TaskPriority::default(),
            status: TaskStatus::default(),
            due_date: None,
            estimate_hours: None,
            audit: AuditStamp::default(),
            deletion: Deletion::default(),
        }
    }

    /// Whether the task is finished.
    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }
}

crate::impl_entity!(ProjectTask {
    table: "tasks",
    audit: audit,
    deletion: deletion,
    sort: {
        "Title" => |t| (&t.title).into(),
        "ProjectId" => |t| t.project_id.into(),
        "AssigneeId" => |t| t.assignee_id.into(),
        "Priority" => |t| t.priority.level().into(),
        "Status" => |t| t.status.as_str().into(),
        "DueDate" => |t| t.due_date.into(),
        "EstimateHours" => |t| t.estimate_hours.into(),
        "CreatedAt" => |t| t.audit.created_at.into(),
    },
});
