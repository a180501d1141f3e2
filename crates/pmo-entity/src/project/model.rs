//! Project entity model.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::status::ProjectStatus;
use crate::capability::{AuditStamp, Deletion};

/// A client engagement that groups tasks and logged activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier.
    #[serde(default)]
    pub id: i64,
    /// Short human-facing code, e.g. `"ACME-24"`.
    pub code: String,
    /// Project title.
    pub title: String,
    /// Longer description.
    #[serde(default)]
    pub description: Option<String>,
    /// Owning client.
    #[serde(default)]
    pub client_id: Option<i64>,
    /// Lifecycle status.
    #[serde(default)]
    pub status: ProjectStatus,
    /// Planned start.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Planned delivery.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Hour budget agreed with the client.
    #[serde(default)]
    pub budget_hours: Option<f64>,
    /// Audit provenance.
    #[serde(flatten)]
    pub audit: AuditStamp,
    /// Soft-delete state.
    #[serde(flatten)]
    pub deletion: Deletion,
}

impl Project {
    /// Create an unsaved project.
    pub fn new(code: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: 0,
            code: code.into(),
            title: title.into(),
            description: None,
            client_id: None,
            status: ProjectStatus::default(),
            start_date: None,
            due_date: None,
            budget_hours: None,
            audit: AuditStamp::default(),
            deletion: Deletion::default(),
        }
    }

    /// Whether the project is past its due date on `today` and still open.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        self.status.is_open() && self.due_date.is_some_and(|due| due < today)
    }
}

crate::impl_entity!(Project {
    table: "projects",
    audit: audit,
    deletion: deletion,
    sort: {
        "Title" => |p| (&p.title).into(),
        "Code" => |p| (&p.code).into(),
        "Status" => |p| p.status.as_str().into(),
        "ClientId" => |p| p.client_id.into(),
        "StartDate" => |p| p.start_date.into(),
        "DueDate" => |p| p.due_date.into(),
        "BudgetHours" => |p| p.budget_hours.into(),
        "CreatedAt" => |p| p.audit.created_at.into(),
        "UpdatedAt" => |p| p.audit.updated_at.into(),
    },
});
