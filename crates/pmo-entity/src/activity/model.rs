//! Activity entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::capability::AuditStamp;

/// Time logged by a user against a task, optionally on a machine.
///
/// Activities are audited but not soft-deletable: a removed entry is gone.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique activity identifier.
    #[serde(default)]
    pub id: i64,
    /// Task the time was spent on.
    pub task_id: i64,
    /// User who did the work.
    pub user_id: i64,
    /// Machine used, if any.
    #[serde(default)]
    pub machine_id: Option<i64>,
    /// When the work started.
    pub started_at: DateTime<Utc>,
    /// Hours spent.
    pub hours: f64,
    /// Free-text note.
    #[serde(default)]
    pub note: Option<String>,
    /// Audit provenance.
    #[serde(flatten)]
    pub audit: AuditStamp,
}

impl Activity {
    /// Create an unsaved activity.
    pub fn new(task_id: i64, user_id: i64, started_at: DateTime<Utc>, hours: f64) -> Self {
        Self {
            id: 0,
            task_id,
            user_id,
            machine_id: None,
            started_at,
            hours,
            note: None,
            audit: AuditStamp::default(),
        }
    }
}

crate::impl_entity!(Activity {
    table: "activities",
    audit: audit,
    sort: {
        "TaskId" => |a| a.task_id.into(),
        "UserId" => |a| a.user_id.into(),
        "MachineId" => |a| a.machine_id.into(),
        "StartedAt" => |a| a.started_at.into(),
        "Hours" => |a| a.hours.into(),
        "CreatedAt" => |a| a.audit.created_at.into(),
    },
});
