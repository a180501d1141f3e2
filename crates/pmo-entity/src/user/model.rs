//! User entity model.

use serde::{Deserialize, Serialize};

use super::role::UserRole;
use crate::capability::{AuditStamp, Deletion};

/// A back-office user account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier.
    #[serde(default)]
    pub id: i64,
    /// Unique login name.
    pub user_name: String,
    /// Email address.
    #[serde(default)]
    pub email: Option<String>,
    /// Human-readable name.
    #[serde(default)]
    pub full_name: Option<String>,
    /// Assigned role.
    #[serde(default)]
    pub role: UserRole,
    /// Audit provenance.
    #[serde(flatten)]
    pub audit: AuditStamp,
    /// Soft-delete state.
    #[serde(flatten)]
    pub deletion: Deletion,
}

impl User {
    /// Create an unsaved user.
    pub fn new(user_name: impl Into<String>, role: UserRole) -> Self {
        Self {
            id: 0,
            user_name: user_name.into(),
            email: None,
            full_name: None,
            role,
            audit: AuditStamp::default(),
            deletion: Deletion::default(),
        }
    }

    /// Name to show in listings: the full name, else the login name.
    pub fn display_name(&self) -> &str {
        self.full_name.as_deref().unwrap_or(&self.user_name)
    }
}

crate::impl_entity!(User {
    table: "users",
    audit: audit,
    deletion: deletion,
    sort: {
        "UserName" => |u| (&u.user_name).into(),
        "Email" => |u| u.email.as_ref().into(),
        "FullName" => |u| u.full_name.as_ref().into(),
        "Role" => |u| i64::from(u.role.privilege_level()).into(),
        "CreatedAt" => |u| u.audit.created_at.into(),
    },
});
