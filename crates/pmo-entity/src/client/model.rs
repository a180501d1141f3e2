//! Client entity model.

use serde::{Deserialize, Serialize};

use crate::capability::{AuditStamp, Deletion};

/// A customer organisation projects are delivered for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Client {
    /// Unique client identifier.
    #[serde(default)]
    pub id: i64,
    /// Company name.
    pub name: String,
    /// Primary contact email.
    #[serde(default)]
    pub email: Option<String>,
    /// Primary contact phone.
    #[serde(default)]
    pub phone: Option<String>,
    /// Postal address.
    #[serde(default)]
    pub address: Option<String>,
    /// Audit provenance.
    #[serde(flatten)]
    pub audit: AuditStamp,
    /// Soft-delete state.
    #[serde(flatten)]
    pub deletion: Deletion,
}

impl Client {
    /// Create an unsaved client.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            email: None,
            phone: None,
            address: None,
            audit: AuditStamp::default(),
            deletion: Deletion::default(),
        }
    }
}

crate::impl_entity!(Client {
    table: "clients",
    audit: audit,
    deletion: deletion,
    sort: {
        "Name" => |c| (&c.name).into(),
        "Email" => |c| c.email.as_ref().into(),
        "CreatedAt" => |c| c.audit.created_at.into(),
    },
});
