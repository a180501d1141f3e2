//! Machine entity model.

use serde::{Deserialize, Serialize};

use crate::capability::Deletion;

/// Billable equipment activities can be logged on.
///
/// Machines keep no audit provenance; retiring one is a soft delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Machine {
    /// Unique machine identifier.
    #[serde(default)]
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Manufacturer serial number.
    #[serde(default)]
    pub serial_number: Option<String>,
    /// Billing rate per hour of use.
    #[serde(default)]
    pub hourly_rate: f64,
    /// Soft-delete state.
    #[serde(flatten)]
    pub deletion: Deletion,
}

impl Machine {
    /// Create an unsaved machine.
    pub fn new(name: impl Into<String>, hourly_rate: f64) -> Self {
        Self {
            id: 0,
            name: name.into(),
            serial_number: None,
            hourly_rate,
            deletion: Deletion::default(),
        }
    }
}

crate::impl_entity!(Machine {
    table: "machines",
    deletion: deletion,
    sort: {
        "Name" => |m| (&m.name).into(),
        "SerialNumber" => |m| m.serial_number.as_ref().into(),
        "HourlyRate" => |m| m.hourly_rate.into(),
    },
});
