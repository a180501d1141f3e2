//! Project lifecycle status.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where a project is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Scoped but not started.
    #[default]
    Planned,
    /// Work is underway.
    Active,
    /// Temporarily paused.
    OnHold,
    /// Delivered.
    Completed,
    /// Abandoned before delivery.
    Cancelled,
}

impl ProjectStatus {
    /// Whether work can still be logged against the project.
    pub fn is_open(&self) -> bool {
        matches!(self, Self::Planned | Self::Active | Self::OnHold)
    }

    /// Return the status as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Active => "active",
            Self::OnHold => "on_hold",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ProjectStatus {
    type Err = pmo_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "planned" => Ok(Self::Planned),
            "active" => Ok(Self::Active),
            "on_hold" => Ok(Self::OnHold),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(pmo_core::AppError::validation(format!(
                "Invalid project status: '{s}'. Expected one of: planned, active, on_hold, completed, cancelled"
            ))),
        }
    }
}
