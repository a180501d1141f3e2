//! Task priority enumeration.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Urgency of a task.
///
/// Priorities are ordered by urgency: Critical > High > Normal > Low.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    /// Can wait.
    Low,
    /// Regular work.
    #[default]
    Normal,
    /// Should be picked up next.
    High,
    /// Blocks delivery.
    Critical,
}

impl TaskPriority {
    /// Return the urgency level (higher = more urgent).
    pub fn level(&self) -> i64 {
        match self {
            Self::Low => 1,
            Self::Normal => 2,
            Self::High => 3,
            Self::Critical => 4,
        }
    }

    /// Return the priority as a snake_case string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Normal => "normal",
            Self::High => "high",
            Self::Critical => "critical",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
