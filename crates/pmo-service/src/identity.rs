//! Identity providers for units of work that do not run inside a request.

use serde::{Deserialize, Serialize};

use pmo_core::traits::{IdentityProvider, resolve_actor};
use pmo_core::types::ActorId;

/// Always reports the same actor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticIdentity(pub ActorId);

impl IdentityProvider for StaticIdentity {
    fn current_actor_id(&self) -> ActorId {
        self.0
    }
}

/// Identity taken from token claims.
///
/// The `sub` claim holds the numeric user id. A missing or malformed
/// subject is attributed to [`ActorId::SYSTEM`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClaimsIdentity {
    /// Subject claim.
    #[serde(rename = "sub", default)]
    pub subject: Option<String>,
}

impl ClaimsIdentity {
    /// Claims with the given subject.
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            subject: Some(subject.into()),
        }
    }

    /// Claims with no subject.
    pub fn anonymous() -> Self {
        Self::default()
    }
}

impl IdentityProvider for ClaimsIdentity {
    fn current_actor_id(&self) -> ActorId {
        let lookup = match self.subject.as_deref() {
            Some(subject) => subject
                .parse::<ActorId>()
                .map_err(|e| format!("invalid subject claim {subject:?}: {e}")),
            None => Err("no subject claim".to_string()),
        };
        resolve_actor(lookup)
    }
}
