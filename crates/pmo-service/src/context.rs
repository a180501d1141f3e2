//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use pmo_core::traits::IdentityProvider;
use pmo_core::types::ActorId;
use pmo_entity::user::UserRole;

/// Context for the current authenticated request.
///
/// Built by the hosting layer and passed into services so that every
/// unit of work knows who is acting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    /// The authenticated user's id.
    pub user_id: ActorId,
    /// The user's login name.
    pub user_name: String,
    /// The user's role.
    pub role: UserRole,
    /// When the request was received.
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    /// Creates a new request context stamped with the current time.
    pub fn new(user_id: ActorId, user_name: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id,
            user_name: user_name.into(),
            role,
            request_time: Utc::now(),
        }
    }

    /// A context for unattended jobs, acting as the system user.
    pub fn system() -> Self {
        Self::new(ActorId::SYSTEM, "system", UserRole::Admin)
    }
}

impl IdentityProvider for RequestContext {
    fn current_actor_id(&self) -> ActorId {
        self.user_id
    }
}
