//! Acting-principal lookup consumed by the persistence layer.

use std::fmt::Display;

use tracing::warn;

use crate::types::id::ActorId;

/// Supplies the id of the user performing the current unit of work.
///
/// Implementations must not fail: when no principal can be resolved they
/// return [`ActorId::SYSTEM`].
pub trait IdentityProvider: Send + Sync {
    /// The acting user's id, or [`ActorId::SYSTEM`] when anonymous.
    fn current_actor_id(&self) -> ActorId;
}

impl<F> IdentityProvider for F
where
    F: Fn() -> ActorId + Send + Sync,
{
    fn current_actor_id(&self) -> ActorId {
        self()
    }
}

/// Collapse a fallible identity lookup into an actor id.
///
/// Lookup failures are logged and degrade to [`ActorId::SYSTEM`]; writes
/// are never aborted because the actor could not be attributed.
pub fn resolve_actor<E: Display>(lookup: Result<ActorId, E>) -> ActorId {
    match lookup {
        Ok(actor) => actor,
        Err(e) => {
            warn!(error = %e, "Identity lookup failed, attributing writes to system actor");
            ActorId::SYSTEM
        }
    }
}
