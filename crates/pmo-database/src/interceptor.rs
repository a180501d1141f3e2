//! Save-time audit and soft-delete rewriting.
//!
//! Runs once per commit over the whole staged batch, before anything is
//! sent to storage:
//!
//! | staged op | capability     | rewrite                                               | sent as |
//! |-----------|----------------|-------------------------------------------------------|---------|
//! | Insert    | auditable      | stamp `created_*`, clear `updated_*`                  | Insert  |
//! | Update    | auditable      | stamp `updated_*`, keep stored `created_*`            | Update  |
//! | Delete    | soft-deletable | flag deleted, keep stored audit columns if auditable  | Update  |
//! | Delete    | other          | none                                                  | Delete  |
//!
//! Capabilities are checked per entity, so a mixed batch is handled in one
//! pass. The clock and the actor are read once per pass: every entity in a
//! commit carries the same timestamp and actor id.

use chrono::{DateTime, Utc};
use tracing::debug;

use pmo_core::types::ActorId;
use pmo_entity::AuditStamp;

use crate::unit_of_work::{PendingChange, PendingOp};

/// The instant and actor shared by every change in one commit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuditContext {
    /// Commit timestamp (UTC).
    pub now: DateTime<Utc>,
    /// Acting user.
    pub actor: ActorId,
}

impl AuditContext {
    /// Read the clock now, for `actor`.
    pub fn capture(actor: ActorId) -> Self {
        Self {
            now: Utc::now(),
            actor,
        }
    }

    /// A context at a fixed instant.
    pub fn at(now: DateTime<Utc>, actor: ActorId) -> Self {
        Self { now, actor }
    }
}

/// Counts of what one pass rewrote.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InterceptSummary {
    /// Inserts stamped with creation provenance.
    pub created: usize,
    /// Updates stamped with modification provenance.
    pub updated: usize,
    /// Deletes turned into soft-delete updates.
    pub soft_deleted: usize,
    /// Deletes left as physical deletes.
    pub hard_deleted: usize,
    /// Changes on entities without the relevant capability.
    pub untouched: usize,
}

/// Rewrites staged changes according to their entity's capabilities.
///
/// The pass performs no I/O and cannot fail; an entity lacking a
/// capability is simply passed through.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditInterceptor;

impl AuditInterceptor {
    /// Rewrite `changes` in place.
    pub fn apply(&self, changes: &mut [PendingChange], context: &AuditContext) -> InterceptSummary {
        let mut summary = InterceptSummary::default();

        for change in changes.iter_mut() {
            match change.op {
                PendingOp::Insert => match change.entity.audit_mut() {
                    Some(audit) => {
                        audit.stamp_created(context.now, context.actor);
                        summary.created += 1;
                    }
                    None => summary.untouched += 1,
                },
                PendingOp::Update => match change.entity.audit_mut() {
                    Some(audit) => {
                        audit.stamp_updated(context.now, context.actor);
                        change.preserve(&AuditStamp::CREATION_COLUMNS);
                        summary.updated += 1;
                    }
                    None => summary.untouched += 1,
                },
                PendingOp::Delete => Self::rewrite_delete(change, context, &mut summary),
            }
        }

        debug!(
            actor = %context.actor,
            now = %context.now,
            created = summary.created,
            updated = summary.updated,
            soft_deleted = summary.soft_deleted,
            hard_deleted = summary.hard_deleted,
            untouched = summary.untouched,
            "Audit pass applied"
        );
        summary
    }

    fn rewrite_delete(
        change: &mut PendingChange,
        context: &AuditContext,
        summary: &mut InterceptSummary,
    ) {
        let Some(deletion) = change.entity.soft_delete_mut() else {
            summary.hard_deleted += 1;
            return;
        };
        deletion.mark_deleted(context.now, context.actor);
        change.op = PendingOp::Update;

        // A delete must not look like an edit: keep every stored audit column.
        if change.entity.audit_mut().is_some() {
            change.preserve(&AuditStamp::COLUMNS);
        }
        summary.soft_deleted += 1;
    }
}
