//! Capability contracts shared by every persisted entity.
//!
//! An entity type declares, once and at compile time, whether it carries
//! audit provenance ([`Auditable`]) and whether deletes are logical
//! ([`SoftDeletable`]). The save pipeline reads those declarations through
//! the accessor methods on [`Entity`], which answer `None` for capabilities
//! the type does not have.

use std::fmt::Debug;

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use pmo_core::types::{ActorId, EntityId, SortValue, SortableField};

/// Column holding the creation timestamp.
pub const CREATED_AT: &str = "created_at";
/// Column holding the creating actor.
pub const CREATED_BY_ID: &str = "created_by_id";
/// Column holding the last modification timestamp.
pub const UPDATED_AT: &str = "updated_at";
/// Column holding the last modifying actor.
pub const UPDATED_BY_ID: &str = "updated_by_id";
/// Column holding the soft-delete flag.
pub const IS_DELETED: &str = "is_deleted";
/// Column holding the deletion timestamp.
pub const DELETED_AT: &str = "deleted_at";
/// Column holding the deleting actor.
pub const DELETED_BY_ID: &str = "deleted_by_id";

/// Audit provenance carried by [`Auditable`] entities.
///
/// `created_*` is written once on insert and never again; `updated_*` is
/// refreshed on every later modification.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditStamp {
    /// When the record was inserted.
    pub created_at: DateTime<Utc>,
    /// Who inserted the record.
    pub created_by_id: i64,
    /// When the record was last modified.
    pub updated_at: Option<DateTime<Utc>>,
    /// Who last modified the record.
    pub updated_by_id: Option<i64>,
}

impl AuditStamp {
    /// Columns that must survive every update untouched.
    pub const CREATION_COLUMNS: [&'static str; 2] = [CREATED_AT, CREATED_BY_ID];
    /// All audit columns.
    pub const COLUMNS: [&'static str; 4] = [CREATED_AT, CREATED_BY_ID, UPDATED_AT, UPDATED_BY_ID];

    /// Stamp creation provenance and clear modification provenance.
    pub fn stamp_created(&mut self, now: DateTime<Utc>, actor: ActorId) {
        self.created_at = now;
        self.created_by_id = actor.get();
        self.updated_at = None;
        self.updated_by_id = None;
    }

    /// Stamp modification provenance.
    pub fn stamp_updated(&mut self, now: DateTime<Utc>, actor: ActorId) {
        self.updated_at = Some(now);
        self.updated_by_id = Some(actor.get());
    }
}

/// Logical-deletion state carried by [`SoftDeletable`] entities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deletion {
    /// Whether the record is logically deleted.
    #[serde(default)]
    pub is_deleted: bool,
    /// When the record was deleted.
    #[serde(default)]
    pub deleted_at: Option<DateTime<Utc>>,
    /// Who deleted the record.
    #[serde(default)]
    pub deleted_by_id: Option<i64>,
}

impl Deletion {
    /// All deletion columns.
    pub const COLUMNS: [&'static str; 3] = [IS_DELETED, DELETED_AT, DELETED_BY_ID];

    /// Flag the record as deleted.
    pub fn mark_deleted(&mut self, now: DateTime<Utc>, actor: ActorId) {
        self.is_deleted = true;
        self.deleted_at = Some(now);
        self.deleted_by_id = Some(actor.get());
    }

    /// Clear the deletion flag.
    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

/// A persisted entity type.
///
/// Implement through [`impl_entity!`](crate::impl_entity) rather than by
/// hand so the capability accessors and marker traits stay consistent.
pub trait Entity: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Storage table name.
    const TABLE: &'static str;

    /// Primary key.
    fn id(&self) -> EntityId;

    /// Overwrite the primary key (used when the store assigns one).
    fn set_id(&mut self, id: EntityId);

    /// Fields callers may order by, in declaration order.
    fn sortable_fields() -> &'static [SortableField<Self>];

    /// Audit provenance, if the type is auditable.
    fn audit_stamp(&self) -> Option<&AuditStamp> {
        None
    }

    /// Mutable audit provenance, if the type is auditable.
    fn audit_stamp_mut(&mut self) -> Option<&mut AuditStamp> {
        None
    }

    /// Deletion state, if the type is soft-deletable.
    fn deletion(&self) -> Option<&Deletion> {
        None
    }

    /// Mutable deletion state, if the type is soft-deletable.
    fn deletion_mut(&mut self) -> Option<&mut Deletion> {
        None
    }

    /// Whether this instance is logically deleted.
    fn is_deleted(&self) -> bool {
        self.deletion().is_some_and(|d| d.is_deleted)
    }
}

/// Marker for entities that carry [`AuditStamp`] provenance.
pub trait Auditable: Entity {
    /// Audit provenance.
    fn audit(&self) -> &AuditStamp;
}

/// Marker for entities whose deletes are logical.
pub trait SoftDeletable: Entity {
    /// Deletion state.
    fn deletion_state(&self) -> &Deletion;
}

/// Declare an [`Entity`] implementation.
///
/// The type must have an `id: i64` field. `audit` and `deletion` name the
/// fields holding [`AuditStamp`] and [`Deletion`]; omitting one means the
/// type lacks that capability. `Id` is always sortable and listed first.
///
/// ```ignore
/// impl_entity!(Client {
///     table: "clients",
///     audit: audit,
///     deletion: deletion,
///     sort: {
///         "Name" => |c| (&c.name).into(),
///     },
/// });
/// ```
#[macro_export]
macro_rules! impl_entity {
    (
        $ty:ty {
            table: $table:literal,
            $(audit: $audit:ident,)?
            $(deletion: $deletion:ident,)?
            sort: { $($name:literal => $key:expr),* $(,)? } $(,)?
        }
    ) => {
        impl $crate::capability::Entity for $ty {
            const TABLE: &'static str = $table;

            fn id(&self) -> $crate::capability::EntityId {
                self.id
            }

            fn set_id(&mut self, id: $crate::capability::EntityId) {
                self.id = id;
            }

            fn sortable_fields() -> &'static [$crate::capability::SortableField<$ty>] {
                const FIELDS: &[$crate::capability::SortableField<$ty>] = &[
                    $crate::capability::SortableField::<$ty>::new("Id", |e| {
                        $crate::capability::SortValue::Int(e.id)
                    }),
                    $($crate::capability::SortableField::<$ty>::new($name, $key),)*
                ];
                FIELDS
            }

            $(
                fn audit_stamp(&self) -> Option<&$crate::capability::AuditStamp> {
                    Some(&self.$audit)
                }

                fn audit_stamp_mut(&mut self) -> Option<&mut $crate::capability::AuditStamp> {
                    Some(&mut self.$audit)
                }
            )?

            $(
                fn deletion(&self) -> Option<&$crate::capability::Deletion> {
                    Some(&self.$deletion)
                }

                fn deletion_mut(&mut self) -> Option<&mut $crate::capability::Deletion> {
                    Some(&mut self.$deletion)
                }
            )?
        }

        $(
            impl $crate::capability::Auditable for $ty {
                fn audit(&self) -> &$crate::capability::AuditStamp {
                    &self.$audit
                }
            }
        )?

        $(
            impl $crate::capability::SoftDeletable for $ty {
                fn deletion_state(&self) -> &$crate::capability::Deletion {
                    &self.$deletion
                }
            }
        )?
    };
}
