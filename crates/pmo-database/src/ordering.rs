//! Dynamic ordering by a caller-supplied field name.
//!
//! Names are resolved once per query against the entity type's static
//! sortable-field table. Matching ignores ASCII case and surrounding
//! whitespace; if several declared fields match, the first one in
//! declaration order wins. A blank or unknown name is not an error: the
//! query falls back to ascending identity order and the requested direction
//! is ignored.

use std::cmp::Reverse;

use tracing::debug;

use pmo_core::types::{SortDirection, SortableField};
use pmo_entity::Entity;

/// An ordering resolved for entity type `T`.
#[derive(Debug)]
pub enum ResolvedOrder<T> {
    /// Ascending by id.
    Identity,
    /// By a declared field.
    Field {
        /// The matched field.
        field: SortableField<T>,
        /// Requested direction.
        direction: SortDirection,
    },
}

impl<T: Entity> ResolvedOrder<T> {
    /// Resolve `field` against `T`'s sortable fields.
    pub fn resolve(field: Option<&str>, descending: bool) -> Self {
        let requested = field.map(str::trim).filter(|name| !name.is_empty());
        let Some(name) = requested else {
            return Self::Identity;
        };

        match T::sortable_fields().iter().find(|f| f.matches(name)) {
            Some(field) => Self::Field {
                field: *field,
                direction: SortDirection::from_descending(descending),
            },
            None => {
                debug!(
                    table = T::TABLE,
                    field = name,
                    "Unknown sort field, falling back to identity order"
                );
                Self::Identity
            }
        }
    }

    /// Name of the field the rows end up ordered by.
    pub fn field_name(&self) -> &'static str {
        match self {
            Self::Identity => "Id",
            Self::Field { field, .. } => field.name,
        }
    }

    /// Effective direction.
    pub fn direction(&self) -> SortDirection {
        match self {
            Self::Identity => SortDirection::Asc,
            Self::Field { direction, .. } => *direction,
        }
    }

    /// Sort `items` in place. The sort is stable, so rows with equal keys
    /// keep their incoming order.
    pub fn apply(&self, items: &mut [T]) {
        match self {
            Self::Identity => items.sort_by_key(|e| e.id()),
            Self::Field {
                field,
                direction: SortDirection::Asc,
            } => items.sort_by_cached_key(|e| (field.key)(e)),
            Self::Field {
                field,
                direction: SortDirection::Desc,
            } => items.sort_by_cached_key(|e| Reverse((field.key)(e))),
        }
    }
}

/// Order `items` by the named field, falling back to identity order.
pub fn order_by<T: Entity>(mut items: Vec<T>, field: Option<&str>, descending: bool) -> Vec<T> {
    ResolvedOrder::<T>::resolve(field, descending).apply(&mut items);
    items
}
