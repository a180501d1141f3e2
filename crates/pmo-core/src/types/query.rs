//! List query parameters: ordering, paging and deleted-row visibility.

use serde::{Deserialize, Serialize};

use super::pagination::PageRequest;
use super::sorting::SortDirection;

/// Parameters of a paged list query, minus the row predicate.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListQuery {
    /// Field name to order by, matched case-insensitively. Unknown or
    /// blank names fall back to ascending identity order.
    #[serde(default)]
    pub order_by: Option<String>,
    /// Requested direction for `order_by`.
    #[serde(default)]
    pub direction: SortDirection,
    /// Page to return.
    #[serde(flatten)]
    pub page: PageRequest,
    /// Whether soft-deleted rows are visible.
    #[serde(default)]
    pub include_deleted: bool,
}

impl ListQuery {
    /// Create a query for the given page.
    pub fn new(page: PageRequest) -> Self {
        Self {
            page,
            ..Self::default()
        }
    }

    /// Order by the named field.
    pub fn order_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.order_by = Some(field.into());
        self.direction = direction;
        self
    }

    /// Include soft-deleted rows in the result.
    pub fn with_deleted(mut self) -> Self {
        self.include_deleted = true;
        self
    }

    /// Whether a descending order was requested.
    pub fn is_descending(&self) -> bool {
        self.direction == SortDirection::Desc
    }
}
