//! Pagination types for list queries.

use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

use crate::config::PaginationConfig;

/// Default page size.
pub const DEFAULT_PAGE_SIZE: u64 = 25;
/// Maximum page size.
pub const MAX_PAGE_SIZE: u64 = 100;

/// Request parameters for paginated queries.
///
/// This is the validation boundary for page bounds: the constructors clamp
/// out-of-range values so [`Paged`] only ever sees `page >= 1` and
/// `page_size >= 1`. Deserialized requests are clamped the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPageRequest")]
pub struct PageRequest {
    /// Page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
}

/// Page bounds as they arrive on the wire, before clamping.
#[derive(Deserialize)]
struct RawPageRequest {
    #[serde(default = "default_page")]
    page: u64,
    #[serde(default = "default_page_size")]
    page_size: u64,
}

impl From<RawPageRequest> for PageRequest {
    fn from(raw: RawPageRequest) -> Self {
        Self::new(raw.page, raw.page_size)
    }
}

impl PageRequest {
    /// Create a new page request, clamped to the built-in limits.
    pub fn new(page: u64, page_size: u64) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Create a page request clamped to configured limits.
    ///
    /// A missing page size takes the configured default.
    pub fn with_limits(page: u64, page_size: Option<u64>, limits: &PaginationConfig) -> Self {
        let max = limits.max_page_size.max(1);
        let size = page_size.unwrap_or(limits.default_page_size);
        Self {
            page: page.max(1),
            page_size: size.clamp(1, max),
        }
    }

    /// Number of rows skipped before this page.
    pub fn offset(&self) -> u64 {
        (self.page.saturating_sub(1)).saturating_mul(self.page_size)
    }

    /// Number of rows taken for this page.
    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus total-record metadata.
///
/// `total_pages` is never stored; it is derived from `total_records` and
/// `page_size` on every read and emitted by the serializer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Paged<T> {
    /// Current page number (1-based).
    pub page: u64,
    /// Number of items per page.
    pub page_size: u64,
    /// Total number of matching records across all pages.
    pub total_records: u64,
    /// The items on this page, at most `page_size` of them.
    pub data: Vec<T>,
}

impl<T> Paged<T> {
    /// Create a new page.
    pub fn new(data: Vec<T>, request: PageRequest, total_records: u64) -> Self {
        Self {
            page: request.page,
            page_size: request.page_size,
            total_records,
            data,
        }
    }

    /// `ceil(total_records / page_size)`; zero when there are no records.
    pub fn total_pages(&self) -> u64 {
        if self.page_size == 0 {
            return 0;
        }
        self.total_records.div_ceil(self.page_size)
    }

    /// Whether there is a next page.
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Whether there is a previous page.
    pub fn has_previous(&self) -> bool {
        self.page > 1
    }

    /// Transform the items while keeping the paging metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Paged<U> {
        Paged {
            page: self.page,
            page_size: self.page_size,
            total_records: self.total_records,
            data: self.data.into_iter().map(f).collect(),
        }
    }
}

impl<T: Serialize> Serialize for Paged<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Paged", 5)?;
        state.serialize_field("page", &self.page)?;
        state.serialize_field("page_size", &self.page_size)?;
        state.serialize_field("total_records", &self.total_records)?;
        state.serialize_field("total_pages", &self.total_pages())?;
        state.serialize_field("data", &self.data)?;
        state.end()
    }
}

fn default_page() -> u64 {
    1
}

fn default_page_size() -> u64 {
    DEFAULT_PAGE_SIZE
}
