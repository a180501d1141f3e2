//! Caller-supplied row predicates for list queries.

/// A filter applied to each candidate row before counting and paging.
///
/// Predicates run in memory against the typed entity, so any field
/// (including computed ones) can participate.
pub type Predicate<'a, E> = &'a (dyn Fn(&E) -> bool + Send + Sync);
