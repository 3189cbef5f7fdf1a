//! Core trait for query filters.
//!
//! This module defines the Filter trait that allows composable,
//! extensible predicates to be appended to store queries.

use sqlx::{QueryBuilder, Sqlite};

/// Core trait for filtering store queries.
///
/// All filters must implement this trait to be used in the FilterPipeline.
///
/// ## Design Note
/// - `Send + Sync` allows pipelines to be held across `.await` points
/// - Filters only borrow themselves, so one pipeline can be applied to a
///   count query and a page query in turn
/// - Implementations push a single ` AND <predicate>` fragment and bind
///   every user-supplied value instead of formatting it into the SQL
pub trait Filter: Send + Sync {
    /// Returns the name of this filter (for logging/debugging)
    fn name(&self) -> &str;

    /// Append this filter's predicate to `query`.
    ///
    /// The query must already end in a `WHERE` clause.
    fn apply(&self, query: &mut QueryBuilder<'_, Sqlite>);
}
