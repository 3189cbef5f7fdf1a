//! A filter that rejects every row.

use crate::traits::Filter;
use sqlx::{QueryBuilder, Sqlite};

/// Collapses the query to an empty result.
///
/// Used where a malformed parameter should produce no rows rather than an
/// error.
#[derive(Debug, Clone, Copy, Default)]
pub struct MatchNothing;

impl Filter for MatchNothing {
    fn name(&self) -> &str {
        "MatchNothing"
    }

    fn apply(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        query.push(" AND 1 = 0");
    }
}
