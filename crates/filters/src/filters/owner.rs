//! Ownership predicate for orders.

use crate::traits::Filter;
use sqlx::{QueryBuilder, Sqlite};

/// Keeps orders placed by one user.
///
/// Order queries take this as an explicit argument; nothing in the store
/// reads the requesting user from anywhere else.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OwnedBy {
    user_id: i64,
}

impl OwnedBy {
    pub fn new(user_id: i64) -> Self {
        Self { user_id }
    }

    pub fn user_id(&self) -> i64 {
        self.user_id
    }
}

impl Filter for OwnedBy {
    fn name(&self) -> &str {
        "OwnedBy"
    }

    fn apply(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        query.push(" AND o.user_id = ");
        query.push_bind(self.user_id);
    }
}
