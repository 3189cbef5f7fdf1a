//! Case-insensitive title search on movies.

use crate::traits::Filter;
use sqlx::{QueryBuilder, Sqlite};

/// Keeps movies whose title contains the needle, ignoring case.
///
/// Case folding is SQLite's built-in `lower()`, which only folds ASCII
/// letters: `matrix` finds "The MATRIX", but `амели` does not find
/// "Амели". Non-ASCII titles match only with the same case.
#[derive(Debug, Clone)]
pub struct TitleContains {
    needle: String,
}

impl TitleContains {
    pub fn new(needle: impl Into<String>) -> Self {
        Self {
            needle: needle.into(),
        }
    }
}

impl Filter for TitleContains {
    fn name(&self) -> &str {
        "TitleContains"
    }

    fn apply(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        // instr() avoids escaping LIKE wildcards in the needle
        query.push(" AND instr(lower(m.title), lower(");
        query.push_bind(self.needle.clone());
        query.push(")) > 0");
    }
}
