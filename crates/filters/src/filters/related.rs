//! Filter movies by their many-to-many relations.
//!
//! Membership is tested with `m.id IN (SELECT movie_id FROM <link> ...)`
//! instead of a join, so a movie linked to several of the requested ids
//! still appears exactly once.

use crate::traits::Filter;
use sqlx::{QueryBuilder, Sqlite};

/// Keeps movies associated with ANY of the given related ids.
///
/// ## Algorithm
/// 1. Look up the link table for the relation (genres or actors)
/// 2. Select the movie ids linked to any requested id
/// 3. Keep movies whose id is in that set
#[derive(Debug, Clone)]
pub struct RelatedAny {
    name: &'static str,
    link_table: &'static str,
    related_column: &'static str,
    ids: Vec<i64>,
}

impl RelatedAny {
    /// Movies in any of the given genres.
    pub fn genres(ids: Vec<i64>) -> Self {
        Self {
            name: "MovieHasAnyGenre",
            link_table: "movie_genres",
            related_column: "genre_id",
            ids,
        }
    }

    /// Movies featuring any of the given actors.
    pub fn actors(ids: Vec<i64>) -> Self {
        Self {
            name: "MovieHasAnyActor",
            link_table: "movie_actors",
            related_column: "actor_id",
            ids,
        }
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }
}

impl Filter for RelatedAny {
    fn name(&self) -> &str {
        self.name
    }

    fn apply(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        if self.ids.is_empty() {
            query.push(" AND 1 = 0");
            return;
        }

        query.push(format!(
            " AND m.id IN (SELECT movie_id FROM {} WHERE {} IN (",
            self.link_table, self.related_column
        ));
        let mut ids = query.separated(", ");
        for id in &self.ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated("))");
    }
}
