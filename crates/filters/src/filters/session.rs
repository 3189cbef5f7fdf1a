//! Filters for the movie session listing.

use crate::traits::Filter;
use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite};

/// Keeps sessions shown on the given calendar day.
#[derive(Debug, Clone, Copy)]
pub struct ShowDate {
    date: NaiveDate,
}

impl ShowDate {
    pub fn new(date: NaiveDate) -> Self {
        Self { date }
    }
}

impl Filter for ShowDate {
    fn name(&self) -> &str {
        "ShowDate"
    }

    fn apply(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        query.push(" AND date(ms.show_time) = ");
        query.push_bind(self.date.format("%Y-%m-%d").to_string());
    }
}

/// Keeps sessions of one movie.
#[derive(Debug, Clone, Copy)]
pub struct SessionOfMovie {
    movie_id: i64,
}

impl SessionOfMovie {
    pub fn new(movie_id: i64) -> Self {
        Self { movie_id }
    }
}

impl Filter for SessionOfMovie {
    fn name(&self) -> &str {
        "SessionOfMovie"
    }

    fn apply(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        query.push(" AND ms.movie_id = ");
        query.push_bind(self.movie_id);
    }
}
