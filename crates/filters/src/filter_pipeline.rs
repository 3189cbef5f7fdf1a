//! The FilterPipeline combines multiple filters.
//!
//! This module provides the main FilterPipeline struct that chains
//! multiple filters together using the builder pattern.

use crate::traits::Filter;
use sqlx::{QueryBuilder, Sqlite};
use std::fmt;

/// Chains multiple filters together into one `WHERE` clause.
///
/// Filters are combined with logical AND, in insertion order.
///
/// ## Usage
/// ```ignore
/// let pipeline = FilterPipeline::new()
///     .add_filter(TitleContains::new("matrix"))
///     .add_filter(RelatedAny::genres(vec![1, 2]));
///
/// let mut query = QueryBuilder::new("SELECT m.id FROM movies m WHERE 1=1");
/// pipeline.apply(&mut query);
/// ```
pub struct FilterPipeline {
    filters: Vec<Box<dyn Filter>>,
}

impl FilterPipeline {
    /// Create a new empty FilterPipeline.
    pub fn new() -> Self {
        Self {
            filters: Vec::new(),
        }
    }

    /// Add a filter to the pipeline (builder pattern).
    ///
    /// # Arguments
    /// * `filter` - Any type implementing the Filter trait
    ///
    /// # Returns
    /// Self for method chaining
    pub fn add_filter(mut self, filter: impl Filter + 'static) -> Self {
        self.filters.push(Box::new(filter));
        self
    }

    /// Add a filter in place, for pipelines built up conditionally.
    pub fn push(&mut self, filter: impl Filter + 'static) {
        self.filters.push(Box::new(filter));
    }

    /// Number of filters in the pipeline
    pub fn len(&self) -> usize {
        self.filters.len()
    }

    /// True when the pipeline adds no predicates
    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }

    /// Names of the filters, in the order they are applied
    pub fn names(&self) -> Vec<&str> {
        self.filters.iter().map(|f| f.name()).collect()
    }

    /// Append every filter's predicate to `query`.
    ///
    /// # Arguments
    /// * `query` - A query whose SQL so far ends in a `WHERE` clause
    pub fn apply(&self, query: &mut QueryBuilder<'_, Sqlite>) {
        for filter in &self.filters {
            tracing::debug!("Applying filter: {}", filter.name());
            filter.apply(query);
        }
    }
}

impl Default for FilterPipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for FilterPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::{MatchNothing, TitleContains};

    const BASE: &str = "SELECT m.id FROM movies m WHERE 1=1";

    #[test]
    fn test_empty_pipeline() {
        let pipeline = FilterPipeline::new();
        let mut query = QueryBuilder::<Sqlite>::new(BASE);

        pipeline.apply(&mut query);

        assert!(pipeline.is_empty());
        assert_eq!(query.sql(), BASE);
    }

    #[test]
    fn test_filters_applied_in_order() {
        let pipeline = FilterPipeline::new()
            .add_filter(TitleContains::new("matrix"))
            .add_filter(MatchNothing);

        let mut query = QueryBuilder::<Sqlite>::new(BASE);
        pipeline.apply(&mut query);

        assert_eq!(pipeline.names(), vec!["TitleContains", "MatchNothing"]);
        assert_eq!(
            query.sql(),
            format!("{BASE} AND instr(lower(m.title), lower(?)) > 0 AND 1 = 0")
        );
    }

    #[test]
    fn test_pipeline_is_reusable() {
        let mut pipeline = FilterPipeline::new();
        pipeline.push(TitleContains::new("alien"));

        let mut count = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM movies m WHERE 1=1");
        let mut page = QueryBuilder::<Sqlite>::new(BASE);
        pipeline.apply(&mut count);
        pipeline.apply(&mut page);

        assert!(count.sql().ends_with("lower(?)) > 0"));
        assert!(page.sql().ends_with("lower(?)) > 0"));
    }
}
