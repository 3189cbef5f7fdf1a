//! SQL filters for the cinema catalog and order queries.
//!
//! This crate provides:
//! - Filter trait for composable query predicates
//! - FilterPipeline for applying several filters to one query
//! - Concrete filters for movies, sessions and orders
//! - Parsers for the raw query-string values the filters are built from
//!
//! ## Architecture
//! Store queries are written with a `WHERE 1=1` tail. Every filter appends
//! one `AND <predicate>` fragment with bound parameters, so filtering always
//! runs inside the database and never on rows loaded into memory.
//!
//! ## Example Usage
//! ```ignore
//! use filters::{FilterPipeline, parse_ids};
//! use filters::filters::*;
//!
//! let pipeline = FilterPipeline::new()
//!     .add_filter(TitleContains::new("matrix"))
//!     .add_filter(RelatedAny::genres(parse_ids("1,2")?));
//!
//! let mut query = QueryBuilder::new("SELECT m.id FROM movies m WHERE 1=1");
//! pipeline.apply(&mut query);
//! ```

pub mod error;
pub mod filter_pipeline;
pub mod filters;
pub mod parser;
pub mod traits;

// Re-export main types
pub use error::{FilterError, Result};
pub use filter_pipeline::FilterPipeline;
pub use parser::{parse_date, parse_ids};
pub use traits::Filter;
