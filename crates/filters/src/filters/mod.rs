//! Filter implementations for store queries.
//!
//! This module contains all the concrete filters that can be composed
//! into a FilterPipeline. Each filter targets the table alias used by the
//! store query it is meant for:
//! - `m`: movies
//! - `ms`: movie sessions
//! - `o`: orders

pub mod match_nothing;
pub mod owner;
pub mod related;
pub mod session;
pub mod title;

// Re-export for convenience
pub use match_nothing::MatchNothing;
pub use owner::OwnedBy;
pub use related::RelatedAny;
pub use session::{SessionOfMovie, ShowDate};
pub use title::TitleContains;
