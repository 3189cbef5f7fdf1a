//! Error types for parsing filter parameters.

use thiserror::Error;

/// Errors raised while turning raw query-string values into filters.
///
/// Callers decide what a parse failure means: the movie listing treats it
/// as "match nothing", the session listing reports it to the client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FilterError {
    /// A comma-separated id list contained a token that is not an integer
    #[error("Invalid id: {token:?}")]
    InvalidId { token: String },

    /// A date parameter was not in `YYYY-MM-DD` form
    #[error("Invalid date: {value:?}")]
    InvalidDate { value: String },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, FilterError>;
