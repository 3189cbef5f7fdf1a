//! # Store Crate
//!
//! This crate owns the cinema's persistent state in SQLite.
//!
//! ## Main Components
//!
//! - **types**: Core domain types (Genre, Actor, CinemaHall, Movie, MovieSession, Order, ...)
//! - **db**: The `Database` handle, connection setup and migrations
//! - **catalog**: Genres, actors and cinema halls
//! - **movies**: Movies with eager-loaded genres and actors
//! - **sessions**: Sessions with seat availability computed in SQL
//! - **orders**: Atomic order placement and per-user order reads
//! - **users**: Identities and their API tokens
//! - **error**: Error types for store operations
//!
//! ## Example Usage
//!
//! ```ignore
//! use store::Database;
//! use filters::FilterPipeline;
//!
//! let db = Database::connect("sqlite://cinema.db?mode=rwc", 5).await?;
//! db.migrate().await?;
//!
//! for session in db.list_sessions(&FilterPipeline::new()).await? {
//!     println!("{} seats left", session.tickets_available);
//! }
//! ```

pub mod catalog;
pub mod db;
pub mod error;
pub mod movies;
pub mod orders;
pub mod sessions;
pub mod types;
pub mod users;

// Re-export commonly used types for convenience
pub use db::Database;
pub use error::{Result, StoreError, ValidationErrors};
pub use types::*;
