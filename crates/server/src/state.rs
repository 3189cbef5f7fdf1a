//! Shared application state.

use store::Database;

/// State handed to every handler.
///
/// Holds no per-request data; the database handle is a shared pool.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}
