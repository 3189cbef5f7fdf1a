//! Database handle and connection setup.
//!
//! `Database` owns the connection pool. The entity operations live in
//! their own modules as further `impl Database` blocks:
//! - `catalog`: genres, actors, cinema halls
//! - `movies`: movies and their genre/actor links
//! - `sessions`: movie sessions and seat availability
//! - `orders`: orders and tickets
//! - `users`: identities and their tokens

use crate::error::Result;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite};
use std::str::FromStr;
use tracing::info;

/// URL prefix for private in-memory databases
const MEMORY_URL: &str = "sqlite::memory:";

/// Handle to the cinema database.
///
/// Cloning is cheap: clones share the same pool.
#[derive(Debug, Clone)]
pub struct Database {
    pub(crate) pool: SqlitePool,
}

impl Database {
    /// Open (creating if needed) the database at `url`.
    ///
    /// # Arguments
    /// * `url` - A SQLite URL such as `sqlite://cinema.db?mode=rwc`
    /// * `max_connections` - Upper bound for the pool
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self> {
        if url.starts_with(MEMORY_URL) {
            return Self::in_memory().await;
        }

        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await?;

        info!("Connected to {} (max {} connections)", url, max_connections);
        Ok(Self { pool })
    }

    /// Open a private in-memory database.
    ///
    /// Every SQLite memory connection is its own database, so the pool is
    /// pinned to one connection that is never closed for idleness.
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str(MEMORY_URL)?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    /// Apply any pending schema migrations
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        info!("Database schema is up to date");
        Ok(())
    }

    /// The underlying pool, for callers that need raw access
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

/// Push `?, ?, ...` bound to `ids`
pub(crate) fn push_id_list(query: &mut QueryBuilder<'_, Sqlite>, ids: &[i64]) {
    let mut list = query.separated(", ");
    for id in ids {
        list.push_bind(*id);
    }
}
