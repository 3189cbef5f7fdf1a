//! Configuration from command-line flags and environment variables.

use clap::Args;
use std::net::SocketAddr;
use store::Database;

/// Where the database lives.
#[derive(Debug, Clone, Args)]
pub struct DatabaseConfig {
    /// SQLite URL (`sqlite::memory:` for a throwaway database)
    #[arg(
        long,
        env = "CINEMA_DATABASE_URL",
        default_value = "sqlite://cinema.db?mode=rwc",
        global = true
    )]
    pub database_url: String,

    /// Maximum pooled connections
    #[arg(long, env = "CINEMA_MAX_CONNECTIONS", default_value_t = 5, global = true)]
    pub max_connections: u32,
}

impl DatabaseConfig {
    /// Open the configured database and bring its schema up to date.
    pub async fn open(&self) -> store::Result<Database> {
        let db = Database::connect(&self.database_url, self.max_connections).await?;
        db.migrate().await?;
        Ok(db)
    }
}

/// How the HTTP server listens.
#[derive(Debug, Clone, Args)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, env = "CINEMA_BIND", default_value = "127.0.0.1:8000")]
    pub bind: SocketAddr,
}
