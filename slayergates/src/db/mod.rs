//! Database module providing SQLite connection pooling and schema migrations.
//!
//! Every manager in the crate shares the pool owned by [`Database`]; the
//! schema is embedded at compile time from `migrations/`.

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::{str::FromStr, sync::Arc, time::Duration};

use crate::errors::CoreResult;

pub mod config;

pub use config::DatabaseConfig;

/// Embedded schema migrations
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Database connection pool wrapper
#[derive(Clone)]
pub struct Database {
    pool: Arc<SqlitePool>,
}

impl Database {
    /// Create a new database connection pool
    ///
    /// # Arguments
    ///
    /// * `config` - Database configuration
    ///
    /// # Returns
    ///
    /// * `CoreResult<Database>` - Database instance or error
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use slayergates::db::{Database, DatabaseConfig};
    ///
    /// #[tokio::main]
    /// async fn main() -> Result<(), slayergates::CoreError> {
    ///     let config = DatabaseConfig::from_env();
    ///     let db = Database::new(&config).await?;
    ///     db.migrate().await?;
    ///     Ok(())
    /// }
    /// ```
    pub async fn new(config: &DatabaseConfig) -> CoreResult<Self> {
        let options = SqliteConnectOptions::from_str(&config.database_url)?
            .create_if_missing(config.create_if_missing)
            .foreign_keys(true);

        let mut pool_options = SqlitePoolOptions::new()
            .max_connections(config.pool_size())
            .acquire_timeout(Duration::from_secs(config.connection_timeout_secs));

        // Closing the last connection to an in-memory database drops its contents
        if config.is_in_memory() {
            pool_options = pool_options
                .min_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
        }

        let pool = pool_options.connect_with(options).await?;

        log::debug!("Opened database pool for {}", config.database_url);

        Ok(Self {
            pool: Arc::new(pool),
        })
    }

    /// Open a fresh, migrated in-memory database
    pub async fn in_memory() -> CoreResult<Self> {
        let db = Self::new(&DatabaseConfig::in_memory()).await?;
        db.migrate().await?;
        Ok(db)
    }

    /// Apply pending schema migrations
    pub async fn migrate(&self) -> CoreResult<()> {
        MIGRATOR.run(self.pool.as_ref()).await?;
        log::info!("Database schema is up to date");
        Ok(())
    }

    /// Get a shared handle to the connection pool
    pub fn pool(&self) -> Arc<SqlitePool> {
        Arc::clone(&self.pool)
    }

    /// Check if the database connection is healthy
    pub async fn health_check(&self) -> CoreResult<()> {
        sqlx::query("SELECT 1").execute(self.pool.as_ref()).await?;
        Ok(())
    }

    /// Close the database connection pool
    pub async fn close(self) {
        self.pool.close().await;
    }
}
