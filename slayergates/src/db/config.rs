//! Database configuration module.
//!
//! Provides configuration structures for the SQLite connection pool.

use std::env;

/// In-memory database URL used by tests and dry runs
pub const IN_MEMORY_URL: &str = "sqlite::memory:";

/// Database configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// SQLite connection URL (`sqlite://path/to/file.db` or `sqlite::memory:`)
    pub database_url: String,

    /// Maximum number of connections in the pool
    pub max_connections: u32,

    /// Connection acquire timeout in seconds
    pub connection_timeout_secs: u64,

    /// Create the database file when it does not exist yet
    pub create_if_missing: bool,
}

impl DatabaseConfig {
    /// Create configuration from environment variables
    ///
    /// Expected environment variables:
    /// - `DATABASE_URL`: SQLite connection string (default: `sqlite://slayergates.db`)
    /// - `DB_MAX_CONNECTIONS`: Maximum pool size (default: 5)
    /// - `DB_CONNECTION_TIMEOUT_SECS`: Acquire timeout in seconds (default: 10)
    ///
    /// Unparseable numeric values fall back to their defaults. An in-memory
    /// URL forces a single connection.
    pub fn from_env() -> Self {
        let defaults = Self::development();

        let config = Self {
            database_url: env::var("DATABASE_URL").unwrap_or(defaults.database_url),
            max_connections: env::var("DB_MAX_CONNECTIONS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_connections),
            connection_timeout_secs: env::var("DB_CONNECTION_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.connection_timeout_secs),
            create_if_missing: true,
        };
        let max_connections = config.pool_size();

        Self {
            max_connections,
            ..config
        }
    }

    /// Create a default configuration for development
    ///
    /// Uses `sqlite://slayergates.db` in the working directory.
    pub fn development() -> Self {
        Self {
            database_url: "sqlite://slayergates.db".to_string(),
            max_connections: 5,
            connection_timeout_secs: 10,
            create_if_missing: true,
        }
    }

    /// Configuration for a private in-memory database
    ///
    /// The pool is pinned to a single connection: every SQLite in-memory
    /// connection is its own database.
    pub fn in_memory() -> Self {
        Self {
            database_url: IN_MEMORY_URL.to_string(),
            max_connections: 1,
            connection_timeout_secs: 5,
            create_if_missing: true,
        }
    }

    /// True when this configuration points at an in-memory database
    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:") || self.database_url.contains("mode=memory")
    }

    /// Pool size actually used: one connection for in-memory databases
    pub fn pool_size(&self) -> u32 {
        if self.is_in_memory() {
            1
        } else {
            self.max_connections
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::development()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_memory_config() {
        let config = DatabaseConfig::in_memory();
        assert!(config.is_in_memory());
        assert_eq!(config.max_connections, 1);
    }

    #[test]
    fn test_in_memory_url_forces_single_connection() {
        let config = DatabaseConfig {
            database_url: "sqlite::memory:".to_string(),
            max_connections: 5,
            ..DatabaseConfig::development()
        };
        assert_eq!(config.pool_size(), 1);

        let shared = DatabaseConfig {
            database_url: "sqlite:file:league?mode=memory&cache=shared".to_string(),
            ..config.clone()
        };
        assert_eq!(shared.pool_size(), 1);

        assert_eq!(DatabaseConfig::development().pool_size(), 5);
    }

    #[test]
    fn test_development_is_file_backed() {
        let config = DatabaseConfig::default();
        assert!(!config.is_in_memory());
        assert!(config.database_url.starts_with("sqlite://"));
    }
}
