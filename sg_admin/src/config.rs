//! Admin tool configuration management.
//!
//! Consolidates all environment variable reads and provides validated configuration.

use slayergates::db::DatabaseConfig;

/// Minimum pepper length accepted for password hashing
pub const MIN_PEPPER_LEN: usize = 16;

/// Complete configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct AdminConfig {
    /// Database configuration
    pub database: DatabaseConfig,
    /// Password hashing pepper (required)
    pub password_pepper: String,
    /// Refuse registrations once a tournament has no seats left
    pub enforce_capacity: bool,
    /// Only allow the edges of the match lifecycle graph
    pub strict_transitions: bool,
}

impl AdminConfig {
    /// Load configuration from environment variables
    ///
    /// # Arguments
    ///
    /// * `database_url_override` - Optional database URL override (from CLI args)
    ///
    /// # Returns
    ///
    /// * `Result<AdminConfig, ConfigError>` - Loaded configuration or error
    ///
    /// # Errors
    ///
    /// Returns error if `PASSWORD_PEPPER` is missing or too short
    pub fn from_env(database_url_override: Option<String>) -> Result<Self, ConfigError> {
        let mut database = DatabaseConfig::from_env();
        if let Some(url) = database_url_override {
            database.database_url = url;
        }

        let password_pepper =
            std::env::var("PASSWORD_PEPPER").map_err(|_| ConfigError::MissingRequired {
                var: "PASSWORD_PEPPER".to_string(),
                hint: "Generate with: openssl rand -hex 16".to_string(),
            })?;

        if password_pepper.len() < MIN_PEPPER_LEN {
            return Err(ConfigError::Invalid {
                var: "PASSWORD_PEPPER".to_string(),
                reason: format!("Must be at least {MIN_PEPPER_LEN} characters"),
            });
        }

        Ok(AdminConfig {
            database,
            password_pepper,
            enforce_capacity: parse_env_or("ENFORCE_TOURNAMENT_CAPACITY", false),
            strict_transitions: parse_env_or("STRICT_MATCH_TRANSITIONS", false),
        })
    }

    /// Validate configuration after loading
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.database.database_url.starts_with("sqlite:") {
            return Err(ConfigError::Invalid {
                var: "DATABASE_URL".to_string(),
                reason: "Must be a sqlite: URL".to_string(),
            });
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_MAX_CONNECTIONS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        if self.database.connection_timeout_secs == 0 {
            return Err(ConfigError::Invalid {
                var: "DB_CONNECTION_TIMEOUT_SECS".to_string(),
                reason: "Must be greater than 0".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {var}\nHint: {hint}")]
    MissingRequired { var: String, hint: String },

    #[error("Invalid configuration for {var}: {reason}")]
    Invalid { var: String, reason: String },
}

/// Helper to parse environment variable with default fallback
fn parse_env_or<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
