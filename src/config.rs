//! Configuration management for Alexandria server

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Per-request timeout in seconds, applied to the whole pipeline
    pub request_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub uri: String,
    pub name: String,
    pub connect_timeout_secs: u64,
    pub server_selection_timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct SecurityConfig {
    pub secret_key: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub security: SecurityConfig,
}

impl AppConfig {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let config = Config::builder()
            // Start with default configuration
            .add_source(File::with_name("config/default").required(false))
            // Layer on the environment-specific file
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Add environment variables (with prefix ALEXANDRIA_)
            .add_source(
                Environment::with_prefix("ALEXANDRIA")
                    .separator("_")
                    .try_parsing(true),
            )
            // Override connection string from MONGO_URI env var if present
            .set_override_option("database.uri", env::var("MONGO_URI").ok())?
            // Override database name from MONGO_DB_NAME env var if present
            .set_override_option("database.name", env::var("MONGO_DB_NAME").ok())?
            // Override secret key from SECRET_KEY env var if present
            .set_override_option("security.secret_key", env::var("SECRET_KEY").ok())?
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            request_timeout_secs: 30,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            uri: "mongodb://localhost:27017".to_string(),
            name: "library_db".to_string(),
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 10,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            secret_key: "change-this-secret-in-production".to_string(),
        }
    }
}
