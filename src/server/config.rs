/**
 * Server Configuration
 *
 * Configuration is loaded from environment variables. The database is
 * required: the server refuses to start without `DATABASE_URL` rather
 * than limping along without persistence.
 */

use sqlx::PgPool;
use thiserror::Error;

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("DATABASE_URL is not set")]
    MissingDatabaseUrl,
    #[error("invalid SERVER_PORT: {0}")]
    InvalidPort(String),
}

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub port: u16,
}

impl ServerConfig {
    /// Load configuration from the environment
    ///
    /// `SERVER_PORT` defaults to 5000 when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url =
            std::env::var("DATABASE_URL").map_err(|_| ConfigError::MissingDatabaseUrl)?;

        let port = match std::env::var("SERVER_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| ConfigError::InvalidPort(raw))?,
            Err(_) => 5000,
        };

        Ok(Self { database_url, port })
    }
}

/// Connect to the database and run migrations
pub async fn connect_database(database_url: &str) -> Result<PgPool, sqlx::Error> {
    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url).await?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!()
        .run(&pool)
        .await
        .map_err(|e| sqlx::Error::Migrate(Box::new(e)))?;

    tracing::info!("Database ready");
    Ok(pool)
}
