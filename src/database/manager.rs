use sqlx::{postgres::PgPoolOptions, PgPool};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::info;

use crate::config::{DatabaseConfig, StoreBackend};
use crate::database::memory::MemoryStore;
use crate::database::postgres::PgStore;
use crate::database::repository::Store;

/// Errors raised by the store backends
#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("Missing configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid database URL")]
    InvalidDatabaseUrl,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Duplicate key: {0}")]
    Duplicate(String),

    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Builds the store selected by configuration
pub struct DatabaseManager;

impl DatabaseManager {
    pub async fn open(config: &DatabaseConfig) -> Result<Arc<dyn Store>, DatabaseError> {
        match config.backend {
            StoreBackend::Memory => {
                info!("Using in-memory store; data is lost on restart");
                Ok(Arc::new(MemoryStore::new()))
            }
            StoreBackend::Postgres => {
                let pool = Self::connect(config).await?;
                let store = PgStore::new(pool);
                store.migrate().await?;
                Ok(Arc::new(store))
            }
        }
    }

    /// Create a connection pool for `DATABASE_URL`
    pub async fn connect(config: &DatabaseConfig) -> Result<PgPool, DatabaseError> {
        let url = config
            .url
            .as_deref()
            .ok_or(DatabaseError::ConfigMissing("DATABASE_URL"))?;

        info!(
            "Connecting to {}",
            Self::redact_url(url).unwrap_or_else(|_| "<unparseable url>".to_string())
        );
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.connection_timeout))
            .connect(url)
            .await?;

        Ok(pool)
    }

    /// Strip the password from a connection string so it can be logged
    pub fn redact_url(url: &str) -> Result<String, DatabaseError> {
        let mut parsed = url::Url::parse(url).map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        if parsed.password().is_some() {
            parsed
                .set_password(Some("***"))
                .map_err(|_| DatabaseError::InvalidDatabaseUrl)?;
        }
        Ok(parsed.into())
    }
}
