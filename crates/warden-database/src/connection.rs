//! PostgreSQL connection pool.

use std::time::Duration;

use sqlx::Connection;
use sqlx::postgres::{PgConnectOptions, PgPool, PgPoolOptions};
use tracing::{debug, info};

use warden_core::config::DatabaseConfig;
use warden_core::error::{AppError, ErrorKind};
use warden_core::result::AppResult;

/// Shared handle to the policy and credential database.
#[derive(Debug, Clone)]
pub struct DatabasePool {
    pool: PgPool,
}

impl DatabasePool {
    /// Opens the pool and waits for the first connection.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        let options = connect_options(config)?;
        info!(
            host = options.get_host(),
            port = options.get_port(),
            database = options.get_database().unwrap_or_default(),
            max_connections = config.max_connections,
            "Connecting to PostgreSQL"
        );

        let pool = pool_options(config)
            .connect_with(options)
            .await
            .map_err(|e| unavailable("Failed to connect to database", e))?;

        info!("Connected to PostgreSQL");
        Ok(Self { pool })
    }

    /// Builds the pool without connecting; connections open on first use.
    pub fn connect_lazy(config: &DatabaseConfig) -> AppResult<Self> {
        let options = connect_options(config)?;
        Ok(Self {
            pool: pool_options(config).connect_lazy_with(options),
        })
    }

    /// The underlying sqlx pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Pings the database over a pooled connection.
    ///
    /// An unreachable database is an error of kind `ServiceUnavailable`.
    pub async fn health_check(&self) -> AppResult<bool> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| unavailable("Database unreachable", e))?;
        conn.ping()
            .await
            .map_err(|e| unavailable("Database ping failed", e))?;
        debug!("Database ping ok");
        Ok(true)
    }

    /// Closes every connection; later queries fail.
    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database pool closed");
    }
}

fn connect_options(config: &DatabaseConfig) -> AppResult<PgConnectOptions> {
    config
        .url
        .parse::<PgConnectOptions>()
        .map_err(|e| AppError::with_source(ErrorKind::Configuration, "Invalid database.url", e))
}

fn pool_options(config: &DatabaseConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .idle_timeout(Duration::from_secs(config.idle_timeout_seconds))
}

fn unavailable(message: &str, err: sqlx::Error) -> AppError {
    AppError::with_source(ErrorKind::ServiceUnavailable, message, err)
}
