// MySQL connection manager with a lazily created, process-wide pool

use crate::config::DatabaseConfig;
use crate::db::session::{MySqlSession, Session, SessionFactory};
use crate::errors::DatabaseError;
use async_trait::async_trait;
use once_cell::sync::OnceCell;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions};
use std::time::Duration;
use tracing::{info, instrument};

/// Owns the connection pool factory.
///
/// The pool is built on first use and reused for the lifetime of the
/// manager; nothing connects until a session runs its first query.
#[derive(Debug)]
pub struct ConnectionManager {
    config: DatabaseConfig,
    pool: OnceCell<MySqlPool>,
}

impl ConnectionManager {
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            config,
            pool: OnceCell::new(),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.pool.get().is_some()
    }

    /// Get the pool, creating it on first call
    pub fn pool(&self) -> &MySqlPool {
        self.pool.get_or_init(|| {
            info!(
                url = %self.config.display_url(),
                max_connections = self.config.max_connections,
                "Initializing database connection pool"
            );

            MySqlPoolOptions::new()
                .max_connections(self.config.max_connections)
                .min_connections(0)
                .acquire_timeout(Duration::from_secs(self.config.connect_timeout_seconds))
                .max_lifetime(Duration::from_secs(self.config.max_lifetime_seconds))
                .test_before_acquire(true)
                .connect_lazy_with(self.config.connect_options())
        })
    }

    /// Perform a health check on the database connection
    #[instrument(skip(self))]
    pub async fn health_check(&self) -> Result<(), DatabaseError> {
        sqlx::query("SELECT 1")
            .execute(self.pool())
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Database health check failed");
                DatabaseError::from(e)
            })?;

        tracing::debug!("Database health check passed");
        Ok(())
    }

    /// Close the connection pool gracefully if it was ever created
    #[instrument(skip(self))]
    pub async fn close(&self) {
        if let Some(pool) = self.pool.get() {
            info!("Closing database connection pool");
            pool.close().await;
        }
    }
}

#[async_trait]
impl SessionFactory for ConnectionManager {
    async fn open_session(&self) -> Result<Box<dyn Session>, DatabaseError> {
        Ok(Box::new(MySqlSession::new(self.pool().clone())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_pool_is_created_once_and_lazily() {
        let manager = ConnectionManager::new(DatabaseConfig::default());
        assert!(!manager.is_initialized());

        let first = manager.pool() as *const MySqlPool;
        assert!(manager.is_initialized());
        let second = manager.pool() as *const MySqlPool;
        assert_eq!(first, second);

        // Lazy pool: no connection attempted yet
        assert_eq!(manager.pool().size(), 0);
    }

    #[tokio::test]
    async fn test_open_session_initializes_pool() {
        let manager = ConnectionManager::new(DatabaseConfig::default());
        let _session = manager.open_session().await.unwrap();
        assert!(manager.is_initialized());
    }

    #[tokio::test]
    #[ignore] // Requires running MySQL instance
    async fn test_health_check() {
        let config = DatabaseConfig {
            user: "root".to_string(),
            password: "root".to_string(),
            ..DatabaseConfig::default()
        };
        let manager = ConnectionManager::new(config);
        assert!(manager.health_check().await.is_ok());
    }
}
