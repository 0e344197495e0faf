//! Database pools scoped to a single schema.
//!
//! Every pool built here pins `search_path` to one schema on each new
//! connection, so the administrative `core` connection and each workspace
//! connection only ever see their own tables by default.

use crate::error::ModelError;
use crate::identifiers::quote_ident;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Postgres};
use std::time::Duration;

/// Connection pool configuration
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout: u64,
    pub idle_timeout: Option<u64>,
    pub test_before_acquire: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 5,
            min_connections: 0,
            acquire_timeout: 30,
            idle_timeout: Some(600), // 10 minutes
            test_before_acquire: true,
        }
    }
}

impl PoolConfig {
    /// Single-connection pool for short administrative work
    pub fn administrative() -> Self {
        Self {
            max_connections: 1,
            idle_timeout: None,
            ..Self::default()
        }
    }
}

/// Builder for schema-scoped PostgreSQL pools
#[derive(Debug, Clone)]
pub struct DatabaseServiceProvider {
    database_url: String,
    schema: Option<String>,
    config: PoolConfig,
}

impl DatabaseServiceProvider {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            schema: None,
            config: PoolConfig::default(),
        }
    }

    pub fn with_config(mut self, config: PoolConfig) -> Self {
        self.config = config;
        self
    }

    /// Pin `search_path` of every connection to `schema`
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn with_max_connections(mut self, max_connections: u32) -> Self {
        self.config.max_connections = max_connections;
        self
    }

    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Statement run on every new connection, if a schema is set
    pub fn search_path_statement(&self) -> Option<String> {
        self.schema
            .as_deref()
            .map(|schema| format!("SET search_path TO {}", quote_ident(schema)))
    }

    fn pool_options(&self) -> PgPoolOptions {
        let mut options = PgPoolOptions::new()
            .max_connections(self.config.max_connections)
            .min_connections(self.config.min_connections)
            .acquire_timeout(Duration::from_secs(self.config.acquire_timeout))
            .test_before_acquire(self.config.test_before_acquire);

        if let Some(idle_timeout) = self.config.idle_timeout {
            options = options.idle_timeout(Duration::from_secs(idle_timeout));
        }

        if let Some(statement) = self.search_path_statement() {
            options = options.after_connect(move |conn, _meta| {
                let statement = statement.clone();
                Box::pin(async move {
                    sqlx::query(&statement).execute(&mut *conn).await?;
                    Ok(())
                })
            });
        }

        options
    }

    /// Open the pool and verify one connection
    pub async fn create_pool(&self) -> Result<PgPool, ModelError> {
        tracing::debug!(
            schema = self.schema.as_deref().unwrap_or("<default>"),
            max_connections = self.config.max_connections,
            "creating database pool"
        );

        let pool: sqlx::Pool<Postgres> = self
            .pool_options()
            .connect(&self.database_url)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create database pool: {}", e);
                ModelError::Connection(format!("Failed to create database pool: {}", e))
            })?;

        Ok(pool)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn administrative_pool_holds_one_connection() {
        let config = PoolConfig::administrative();
        assert_eq!(config.max_connections, 1);
        assert_eq!(config.idle_timeout, None);
        assert!(config.test_before_acquire);
    }

    #[test]
    fn search_path_is_quoted() {
        let provider = DatabaseServiceProvider::new("postgres://localhost/default")
            .with_schema("workspace_1wgvd1injqtife6y4rvfbu3h5");
        assert_eq!(
            provider.search_path_statement().unwrap(),
            "SET search_path TO \"workspace_1wgvd1injqtife6y4rvfbu3h5\""
        );
        assert!(DatabaseServiceProvider::new("postgres://localhost/default")
            .search_path_statement()
            .is_none());
    }

    #[tokio::test]
    async fn unreachable_database_is_a_connection_error() {
        let provider = DatabaseServiceProvider::new("postgres://nobody@127.0.0.1:1/none")
            .with_config(PoolConfig {
                acquire_timeout: 1,
                ..PoolConfig::administrative()
            });
        let err = provider.create_pool().await.unwrap_err();
        assert!(matches!(err, ModelError::Connection(_)));
    }
}
