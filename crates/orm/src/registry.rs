//! Open workspace connections, keyed by data-source id.

use crate::data_source::DataSourceDescriptor;
use crate::database::{DatabaseServiceProvider, PoolConfig};
use crate::error::OrmResult;
use dashmap::DashMap;
use sqlx::PgPool;
use uuid::Uuid;

/// Connects to workspace schemas and remembers the pools until disconnected
pub struct WorkspaceDataSourceRegistry {
    database_url: String,
    config: PoolConfig,
    pools: DashMap<Uuid, PgPool>,
}

impl WorkspaceDataSourceRegistry {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            config: PoolConfig::default(),
            pools: DashMap::new(),
        }
    }

    pub fn with_config(mut self, config: PoolConfig) -> Self {
        self.config = config;
        self
    }

    /// Pool scoped to the descriptor's schema; reused while connected
    pub async fn connect_to_data_source(&self, descriptor: &DataSourceDescriptor) -> OrmResult<PgPool> {
        if let Some(pool) = self.pools.get(&descriptor.id).map(|entry| entry.value().clone()) {
            return Ok(pool);
        }

        let pool = DatabaseServiceProvider::new(self.database_url.clone())
            .with_schema(descriptor.schema.clone())
            .with_config(self.config.clone())
            .create_pool()
            .await?;

        tracing::debug!(
            data_source_id = %descriptor.id,
            schema = %descriptor.schema,
            "connected to workspace data source"
        );
        self.pools.insert(descriptor.id, pool.clone());
        Ok(pool)
    }

    /// Close and forget the pool. Returns false if nothing was connected.
    pub async fn disconnect_from_data_source(&self, data_source_id: &Uuid) -> bool {
        match self.pools.remove(data_source_id) {
            Some((_, pool)) => {
                pool.close().await;
                tracing::debug!(%data_source_id, "disconnected from workspace data source");
                true
            }
            None => false,
        }
    }

    pub fn is_connected(&self, data_source_id: &Uuid) -> bool {
        self.pools.contains_key(data_source_id)
    }

    pub fn connection_count(&self) -> usize {
        self.pools.len()
    }
}
