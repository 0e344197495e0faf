//! PostgreSQL implementations of the collaborator traits.

use crate::collaborators::{
    Collaborators, ConnectionManager, CoreConnection, CoreDatabase, DataSourceRegistry,
    MetadataSync, ObjectMetadataSource, SchemaProvisioning, WorkspaceConnection,
    WorkspaceTransaction,
};
use crate::seeds;
use crate::steps::{SeedContext, SeedStep};
use async_trait::async_trait;
use devseed_core::SeedConfig;
use devseed_orm::{
    DataSourceDescriptor, DataSourceRepository, DatabaseServiceProvider, MetadataSynchronizer,
    ModelError, ObjectMetadata, ObjectMetadataRepository, OrmResult, PoolConfig,
    SchemaProvisioner, WorkspaceDataSourceRegistry,
};
use sqlx::{PgPool, Postgres, Transaction};
use std::sync::Arc;
use uuid::Uuid;

/// Opens a single-connection pool on the core schema for every workspace
pub struct PgCoreDatabase {
    database_url: String,
    core_schema: String,
}

impl PgCoreDatabase {
    pub fn new(database_url: impl Into<String>, core_schema: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            core_schema: core_schema.into(),
        }
    }
}

#[async_trait]
impl CoreDatabase for PgCoreDatabase {
    async fn open(&self) -> OrmResult<Box<dyn CoreConnection>> {
        let pool = DatabaseServiceProvider::new(self.database_url.clone())
            .with_schema(self.core_schema.clone())
            .with_config(PoolConfig::administrative())
            .create_pool()
            .await?;
        Ok(Box::new(PgCoreConnection {
            pool,
            core_schema: self.core_schema.clone(),
        }))
    }
}

pub struct PgCoreConnection {
    pool: PgPool,
    core_schema: String,
}

#[async_trait]
impl CoreConnection for PgCoreConnection {
    async fn seed_core_schema(&mut self, workspace_id: &Uuid) -> OrmResult<()> {
        let mut conn = self.pool.acquire().await?;
        seeds::core_schema::seed_core_schema(&mut conn, &self.core_schema, workspace_id).await
    }

    async fn close(self: Box<Self>) {
        self.pool.close().await;
    }
}

#[async_trait]
impl SchemaProvisioning for SchemaProvisioner {
    async fn create_workspace_schema(&self, workspace_id: &Uuid) -> OrmResult<String> {
        SchemaProvisioner::create_workspace_schema(self, workspace_id).await
    }
}

#[async_trait]
impl DataSourceRegistry for DataSourceRepository {
    async fn create_data_source(
        &self,
        workspace_id: &Uuid,
        schema: &str,
    ) -> OrmResult<DataSourceDescriptor> {
        self.create_data_source_metadata(workspace_id, schema).await
    }

    async fn last_data_source(&self, workspace_id: &Uuid) -> OrmResult<DataSourceDescriptor> {
        self.last_data_source_for_workspace(workspace_id).await
    }
}

#[async_trait]
impl MetadataSync for MetadataSynchronizer {
    async fn synchronize(&self, workspace_id: &Uuid, data_source_id: &Uuid) -> OrmResult<()> {
        MetadataSynchronizer::synchronize(self, workspace_id, data_source_id)
            .await
            .map(|_| ())
    }
}

#[async_trait]
impl ObjectMetadataSource for ObjectMetadataRepository {
    async fn find_many_within_workspace(&self, workspace_id: &Uuid) -> OrmResult<Vec<ObjectMetadata>> {
        ObjectMetadataRepository::find_many_within_workspace(self, workspace_id).await
    }
}

/// Workspace connections backed by [`WorkspaceDataSourceRegistry`]
pub struct PgConnectionManager {
    registry: WorkspaceDataSourceRegistry,
}

impl PgConnectionManager {
    pub fn new(registry: WorkspaceDataSourceRegistry) -> Self {
        Self { registry }
    }
}

#[async_trait]
impl ConnectionManager for PgConnectionManager {
    async fn connect(&self, descriptor: &DataSourceDescriptor) -> Option<Arc<dyn WorkspaceConnection>> {
        match self.registry.connect_to_data_source(descriptor).await {
            Ok(pool) => Some(Arc::new(PgWorkspaceConnection { pool })),
            Err(e) => {
                tracing::error!(
                    data_source_id = %descriptor.id,
                    schema = %descriptor.schema,
                    error = %e,
                    "Failed to connect to workspace data source"
                );
                None
            }
        }
    }

    async fn disconnect(&self, data_source_id: &Uuid) {
        self.registry.disconnect_from_data_source(data_source_id).await;
    }
}

pub struct PgWorkspaceConnection {
    pool: PgPool,
}

#[async_trait]
impl WorkspaceConnection for PgWorkspaceConnection {
    async fn begin(&self) -> OrmResult<Box<dyn WorkspaceTransaction>> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| ModelError::Transaction(format!("Failed to begin transaction: {}", e)))?;
        Ok(Box::new(PgWorkspaceTransaction { tx }))
    }

    async fn run_step(&self, step: SeedStep, ctx: &SeedContext<'_>) -> OrmResult<()> {
        let mut conn = self.pool.acquire().await?;
        seeds::run_step(&mut conn, step, ctx).await
    }
}

pub struct PgWorkspaceTransaction {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl WorkspaceTransaction for PgWorkspaceTransaction {
    async fn run_step(&mut self, step: SeedStep, ctx: &SeedContext<'_>) -> OrmResult<()> {
        seeds::run_step(&mut self.tx, step, ctx).await
    }

    async fn commit(self: Box<Self>) -> OrmResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| ModelError::Transaction(format!("Failed to commit transaction: {}", e)))
    }

    async fn rollback(self: Box<Self>) -> OrmResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| ModelError::Transaction(format!("Failed to rollback transaction: {}", e)))
    }
}

/// Wire every collaborator to the database at `database_url`
pub async fn postgres_collaborators(
    database_url: &str,
    config: &SeedConfig,
) -> OrmResult<Collaborators> {
    let pool = DatabaseServiceProvider::new(database_url)
        .with_max_connections(2)
        .create_pool()
        .await?;

    tracing::info!(
        core_schema = %config.core_schema,
        metadata_schema = %config.metadata_schema,
        "Connected to seed database"
    );

    Ok(Collaborators {
        core: Arc::new(PgCoreDatabase::new(database_url, config.core_schema.clone())),
        schemas: Arc::new(SchemaProvisioner::new(pool.clone())),
        data_sources: Arc::new(DataSourceRepository::new(pool.clone(), &config.metadata_schema)),
        metadata_sync: Arc::new(MetadataSynchronizer::new(pool.clone(), &config.metadata_schema)),
        object_metadata: Arc::new(ObjectMetadataRepository::new(pool, &config.metadata_schema)),
        connections: Arc::new(PgConnectionManager::new(
            WorkspaceDataSourceRegistry::new(database_url).with_config(PoolConfig::administrative()),
        )),
    })
}
