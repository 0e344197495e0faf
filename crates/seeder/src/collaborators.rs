//! Interfaces the orchestrator drives.
//!
//! Each trait is one external service of the seed pipeline. The PostgreSQL
//! implementations live in [`crate::postgres`]; tests use in-memory fakes.

use crate::steps::{SeedContext, SeedStep};
use async_trait::async_trait;
use devseed_orm::{DataSourceDescriptor, ObjectMetadata, OrmResult};
use std::sync::Arc;
use uuid::Uuid;

/// Opens administrative connections scoped to the core schema
#[async_trait]
pub trait CoreDatabase: Send + Sync {
    async fn open(&self) -> OrmResult<Box<dyn CoreConnection>>;
}

#[async_trait]
pub trait CoreConnection: Send {
    /// Insert the core rows (workspace, users, memberships, flags) of a workspace
    async fn seed_core_schema(&mut self, workspace_id: &Uuid) -> OrmResult<()>;

    async fn close(self: Box<Self>);
}

#[async_trait]
pub trait SchemaProvisioning: Send + Sync {
    /// Create or obtain the dedicated schema of a workspace, returning its name
    async fn create_workspace_schema(&self, workspace_id: &Uuid) -> OrmResult<String>;
}

#[async_trait]
pub trait DataSourceRegistry: Send + Sync {
    async fn create_data_source(
        &self,
        workspace_id: &Uuid,
        schema: &str,
    ) -> OrmResult<DataSourceDescriptor>;

    /// Latest data source of a workspace; `ModelError::NotFound` if there is none
    async fn last_data_source(&self, workspace_id: &Uuid) -> OrmResult<DataSourceDescriptor>;
}

#[async_trait]
pub trait MetadataSync: Send + Sync {
    async fn synchronize(&self, workspace_id: &Uuid, data_source_id: &Uuid) -> OrmResult<()>;
}

#[async_trait]
pub trait ObjectMetadataSource: Send + Sync {
    async fn find_many_within_workspace(&self, workspace_id: &Uuid) -> OrmResult<Vec<ObjectMetadata>>;
}

#[async_trait]
pub trait ConnectionManager: Send + Sync {
    /// `None` when the workspace store cannot be reached
    async fn connect(&self, descriptor: &DataSourceDescriptor) -> Option<Arc<dyn WorkspaceConnection>>;

    async fn disconnect(&self, data_source_id: &Uuid);
}

/// Handle to one workspace schema
#[async_trait]
pub trait WorkspaceConnection: Send + Sync {
    async fn begin(&self) -> OrmResult<Box<dyn WorkspaceTransaction>>;

    /// Run a step outside any transaction
    async fn run_step(&self, step: SeedStep, ctx: &SeedContext<'_>) -> OrmResult<()>;
}

#[async_trait]
pub trait WorkspaceTransaction: Send {
    async fn run_step(&mut self, step: SeedStep, ctx: &SeedContext<'_>) -> OrmResult<()>;

    async fn commit(self: Box<Self>) -> OrmResult<()>;

    async fn rollback(self: Box<Self>) -> OrmResult<()>;
}

/// Everything the orchestrator needs, wired once at startup
#[derive(Clone)]
pub struct Collaborators {
    pub core: Arc<dyn CoreDatabase>,
    pub schemas: Arc<dyn SchemaProvisioning>,
    pub data_sources: Arc<dyn DataSourceRegistry>,
    pub metadata_sync: Arc<dyn MetadataSync>,
    pub object_metadata: Arc<dyn ObjectMetadataSource>,
    pub connections: Arc<dyn ConnectionManager>,
}
