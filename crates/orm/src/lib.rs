//! # devseed-orm: database layer for devseed
//!
//! PostgreSQL access used by the seed command: pool construction with a
//! per-schema `search_path`, workspace schema provisioning, the data-source
//! registry, object metadata lookups, a minimal standard-object synchronizer
//! and the registry of open workspace connections.

pub mod data_source;
pub mod database;
pub mod error;
pub mod identifiers;
pub mod metadata;
pub mod registry;
pub mod schema;

pub use data_source::{DataSourceDescriptor, DataSourceRepository};
pub use database::{DatabaseServiceProvider, PoolConfig};
pub use error::{ModelError, OrmError, OrmResult};
pub use identifiers::{qualified_table, quote_ident};
pub use metadata::{
    build_object_metadata_map, FieldMetadata, MetadataSynchronizer, ObjectMetadata,
    ObjectMetadataEntry, ObjectMetadataMap, ObjectMetadataRepository,
};
pub use registry::WorkspaceDataSourceRegistry;
pub use schema::{workspace_schema_name, SchemaProvisioner};
