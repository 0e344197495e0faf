//! Seed failure taxonomy.
//!
//! Collaborators report [`ModelError`]s; the orchestrator files each one
//! under the phase it happened in so the report can say what failed where.

use crate::steps::{ProvisioningStep, SeedStep};
use devseed_orm::ModelError;
use thiserror::Error;
use uuid::Uuid;

pub type SeedResult<T> = Result<T, SeedError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SeedError {
    #[error("Provisioning step {step} failed for workspace {workspace_id}: {message}")]
    Provisioning {
        workspace_id: Uuid,
        step: ProvisioningStep,
        message: String,
    },

    #[error("Metadata synchronization failed for workspace {workspace_id}: {message}")]
    Sync { workspace_id: Uuid, message: String },

    #[error("No data source registered for workspace {workspace_id}")]
    DataSourceNotFound { workspace_id: Uuid },

    #[error("Could not read data source of workspace {workspace_id}: {message}")]
    DataSourceLookup { workspace_id: Uuid, message: String },

    #[error("Could not connect to workspace data source {data_source_id} ({schema})")]
    ConnectionUnavailable { data_source_id: Uuid, schema: String },

    #[error("Failed to load object metadata: {message}")]
    Metadata { message: String },

    #[error("Seed step {step} failed: {message}")]
    SeedStep { step: SeedStep, message: String },

    #[error("Transaction error: {message}")]
    Transaction { message: String },
}

impl SeedError {
    pub fn provisioning(workspace_id: Uuid, step: ProvisioningStep, err: ModelError) -> Self {
        if step == ProvisioningStep::SynchronizeMetadata {
            return Self::Sync {
                workspace_id,
                message: err.to_string(),
            };
        }
        Self::Provisioning {
            workspace_id,
            step,
            message: err.to_string(),
        }
    }

    pub fn data_source_lookup(workspace_id: Uuid, err: ModelError) -> Self {
        match err {
            ModelError::NotFound(_) => Self::DataSourceNotFound { workspace_id },
            other => Self::DataSourceLookup {
                workspace_id,
                message: other.to_string(),
            },
        }
    }

    pub fn metadata(err: ModelError) -> Self {
        Self::Metadata {
            message: err.to_string(),
        }
    }

    pub fn step(step: SeedStep, err: ModelError) -> Self {
        Self::SeedStep {
            step,
            message: err.to_string(),
        }
    }

    pub fn transaction(err: ModelError) -> Self {
        Self::Transaction {
            message: err.to_string(),
        }
    }

    /// Short machine-readable kind, used in the summary table
    pub fn kind(&self) -> &'static str {
        match self {
            SeedError::Provisioning { .. } => "provisioning",
            SeedError::Sync { .. } => "sync",
            SeedError::DataSourceNotFound { .. } => "data-source-not-found",
            SeedError::DataSourceLookup { .. } => "data-source-lookup",
            SeedError::ConnectionUnavailable { .. } => "connection-unavailable",
            SeedError::Metadata { .. } => "metadata",
            SeedError::SeedStep { .. } => "seed-step",
            SeedError::Transaction { .. } => "transaction",
        }
    }
}
