//! # devseed-seeder
//!
//! The development seed pipeline. [`SeedOrchestrator`] provisions every
//! configured workspace (core rows, schema, data source, metadata) and then
//! fills each workspace schema with the sample dataset, recording the outcome
//! of every phase in a [`SeedReport`].
//!
//! The orchestrator only talks to the traits in [`collaborators`];
//! [`postgres`] binds them to `devseed-orm`.

pub mod collaborators;
pub mod error;
pub mod orchestrator;
pub mod postgres;
pub mod report;
pub mod seeds;
pub mod steps;

pub use collaborators::{
    Collaborators, ConnectionManager, CoreConnection, CoreDatabase, DataSourceRegistry,
    MetadataSync, ObjectMetadataSource, SchemaProvisioning, WorkspaceConnection,
    WorkspaceTransaction,
};
pub use error::{SeedError, SeedResult};
pub use orchestrator::{
    plan_workspaces, OrchestratorSettings, ProvisioningFailurePolicy, SeedOrchestrator, WorkspacePlan,
};
pub use report::{PhaseOutcome, SeedReport, SkipReason, WorkspaceReport};
pub use steps::{ProvisioningStep, SeedContext, SeedStep, MESSAGING_STEPS, PROVISIONING_STEPS, TRANSACTIONAL_STEPS};
