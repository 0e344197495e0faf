//! Two-phase development seed pipeline.
//!
//! Phase 1 provisions every workspace (core rows, schema, data source,
//! metadata). Phase 2 then visits each provisioned workspace in turn: it
//! connects to the workspace schema, seeds the business dataset inside one
//! transaction, seeds the messaging dataset for the message-enabled
//! workspace and always releases the connection before moving on.

use crate::collaborators::{Collaborators, WorkspaceConnection};
use crate::error::{SeedError, SeedResult};
use crate::report::{PhaseOutcome, SeedReport, SkipReason, WorkspaceReport};
use crate::steps::{
    ProvisioningStep, SeedContext, SeedStep, MESSAGING_STEPS, PROVISIONING_STEPS,
    TRANSACTIONAL_STEPS,
};
use devseed_core::workspaces::workspace_label;
use devseed_core::{SeedConfig, SEED_APPLE_WORKSPACE_ID};
use devseed_orm::{
    build_object_metadata_map, workspace_schema_name, DataSourceDescriptor, ModelError,
    ObjectMetadataMap,
};
use std::fmt;
use uuid::Uuid;

/// What happens to the rest of the run when a workspace fails to provision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProvisioningFailurePolicy {
    /// Stop provisioning and skip the data phase for every workspace
    AbortRun,
    /// Skip the data phase of the failing workspace only
    #[default]
    IsolateWorkspace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrchestratorSettings {
    pub workspace_ids: Vec<Uuid>,
    pub message_workspace_id: Uuid,
    pub provisioning_failure: ProvisioningFailurePolicy,
}

impl OrchestratorSettings {
    pub fn new(workspace_ids: Vec<Uuid>) -> Self {
        Self {
            workspace_ids,
            message_workspace_id: SEED_APPLE_WORKSPACE_ID,
            provisioning_failure: ProvisioningFailurePolicy::default(),
        }
    }

    pub fn with_message_workspace_id(mut self, workspace_id: Uuid) -> Self {
        self.message_workspace_id = workspace_id;
        self
    }

    pub fn with_provisioning_failure(mut self, policy: ProvisioningFailurePolicy) -> Self {
        self.provisioning_failure = policy;
        self
    }

    pub fn is_message_workspace(&self, workspace_id: &Uuid) -> bool {
        self.message_workspace_id == *workspace_id
    }
}

impl From<&SeedConfig> for OrchestratorSettings {
    fn from(config: &SeedConfig) -> Self {
        let policy = if config.abort_on_provisioning_failure {
            ProvisioningFailurePolicy::AbortRun
        } else {
            ProvisioningFailurePolicy::IsolateWorkspace
        };
        Self::new(config.workspace_ids.clone())
            .with_message_workspace_id(config.message_workspace_id)
            .with_provisioning_failure(policy)
    }
}

/// Steps a run would execute for one workspace
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspacePlan {
    pub workspace_id: Uuid,
    pub schema: String,
    pub provisioning: Vec<ProvisioningStep>,
    pub transactional: Vec<SeedStep>,
    pub messaging: Vec<SeedStep>,
}

impl fmt::Display for WorkspacePlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<T: fmt::Display>(items: &[T]) -> String {
            if items.is_empty() {
                return "-".to_string();
            }
            items
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(", ")
        }

        writeln!(f, "workspace {} (schema {})", self.workspace_id, self.schema)?;
        writeln!(f, "  provisioning:  {}", join(&self.provisioning))?;
        writeln!(f, "  transaction:   {}", join(&self.transactional))?;
        write!(f, "  messaging:     {}", join(&self.messaging))
    }
}

/// Steps each configured workspace goes through, in run order
pub fn plan_workspaces(settings: &OrchestratorSettings) -> Vec<WorkspacePlan> {
    settings
        .workspace_ids
        .iter()
        .map(|workspace_id| WorkspacePlan {
            workspace_id: *workspace_id,
            schema: workspace_schema_name(workspace_id),
            provisioning: PROVISIONING_STEPS.to_vec(),
            transactional: TRANSACTIONAL_STEPS.to_vec(),
            messaging: if settings.is_message_workspace(workspace_id) {
                MESSAGING_STEPS.to_vec()
            } else {
                Vec::new()
            },
        })
        .collect()
}

pub struct SeedOrchestrator {
    settings: OrchestratorSettings,
    collaborators: Collaborators,
}

impl SeedOrchestrator {
    pub fn new(settings: OrchestratorSettings, collaborators: Collaborators) -> Self {
        Self {
            settings,
            collaborators,
        }
    }

    pub fn settings(&self) -> &OrchestratorSettings {
        &self.settings
    }

    /// Describe the run without touching any collaborator
    pub fn plan(&self) -> Vec<WorkspacePlan> {
        plan_workspaces(&self.settings)
    }

    /// Seed every configured workspace. Failures are logged and recorded in
    /// the report, never returned.
    pub async fn run(&self) -> SeedReport {
        let mut report = SeedReport::new(&self.settings.workspace_ids);

        tracing::info!(
            workspaces = self.settings.workspace_ids.len(),
            message_workspace = %self.settings.message_workspace_id,
            policy = ?self.settings.provisioning_failure,
            "Starting development seed"
        );

        for entry in report.workspaces.iter_mut() {
            if !self.provision_phase(entry).await {
                report.aborted = true;
                tracing::warn!(
                    workspace_id = %entry.workspace_id,
                    "Provisioning failed, aborting seed run"
                );
                return report;
            }
        }

        for entry in report.workspaces.iter_mut() {
            if !entry.provisioning.is_success() {
                continue;
            }
            self.data_phase(entry).await;
        }

        tracing::info!(
            failures = report.failure_count(),
            "Development seed finished"
        );
        report
    }

    /// Returns false when the run must stop
    async fn provision_phase(&self, entry: &mut WorkspaceReport) -> bool {
        let workspace_id = entry.workspace_id;
        tracing::info!(
            %workspace_id,
            workspace = workspace_label(&workspace_id),
            "Provisioning workspace"
        );

        match self.provision_workspace(workspace_id).await {
            Ok(descriptor) => {
                tracing::info!(
                    %workspace_id,
                    data_source_id = %descriptor.id,
                    schema = %descriptor.schema,
                    "Workspace provisioned"
                );
                entry.provisioning = PhaseOutcome::Succeeded;
                true
            }
            Err(err) => {
                tracing::error!(%workspace_id, error = %err, "Workspace provisioning failed");
                entry.provisioning = PhaseOutcome::Failed(err);
                match self.settings.provisioning_failure {
                    ProvisioningFailurePolicy::AbortRun => false,
                    ProvisioningFailurePolicy::IsolateWorkspace => {
                        entry.business_data = PhaseOutcome::Skipped(SkipReason::ProvisioningFailed);
                        entry.messaging = self.messaging_skipped(&workspace_id, SkipReason::ProvisioningFailed);
                        true
                    }
                }
            }
        }
    }

    async fn provision_workspace(&self, workspace_id: Uuid) -> SeedResult<DataSourceDescriptor> {
        let fail = |step: ProvisioningStep| {
            move |err: ModelError| SeedError::provisioning(workspace_id, step, err)
        };

        tracing::debug!(%workspace_id, step = %ProvisioningStep::SeedCoreSchema, "Provisioning step");
        let mut core = self
            .collaborators
            .core
            .open()
            .await
            .map_err(fail(ProvisioningStep::SeedCoreSchema))?;
        let seeded = core.seed_core_schema(&workspace_id).await;
        core.close().await;
        seeded.map_err(fail(ProvisioningStep::SeedCoreSchema))?;

        tracing::debug!(%workspace_id, step = %ProvisioningStep::CreateWorkspaceSchema, "Provisioning step");
        let schema = self
            .collaborators
            .schemas
            .create_workspace_schema(&workspace_id)
            .await
            .map_err(fail(ProvisioningStep::CreateWorkspaceSchema))?;

        tracing::debug!(%workspace_id, step = %ProvisioningStep::RegisterDataSource, "Provisioning step");
        let descriptor = self
            .collaborators
            .data_sources
            .create_data_source(&workspace_id, &schema)
            .await
            .map_err(fail(ProvisioningStep::RegisterDataSource))?;

        tracing::debug!(%workspace_id, step = %ProvisioningStep::SynchronizeMetadata, "Provisioning step");
        self.collaborators
            .metadata_sync
            .synchronize(&workspace_id, &descriptor.id)
            .await
            .map_err(fail(ProvisioningStep::SynchronizeMetadata))?;

        Ok(descriptor)
    }

    async fn data_phase(&self, entry: &mut WorkspaceReport) {
        let workspace_id = entry.workspace_id;
        tracing::info!(
            %workspace_id,
            workspace = workspace_label(&workspace_id),
            "Seeding workspace data"
        );

        let descriptor = match self.collaborators.data_sources.last_data_source(&workspace_id).await {
            Ok(descriptor) => descriptor,
            Err(err) => {
                let err = SeedError::data_source_lookup(workspace_id, err);
                self.workspace_unavailable(entry, err);
                return;
            }
        };

        let Some(connection) = self.collaborators.connections.connect(&descriptor).await else {
            let err = SeedError::ConnectionUnavailable {
                data_source_id: descriptor.id,
                schema: descriptor.schema.clone(),
            };
            self.workspace_unavailable(entry, err);
            return;
        };

        let (business_data, messaging) = self
            .seed_connected(&descriptor, connection.as_ref())
            .await;
        drop(connection);

        self.collaborators.connections.disconnect(&descriptor.id).await;
        tracing::debug!(%workspace_id, data_source_id = %descriptor.id, "Workspace connection released");

        entry.business_data = business_data;
        entry.messaging = messaging;
        entry.disconnected = true;
    }

    /// Everything that runs while the workspace connection is held
    async fn seed_connected(
        &self,
        descriptor: &DataSourceDescriptor,
        connection: &dyn WorkspaceConnection,
    ) -> (PhaseOutcome, PhaseOutcome) {
        let workspace_id = descriptor.workspace_id;

        let (object_metadata, metadata_error) = match self
            .collaborators
            .object_metadata
            .find_many_within_workspace(&workspace_id)
            .await
        {
            Ok(objects) => (build_object_metadata_map(&objects), None),
            Err(err) => (ObjectMetadataMap::new(), Some(SeedError::metadata(err))),
        };

        let ctx = SeedContext {
            workspace_id,
            schema: &descriptor.schema,
            object_metadata: &object_metadata,
        };

        let business_data = match metadata_error {
            Some(err) => Err(err),
            None => self.seed_business_data(connection, &ctx).await,
        };
        if let Err(err) = &business_data {
            tracing::error!(%workspace_id, error = %err, "Business data seed failed");
        }

        let messaging = if self.settings.is_message_workspace(&workspace_id) {
            let result = self.seed_messaging(connection, &ctx).await;
            if let Err(err) = &result {
                tracing::error!(%workspace_id, error = %err, "Messaging seed failed");
            }
            PhaseOutcome::from(result)
        } else {
            PhaseOutcome::NotApplicable
        };

        (PhaseOutcome::from(business_data), messaging)
    }

    async fn seed_business_data(
        &self,
        connection: &dyn WorkspaceConnection,
        ctx: &SeedContext<'_>,
    ) -> SeedResult<()> {
        let mut tx = connection.begin().await.map_err(SeedError::transaction)?;

        for &step in TRANSACTIONAL_STEPS {
            tracing::debug!(workspace_id = %ctx.workspace_id, %step, "Seed step");
            if let Err(err) = tx.run_step(step, ctx).await {
                if let Err(rollback_err) = tx.rollback().await {
                    tracing::warn!(
                        workspace_id = %ctx.workspace_id,
                        error = %rollback_err,
                        "Rollback failed"
                    );
                }
                return Err(SeedError::step(step, err));
            }
        }

        tx.commit().await.map_err(SeedError::transaction)?;
        tracing::info!(workspace_id = %ctx.workspace_id, "Business data committed");
        Ok(())
    }

    /// Stops at the first failing step; later steps reference its rows
    async fn seed_messaging(
        &self,
        connection: &dyn WorkspaceConnection,
        ctx: &SeedContext<'_>,
    ) -> SeedResult<()> {
        for &step in MESSAGING_STEPS {
            tracing::debug!(workspace_id = %ctx.workspace_id, %step, "Seed step");
            connection
                .run_step(step, ctx)
                .await
                .map_err(|err| SeedError::step(step, err))?;
        }
        tracing::info!(workspace_id = %ctx.workspace_id, "Messaging data seeded");
        Ok(())
    }

    fn workspace_unavailable(&self, entry: &mut WorkspaceReport, err: SeedError) {
        tracing::error!(workspace_id = %entry.workspace_id, error = %err, "Workspace unavailable");
        entry.business_data = PhaseOutcome::Failed(err);
        entry.messaging = self.messaging_skipped(&entry.workspace_id, SkipReason::WorkspaceUnavailable);
    }

    fn messaging_skipped(&self, workspace_id: &Uuid, reason: SkipReason) -> PhaseOutcome {
        if self.settings.is_message_workspace(workspace_id) {
            PhaseOutcome::Skipped(reason)
        } else {
            PhaseOutcome::NotApplicable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devseed_core::SEED_TWENTY_WORKSPACE_ID;

    #[test]
    fn settings_default_to_isolation_and_apple_messaging() {
        let settings = OrchestratorSettings::new(vec![SEED_APPLE_WORKSPACE_ID]);
        assert_eq!(
            settings.provisioning_failure,
            ProvisioningFailurePolicy::IsolateWorkspace
        );
        assert!(settings.is_message_workspace(&SEED_APPLE_WORKSPACE_ID));
        assert!(!settings.is_message_workspace(&SEED_TWENTY_WORKSPACE_ID));
    }

    #[test]
    fn settings_follow_config() {
        let config = SeedConfig::default()
            .with_workspace_ids(vec![SEED_TWENTY_WORKSPACE_ID])
            .with_message_workspace_id(SEED_TWENTY_WORKSPACE_ID)
            .with_abort_on_provisioning_failure(true);
        let settings = OrchestratorSettings::from(&config);
        assert_eq!(settings.workspace_ids, vec![SEED_TWENTY_WORKSPACE_ID]);
        assert_eq!(settings.message_workspace_id, SEED_TWENTY_WORKSPACE_ID);
        assert_eq!(settings.provisioning_failure, ProvisioningFailurePolicy::AbortRun);
    }
}
