//! Orchestrator behaviour against in-memory collaborators that record
//! every call in an event log.

use async_trait::async_trait;
use devseed_orm::{DataSourceDescriptor, ModelError, ObjectMetadata, OrmResult};
use devseed_seeder::{
    Collaborators, ConnectionManager, CoreConnection, CoreDatabase, DataSourceRegistry,
    MetadataSync, ObjectMetadataSource, OrchestratorSettings, PhaseOutcome, ProvisioningFailurePolicy,
    ProvisioningStep, SchemaProvisioning, SeedContext, SeedError, SeedOrchestrator, SeedStep,
    SkipReason, WorkspaceConnection, WorkspaceTransaction, MESSAGING_STEPS, TRANSACTIONAL_STEPS,
};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use uuid::Uuid;

const W1: Uuid = Uuid::from_u128(1);
const W2: Uuid = Uuid::from_u128(2);
const W3: Uuid = Uuid::from_u128(3);

fn label(id: &Uuid) -> String {
    format!("w{}", id.as_u128())
}

#[derive(Default)]
struct Script {
    fail_provisioning: HashMap<Uuid, ProvisioningStep>,
    fail_step: HashMap<Uuid, SeedStep>,
    unreachable: HashSet<Uuid>,
    missing_data_source: HashSet<Uuid>,
    metadata_unavailable: HashSet<Uuid>,
}

#[derive(Default)]
struct State {
    script: Script,
    events: Mutex<Vec<String>>,
    data_sources: Mutex<HashMap<Uuid, DataSourceDescriptor>>,
}

#[derive(Clone, Default)]
struct Fake {
    state: Arc<State>,
}

impl Fake {
    fn new(script: Script) -> Self {
        Self {
            state: Arc::new(State {
                script,
                ..State::default()
            }),
        }
    }

    fn record(&self, event: impl Into<String>) {
        self.state.events.lock().unwrap().push(event.into());
    }

    fn events(&self) -> Vec<String> {
        self.state.events.lock().unwrap().clone()
    }

    fn has(&self, event: &str) -> bool {
        self.events().iter().any(|e| e == event)
    }

    fn position(&self, event: &str) -> usize {
        self.events()
            .iter()
            .position(|e| e == event)
            .unwrap_or_else(|| panic!("missing event {event}"))
    }

    fn fails_at(&self, workspace_id: &Uuid, step: ProvisioningStep) -> OrmResult<()> {
        match self.state.script.fail_provisioning.get(workspace_id) {
            Some(failing) if *failing == step => {
                Err(ModelError::Database(format!("{} exploded", step)))
            }
            _ => Ok(()),
        }
    }

    fn run_step(&self, workspace_id: &Uuid, step: SeedStep, prefix: &str) -> OrmResult<()> {
        self.record(format!("{}:{}:{}", prefix, label(workspace_id), step));
        match self.state.script.fail_step.get(workspace_id) {
            Some(failing) if *failing == step => Err(ModelError::Query(format!("{} rejected", step))),
            _ => Ok(()),
        }
    }

    fn collaborators(&self) -> Collaborators {
        Collaborators {
            core: Arc::new(self.clone()),
            schemas: Arc::new(self.clone()),
            data_sources: Arc::new(self.clone()),
            metadata_sync: Arc::new(self.clone()),
            object_metadata: Arc::new(self.clone()),
            connections: Arc::new(self.clone()),
        }
    }
}

#[async_trait]
impl CoreDatabase for Fake {
    async fn open(&self) -> OrmResult<Box<dyn CoreConnection>> {
        self.record("core-open");
        Ok(Box::new(FakeCore { fake: self.clone() }))
    }
}

struct FakeCore {
    fake: Fake,
}

#[async_trait]
impl CoreConnection for FakeCore {
    async fn seed_core_schema(&mut self, workspace_id: &Uuid) -> OrmResult<()> {
        self.fake.record(format!("core-seed:{}", label(workspace_id)));
        self.fake.fails_at(workspace_id, ProvisioningStep::SeedCoreSchema)
    }

    async fn close(self: Box<Self>) {
        self.fake.record("core-close");
    }
}

#[async_trait]
impl SchemaProvisioning for Fake {
    async fn create_workspace_schema(&self, workspace_id: &Uuid) -> OrmResult<String> {
        self.record(format!("schema:{}", label(workspace_id)));
        self.fails_at(workspace_id, ProvisioningStep::CreateWorkspaceSchema)?;
        Ok(format!("workspace_{}", label(workspace_id)))
    }
}

#[async_trait]
impl DataSourceRegistry for Fake {
    async fn create_data_source(
        &self,
        workspace_id: &Uuid,
        schema: &str,
    ) -> OrmResult<DataSourceDescriptor> {
        self.record(format!("data-source:{}", label(workspace_id)));
        self.fails_at(workspace_id, ProvisioningStep::RegisterDataSource)?;
        let descriptor = DataSourceDescriptor {
            id: Uuid::new_v4(),
            workspace_id: *workspace_id,
            schema: schema.to_string(),
        };
        self.state
            .data_sources
            .lock()
            .unwrap()
            .insert(*workspace_id, descriptor.clone());
        Ok(descriptor)
    }

    async fn last_data_source(&self, workspace_id: &Uuid) -> OrmResult<DataSourceDescriptor> {
        self.record(format!("lookup:{}", label(workspace_id)));
        if self.state.script.missing_data_source.contains(workspace_id) {
            return Err(ModelError::NotFound("no data source".to_string()));
        }
        self.state
            .data_sources
            .lock()
            .unwrap()
            .get(workspace_id)
            .cloned()
            .ok_or_else(|| ModelError::NotFound("no data source".to_string()))
    }
}

#[async_trait]
impl MetadataSync for Fake {
    async fn synchronize(&self, workspace_id: &Uuid, _data_source_id: &Uuid) -> OrmResult<()> {
        self.record(format!("sync:{}", label(workspace_id)));
        self.fails_at(workspace_id, ProvisioningStep::SynchronizeMetadata)
    }
}

#[async_trait]
impl ObjectMetadataSource for Fake {
    async fn find_many_within_workspace(&self, workspace_id: &Uuid) -> OrmResult<Vec<ObjectMetadata>> {
        self.record(format!("metadata:{}", label(workspace_id)));
        if self.state.script.metadata_unavailable.contains(workspace_id) {
            return Err(ModelError::Connection("metadata store down".to_string()));
        }
        Ok(Vec::new())
    }
}

#[async_trait]
impl ConnectionManager for Fake {
    async fn connect(&self, descriptor: &DataSourceDescriptor) -> Option<Arc<dyn WorkspaceConnection>> {
        self.record(format!("connect:{}", label(&descriptor.workspace_id)));
        if self.state.script.unreachable.contains(&descriptor.workspace_id) {
            return None;
        }
        Some(Arc::new(FakeConnection {
            fake: self.clone(),
            workspace_id: descriptor.workspace_id,
        }))
    }

    async fn disconnect(&self, data_source_id: &Uuid) {
        let workspace_id = self
            .state
            .data_sources
            .lock()
            .unwrap()
            .values()
            .find(|d| d.id == *data_source_id)
            .map(|d| d.workspace_id)
            .unwrap_or_default();
        self.record(format!("disconnect:{}", label(&workspace_id)));
    }
}

struct FakeConnection {
    fake: Fake,
    workspace_id: Uuid,
}

#[async_trait]
impl WorkspaceConnection for FakeConnection {
    async fn begin(&self) -> OrmResult<Box<dyn WorkspaceTransaction>> {
        self.fake.record(format!("begin:{}", label(&self.workspace_id)));
        Ok(Box::new(FakeTransaction {
            fake: self.fake.clone(),
            workspace_id: self.workspace_id,
        }))
    }

    async fn run_step(&self, step: SeedStep, ctx: &SeedContext<'_>) -> OrmResult<()> {
        assert_eq!(ctx.workspace_id, self.workspace_id);
        self.fake.run_step(&self.workspace_id, step, "step")
    }
}

struct FakeTransaction {
    fake: Fake,
    workspace_id: Uuid,
}

#[async_trait]
impl WorkspaceTransaction for FakeTransaction {
    async fn run_step(&mut self, step: SeedStep, ctx: &SeedContext<'_>) -> OrmResult<()> {
        assert_eq!(ctx.workspace_id, self.workspace_id);
        self.fake.run_step(&self.workspace_id, step, "tx-step")
    }

    async fn commit(self: Box<Self>) -> OrmResult<()> {
        self.fake.record(format!("commit:{}", label(&self.workspace_id)));
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> OrmResult<()> {
        self.fake.record(format!("rollback:{}", label(&self.workspace_id)));
        Ok(())
    }
}

fn orchestrator(fake: &Fake, settings: OrchestratorSettings) -> SeedOrchestrator {
    SeedOrchestrator::new(settings, fake.collaborators())
}

fn settings(ids: &[Uuid]) -> OrchestratorSettings {
    OrchestratorSettings::new(ids.to_vec()).with_message_workspace_id(W1)
}

fn provisioning_events(id: &Uuid) -> Vec<String> {
    let w = label(id);
    vec![
        "core-open".to_string(),
        format!("core-seed:{w}"),
        "core-close".to_string(),
        format!("schema:{w}"),
        format!("data-source:{w}"),
        format!("sync:{w}"),
    ]
}

fn data_events(id: &Uuid, messaging: bool) -> Vec<String> {
    let w = label(id);
    let mut events = vec![
        format!("lookup:{w}"),
        format!("connect:{w}"),
        format!("metadata:{w}"),
        format!("begin:{w}"),
    ];
    events.extend(TRANSACTIONAL_STEPS.iter().map(|s| format!("tx-step:{w}:{s}")));
    events.push(format!("commit:{w}"));
    if messaging {
        events.extend(MESSAGING_STEPS.iter().map(|s| format!("step:{w}:{s}")));
    }
    events.push(format!("disconnect:{w}"));
    events
}

#[tokio::test]
async fn provisions_everything_then_seeds_w1_before_w2() {
    let fake = Fake::default();
    let report = orchestrator(&fake, settings(&[W1, W2])).run().await;

    let mut expected = provisioning_events(&W1);
    expected.extend(provisioning_events(&W2));
    expected.extend(data_events(&W1, true));
    expected.extend(data_events(&W2, false));
    assert_eq!(fake.events(), expected);

    assert!(!report.has_failures());
    assert_eq!(report.exit_code(), 0);
    let w1 = report.workspace(&W1).unwrap();
    assert_eq!(w1.messaging, PhaseOutcome::Succeeded);
    assert!(w1.disconnected);
    let w2 = report.workspace(&W2).unwrap();
    assert_eq!(w2.business_data, PhaseOutcome::Succeeded);
    assert_eq!(w2.messaging, PhaseOutcome::NotApplicable);
}

#[tokio::test]
async fn empty_workspace_list_touches_nothing() {
    let fake = Fake::default();
    for policy in [
        ProvisioningFailurePolicy::IsolateWorkspace,
        ProvisioningFailurePolicy::AbortRun,
    ] {
        let report = orchestrator(&fake, settings(&[]).with_provisioning_failure(policy))
            .run()
            .await;

        assert!(report.workspaces.is_empty());
        assert!(!report.aborted);
        assert!(!report.has_failures());
        assert_eq!(report.exit_code(), 0);
    }
    assert!(fake.events().is_empty());
}

#[tokio::test]
async fn abort_policy_halts_remaining_workspaces() {
    let fake = Fake::new(Script {
        fail_provisioning: HashMap::from([(W2, ProvisioningStep::CreateWorkspaceSchema)]),
        ..Script::default()
    });
    let settings = settings(&[W1, W2, W3]).with_provisioning_failure(ProvisioningFailurePolicy::AbortRun);
    let report = orchestrator(&fake, settings).run().await;

    assert!(report.aborted);
    assert!(!fake.has("core-seed:w3"));
    assert!(!fake.has("data-source:w2"));
    assert!(fake.events().iter().all(|e| !e.starts_with("lookup:")));

    let w2 = report.workspace(&W2).unwrap();
    assert!(matches!(
        w2.provisioning,
        PhaseOutcome::Failed(SeedError::Provisioning {
            step: ProvisioningStep::CreateWorkspaceSchema,
            ..
        })
    ));
    assert_eq!(
        report.workspace(&W3).unwrap().provisioning,
        PhaseOutcome::Skipped(SkipReason::RunAborted)
    );
    assert_eq!(
        report.workspace(&W1).unwrap().business_data,
        PhaseOutcome::Skipped(SkipReason::RunAborted)
    );
    assert_eq!(report.exit_code(), 1);
}

#[tokio::test]
async fn isolation_policy_skips_only_the_failing_workspace() {
    let fake = Fake::new(Script {
        fail_provisioning: HashMap::from([(W1, ProvisioningStep::SynchronizeMetadata)]),
        ..Script::default()
    });
    let report = orchestrator(&fake, settings(&[W1, W2])).run().await;

    assert!(!report.aborted);
    assert!(fake.has("core-seed:w2"));
    assert!(!fake.has("lookup:w1"));
    assert!(fake.has("commit:w2"));

    let w1 = report.workspace(&W1).unwrap();
    assert_eq!(w1.provisioning.error().map(SeedError::kind), Some("sync"));
    assert_eq!(
        w1.business_data,
        PhaseOutcome::Skipped(SkipReason::ProvisioningFailed)
    );
    assert_eq!(
        w1.messaging,
        PhaseOutcome::Skipped(SkipReason::ProvisioningFailed)
    );
    assert!(!w1.disconnected);
}

#[tokio::test]
async fn core_connection_is_closed_when_core_seed_fails() {
    let fake = Fake::new(Script {
        fail_provisioning: HashMap::from([(W1, ProvisioningStep::SeedCoreSchema)]),
        ..Script::default()
    });
    orchestrator(&fake, settings(&[W1])).run().await;

    assert!(fake.has("core-close"));
    assert!(fake.position("core-seed:w1") < fake.position("core-close"));
    assert!(!fake.has("schema:w1"));
}

#[tokio::test]
async fn failed_transactional_step_rolls_back_and_continues() {
    let fake = Fake::new(Script {
        fail_step: HashMap::from([(W1, SeedStep::People)]),
        ..Script::default()
    });
    let report = orchestrator(&fake, settings(&[W1, W2])).run().await;

    assert!(fake.has("rollback:w1"));
    assert!(!fake.has("commit:w1"));
    assert!(!fake.has("tx-step:w1:opportunities"));

    // messaging, the disconnect and the next workspace still happen
    for step in MESSAGING_STEPS {
        assert!(fake.has(&format!("step:w1:{step}")));
    }
    assert!(fake.position("rollback:w1") < fake.position("step:w1:message-threads"));
    assert!(fake.position("step:w1:message-participants") < fake.position("disconnect:w1"));
    assert!(fake.position("disconnect:w1") < fake.position("lookup:w2"));
    assert!(fake.has("commit:w2"));

    let w1 = report.workspace(&W1).unwrap();
    assert_eq!(
        w1.business_data,
        PhaseOutcome::Failed(SeedError::SeedStep {
            step: SeedStep::People,
            message: "Query error: people rejected".to_string(),
        })
    );
    assert_eq!(w1.messaging, PhaseOutcome::Succeeded);
    assert!(w1.disconnected);
}

#[tokio::test]
async fn messaging_runs_only_for_the_message_workspace() {
    let fake = Fake::default();
    let settings = OrchestratorSettings::new(vec![W1, W2, W3]).with_message_workspace_id(W2);
    let report = orchestrator(&fake, settings).run().await;

    let messaging: Vec<_> = fake
        .events()
        .into_iter()
        .filter(|e| e.starts_with("step:"))
        .collect();
    assert_eq!(messaging.len(), MESSAGING_STEPS.len());
    assert!(messaging.iter().all(|e| e.starts_with("step:w2:")));

    assert_eq!(report.workspace(&W1).unwrap().messaging, PhaseOutcome::NotApplicable);
    assert_eq!(report.workspace(&W2).unwrap().messaging, PhaseOutcome::Succeeded);
    assert_eq!(report.workspace(&W3).unwrap().messaging, PhaseOutcome::NotApplicable);
}

#[tokio::test]
async fn unreachable_workspace_is_reported_and_skipped() {
    let fake = Fake::new(Script {
        unreachable: HashSet::from([W1]),
        ..Script::default()
    });
    let report = orchestrator(&fake, settings(&[W1, W2])).run().await;

    assert!(!fake.has("metadata:w1"));
    assert!(!fake.has("disconnect:w1"));
    assert!(fake.has("commit:w2"));

    let w1 = report.workspace(&W1).unwrap();
    assert!(matches!(
        w1.business_data,
        PhaseOutcome::Failed(SeedError::ConnectionUnavailable { ref schema, .. }) if schema == "workspace_w1"
    ));
    assert_eq!(
        w1.messaging,
        PhaseOutcome::Skipped(SkipReason::WorkspaceUnavailable)
    );
    assert_eq!(report.exit_code(), 1);
}

#[tokio::test]
async fn missing_data_source_is_fatal_for_that_workspace() {
    let fake = Fake::new(Script {
        missing_data_source: HashSet::from([W2]),
        ..Script::default()
    });
    let report = orchestrator(&fake, settings(&[W2, W1])).run().await;

    assert!(!fake.has("connect:w2"));
    assert!(fake.has("commit:w1"));
    assert_eq!(
        report.workspace(&W2).unwrap().business_data,
        PhaseOutcome::Failed(SeedError::DataSourceNotFound { workspace_id: W2 })
    );
}

#[tokio::test]
async fn metadata_failure_skips_the_transaction_but_not_messaging() {
    let fake = Fake::new(Script {
        metadata_unavailable: HashSet::from([W1]),
        ..Script::default()
    });
    let report = orchestrator(&fake, settings(&[W1])).run().await;

    assert!(!fake.has("begin:w1"));
    assert!(fake.has("step:w1:message-threads"));
    assert!(fake.has("disconnect:w1"));

    let w1 = report.workspace(&W1).unwrap();
    assert_eq!(w1.business_data.error().map(SeedError::kind), Some("metadata"));
    assert_eq!(w1.messaging, PhaseOutcome::Succeeded);
}

#[tokio::test]
async fn messaging_stops_at_the_first_failing_step() {
    let fake = Fake::new(Script {
        fail_step: HashMap::from([(W1, SeedStep::Messages)]),
        ..Script::default()
    });
    let report = orchestrator(&fake, settings(&[W1])).run().await;

    assert!(fake.has("commit:w1"));
    assert!(fake.has("step:w1:messages"));
    assert!(!fake.has("step:w1:message-channels"));
    assert!(fake.has("disconnect:w1"));

    let w1 = report.workspace(&W1).unwrap();
    assert_eq!(w1.business_data, PhaseOutcome::Succeeded);
    assert!(matches!(
        w1.messaging,
        PhaseOutcome::Failed(SeedError::SeedStep {
            step: SeedStep::Messages,
            ..
        })
    ));
}

#[test]
fn plan_touches_nothing() {
    let fake = Fake::default();
    let plan = orchestrator(&fake, settings(&[W1, W2])).plan();

    assert!(fake.events().is_empty());
    assert_eq!(plan.len(), 2);
    assert_eq!(plan[0].workspace_id, W1);
    assert_eq!(plan[0].schema, "workspace_1");
    assert_eq!(plan[0].transactional, TRANSACTIONAL_STEPS.to_vec());
    assert_eq!(plan[0].messaging, MESSAGING_STEPS.to_vec());
    assert!(plan[1].messaging.is_empty());
    assert!(plan[1].to_string().contains("messaging:     -"));
}
