//! Outcome of a seed run, per workspace and phase.

use crate::error::SeedError;
use std::fmt;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// An earlier provisioning failure stopped the run
    RunAborted,
    /// This workspace's own provisioning failed
    ProvisioningFailed,
    /// The workspace could not be reached, so no data phase ran
    WorkspaceUnavailable,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            SkipReason::RunAborted => "run aborted",
            SkipReason::ProvisioningFailed => "provisioning failed",
            SkipReason::WorkspaceUnavailable => "workspace unavailable",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PhaseOutcome {
    Succeeded,
    Failed(SeedError),
    Skipped(SkipReason),
    /// The phase does not apply to this workspace (messaging on most workspaces)
    NotApplicable,
}

impl PhaseOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, PhaseOutcome::Failed(_))
    }

    pub fn is_success(&self) -> bool {
        matches!(self, PhaseOutcome::Succeeded)
    }

    pub fn error(&self) -> Option<&SeedError> {
        match self {
            PhaseOutcome::Failed(err) => Some(err),
            _ => None,
        }
    }

    fn from_result(result: Result<(), SeedError>) -> Self {
        match result {
            Ok(()) => PhaseOutcome::Succeeded,
            Err(err) => PhaseOutcome::Failed(err),
        }
    }
}

impl From<Result<(), SeedError>> for PhaseOutcome {
    fn from(result: Result<(), SeedError>) -> Self {
        Self::from_result(result)
    }
}

impl fmt::Display for PhaseOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PhaseOutcome::Succeeded => f.write_str("ok"),
            PhaseOutcome::Failed(err) => write!(f, "failed ({})", err.kind()),
            PhaseOutcome::Skipped(reason) => write!(f, "skipped ({})", reason),
            PhaseOutcome::NotApplicable => f.write_str("-"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceReport {
    pub workspace_id: Uuid,
    pub provisioning: PhaseOutcome,
    pub business_data: PhaseOutcome,
    pub messaging: PhaseOutcome,
    /// The workspace connection was opened and then released
    pub disconnected: bool,
}

impl WorkspaceReport {
    fn new(workspace_id: Uuid) -> Self {
        Self {
            workspace_id,
            provisioning: PhaseOutcome::Skipped(SkipReason::RunAborted),
            business_data: PhaseOutcome::Skipped(SkipReason::RunAborted),
            messaging: PhaseOutcome::Skipped(SkipReason::RunAborted),
            disconnected: false,
        }
    }

    pub fn phases(&self) -> [(&'static str, &PhaseOutcome); 3] {
        [
            ("provisioning", &self.provisioning),
            ("business-data", &self.business_data),
            ("messaging", &self.messaging),
        ]
    }

    pub fn has_failures(&self) -> bool {
        self.phases().iter().any(|(_, outcome)| outcome.is_failure())
    }

    pub fn errors(&self) -> Vec<&SeedError> {
        [&self.provisioning, &self.business_data, &self.messaging]
            .into_iter()
            .filter_map(PhaseOutcome::error)
            .collect()
    }
}

/// Summary handed back to the operator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedReport {
    pub workspaces: Vec<WorkspaceReport>,
    /// Provisioning failure stopped the run under the abort policy
    pub aborted: bool,
}

impl SeedReport {
    pub(crate) fn new(workspace_ids: &[Uuid]) -> Self {
        Self {
            workspaces: workspace_ids.iter().copied().map(WorkspaceReport::new).collect(),
            aborted: false,
        }
    }

    pub fn workspace(&self, workspace_id: &Uuid) -> Option<&WorkspaceReport> {
        self.workspaces.iter().find(|w| w.workspace_id == *workspace_id)
    }

    pub fn has_failures(&self) -> bool {
        self.workspaces.iter().any(WorkspaceReport::has_failures)
    }

    pub fn failure_count(&self) -> usize {
        self.workspaces.iter().map(|w| w.errors().len()).sum()
    }

    /// Process exit code: 0 when nothing failed
    pub fn exit_code(&self) -> i32 {
        if self.has_failures() {
            1
        } else {
            0
        }
    }
}

impl fmt::Display for SeedReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{:<38} {:<28} {:<28} {:<28}",
            "workspace", "provisioning", "business-data", "messaging"
        )?;
        for w in &self.workspaces {
            writeln!(
                f,
                "{:<38} {:<28} {:<28} {:<28}",
                w.workspace_id.to_string(),
                w.provisioning.to_string(),
                w.business_data.to_string(),
                w.messaging.to_string()
            )?;
        }
        for w in &self.workspaces {
            for err in w.errors() {
                writeln!(f, "  {}: {}", w.workspace_id, err)?;
            }
        }
        if self.aborted {
            writeln!(f, "run aborted after a provisioning failure")?;
        }
        Ok(())
    }
}
