//! Seed steps and their fixed order.

use devseed_orm::ObjectMetadataMap;
use std::fmt;
use uuid::Uuid;

/// Phase 1 steps, run once per workspace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProvisioningStep {
    SeedCoreSchema,
    CreateWorkspaceSchema,
    RegisterDataSource,
    SynchronizeMetadata,
}

impl ProvisioningStep {
    pub fn name(&self) -> &'static str {
        match self {
            ProvisioningStep::SeedCoreSchema => "core-schema",
            ProvisioningStep::CreateWorkspaceSchema => "workspace-schema",
            ProvisioningStep::RegisterDataSource => "data-source",
            ProvisioningStep::SynchronizeMetadata => "metadata-sync",
        }
    }
}

impl fmt::Display for ProvisioningStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

pub const PROVISIONING_STEPS: &[ProvisioningStep] = &[
    ProvisioningStep::SeedCoreSchema,
    ProvisioningStep::CreateWorkspaceSchema,
    ProvisioningStep::RegisterDataSource,
    ProvisioningStep::SynchronizeMetadata,
];

/// Phase 2 data steps, run against a workspace connection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeedStep {
    Companies,
    People,
    Opportunities,
    CalendarEvents,
    WorkspaceMember,
    ViewPrefill,
    MessageThreads,
    ConnectedAccounts,
    Messages,
    MessageChannels,
    MessageChannelMessageAssociations,
    MessageParticipants,
}

impl SeedStep {
    pub fn name(&self) -> &'static str {
        match self {
            SeedStep::Companies => "companies",
            SeedStep::People => "people",
            SeedStep::Opportunities => "opportunities",
            SeedStep::CalendarEvents => "calendar-events",
            SeedStep::WorkspaceMember => "workspace-member",
            SeedStep::ViewPrefill => "view-prefill",
            SeedStep::MessageThreads => "message-threads",
            SeedStep::ConnectedAccounts => "connected-accounts",
            SeedStep::Messages => "messages",
            SeedStep::MessageChannels => "message-channels",
            SeedStep::MessageChannelMessageAssociations => "message-channel-message-associations",
            SeedStep::MessageParticipants => "message-participants",
        }
    }

    pub fn is_messaging(&self) -> bool {
        MESSAGING_STEPS.contains(self)
    }
}

impl fmt::Display for SeedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Run inside one transaction. Companies and people come before the
/// records that reference them.
pub const TRANSACTIONAL_STEPS: &[SeedStep] = &[
    SeedStep::Companies,
    SeedStep::People,
    SeedStep::Opportunities,
    SeedStep::CalendarEvents,
    SeedStep::WorkspaceMember,
    SeedStep::ViewPrefill,
];

/// Run outside the transaction, only for the message-enabled workspace.
/// Accounts and channels come before the messages that reference them.
pub const MESSAGING_STEPS: &[SeedStep] = &[
    SeedStep::MessageThreads,
    SeedStep::ConnectedAccounts,
    SeedStep::Messages,
    SeedStep::MessageChannels,
    SeedStep::MessageChannelMessageAssociations,
    SeedStep::MessageParticipants,
];

/// What a seed step needs to know about the workspace it writes to
#[derive(Debug, Clone, Copy)]
pub struct SeedContext<'a> {
    pub workspace_id: Uuid,
    pub schema: &'a str,
    pub object_metadata: &'a ObjectMetadataMap,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_lists_do_not_overlap() {
        for step in TRANSACTIONAL_STEPS {
            assert!(!step.is_messaging(), "{}", step);
        }
        assert!(MESSAGING_STEPS.iter().all(SeedStep::is_messaging));
    }

    #[test]
    fn transactional_order() {
        let names: Vec<_> = TRANSACTIONAL_STEPS.iter().map(SeedStep::name).collect();
        assert_eq!(
            names,
            [
                "companies",
                "people",
                "opportunities",
                "calendar-events",
                "workspace-member",
                "view-prefill"
            ]
        );
    }

    #[test]
    fn messaging_order() {
        let names: Vec<_> = MESSAGING_STEPS.iter().map(|s| s.to_string()).collect();
        assert_eq!(
            names,
            [
                "message-threads",
                "connected-accounts",
                "messages",
                "message-channels",
                "message-channel-message-associations",
                "message-participants"
            ]
        );
    }
}
