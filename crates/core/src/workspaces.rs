//! Well-known seed workspaces.
//!
//! These are the two workspaces the development dataset is written for. They
//! form the default workspace list of [`SeedConfig`](crate::SeedConfig) and can
//! be replaced through configuration.

use uuid::{uuid, Uuid};

/// Workspace that also receives the messaging dataset by default
pub const SEED_APPLE_WORKSPACE_ID: Uuid = uuid!("20202020-1c25-4d02-bf25-6aeccf7ea419");

pub const SEED_TWENTY_WORKSPACE_ID: Uuid = uuid!("20202020-1c25-4d02-bf25-6aeccf7ea420");

/// Default ordered workspace list
pub fn default_workspace_ids() -> Vec<Uuid> {
    vec![SEED_APPLE_WORKSPACE_ID, SEED_TWENTY_WORKSPACE_ID]
}

/// Human readable label for a seed workspace, used in log lines
pub fn workspace_label(workspace_id: &Uuid) -> &'static str {
    if *workspace_id == SEED_APPLE_WORKSPACE_ID {
        "apple"
    } else if *workspace_id == SEED_TWENTY_WORKSPACE_ID {
        "twenty"
    } else {
        "custom"
    }
}
