pub mod config;
pub mod workspaces;

// Re-export key types for convenience
pub use config::{ConfigError, ConfigSource, Environment, SeedConfig, SeedConfigTrait};
pub use workspaces::{SEED_APPLE_WORKSPACE_ID, SEED_TWENTY_WORKSPACE_ID};

/// Tool name used in logs and help output
pub const TOOL_NAME: &str = "devseed";
