pub mod environment;
pub mod seed_config;
pub mod sources;
pub mod validation;

pub use environment::*;
pub use seed_config::*;
pub use sources::*;
pub use validation::*;
