use anyhow::Context;
use clap::Args;
use devseed_core::{ConfigError, SeedConfig, SeedConfigTrait, TOOL_NAME};
use devseed_seeder::postgres::postgres_collaborators;
use devseed_seeder::{plan_workspaces, OrchestratorSettings, SeedOrchestrator, SeedReport};
use uuid::Uuid;

use crate::logging;

#[derive(Args, Debug, Clone, Default)]
pub struct SeedDevArgs {
    /// Print the steps that would run without touching the database
    #[arg(long)]
    pub dry_run: bool,

    /// Workspace to seed, in order (repeatable). Defaults to SEED_WORKSPACE_IDS or the seed workspaces
    #[arg(long = "workspace", value_name = "UUID")]
    pub workspaces: Vec<Uuid>,

    /// Workspace that also receives the messaging dataset
    #[arg(long, value_name = "UUID")]
    pub message_workspace: Option<Uuid>,

    /// Stop the whole run when a workspace fails to provision
    #[arg(long)]
    pub abort_on_provisioning_failure: bool,

    /// Debug logging
    #[arg(long, short)]
    pub verbose: bool,
}

/// Environment configuration with the command line applied on top
pub fn resolve_config(args: &SeedDevArgs) -> Result<SeedConfig, ConfigError> {
    resolve_config_from(SeedConfig::read_env()?, args)
}

fn resolve_config_from(mut config: SeedConfig, args: &SeedDevArgs) -> Result<SeedConfig, ConfigError> {
    if !args.workspaces.is_empty() {
        config = config.with_workspace_ids(args.workspaces.clone());
    }
    if let Some(id) = args.message_workspace {
        config = config.with_message_workspace_id(id);
    }
    if args.abort_on_provisioning_failure {
        config = config.with_abort_on_provisioning_failure(true);
    }
    config.validate()?;
    Ok(config)
}

/// Configuration problems exit with 2, everything else with 1
pub fn error_exit_code(err: &anyhow::Error) -> u8 {
    if err.downcast_ref::<ConfigError>().is_some() {
        2
    } else {
        1
    }
}

/// Run `workspace:seed:dev`, returning the process exit code
pub async fn run(args: SeedDevArgs) -> anyhow::Result<u8> {
    let config = resolve_config(&args)?;
    logging::init(&config.log_level, args.verbose);
    warn_if_messaging_unseeded(&config);

    let settings = OrchestratorSettings::from(&config);
    if args.verbose {
        print_config_sources(&config);
    }

    if args.dry_run {
        print_plan(&config, &settings);
        return Ok(0);
    }

    let database_url = config.require_database_url()?;
    tracing::info!(
        tool = TOOL_NAME,
        environment = %config.environment,
        database = %config.masked_database_url().unwrap_or_default(),
        "Seeding development workspaces"
    );

    let collaborators = postgres_collaborators(database_url, &config)
        .await
        .context("Failed to connect to the seed database")?;

    let orchestrator = SeedOrchestrator::new(settings, collaborators);
    let report = orchestrator.run().await;
    print_report(&report);

    Ok(report.exit_code() as u8)
}

fn warn_if_messaging_unseeded(config: &SeedConfig) {
    if !config.seeds_messaging() {
        tracing::warn!(
            message_workspace_id = %config.message_workspace_id,
            "message-enabled workspace is not in the workspace list; no messaging data will be seeded"
        );
    }
}

fn print_config_sources(config: &SeedConfig) {
    let mut sources: Vec<_> = config.config_sources().into_iter().collect();
    sources.sort_by(|a, b| a.0.cmp(&b.0));

    println!("⚙️  Configuration");
    for (field, source) in sources {
        println!("  {:<30} {}", field, source);
    }
    println!();
}

fn print_plan(config: &SeedConfig, settings: &OrchestratorSettings) {
    println!("🌱 Development seed plan ({})", config.environment);
    println!("==========================");
    if let Some(url) = config.masked_database_url() {
        println!("Database: {}", url);
    }
    println!("Core schema: {}", config.core_schema);
    println!("Metadata schema: {}", config.metadata_schema);
    println!("Provisioning failure policy: {:?}", settings.provisioning_failure);
    println!();

    for plan in plan_workspaces(settings) {
        println!("{}", plan);
        println!();
    }
}

fn print_report(report: &SeedReport) {
    println!();
    println!("{}", report);
    if report.has_failures() {
        println!("❌ Development seed finished with {} failure(s)", report.failure_count());
    } else {
        println!("✅ Development seed completed successfully");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use devseed_core::{SEED_APPLE_WORKSPACE_ID, SEED_TWENTY_WORKSPACE_ID};
    use serial_test::serial;
    use std::io;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn warnings_for(config: &SeedConfig) -> String {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        tracing::subscriber::with_default(subscriber, || warn_if_messaging_unseeded(config));

        let bytes = logs.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn flags_override_environment() {
        let args = SeedDevArgs {
            workspaces: vec![SEED_TWENTY_WORKSPACE_ID],
            message_workspace: Some(SEED_TWENTY_WORKSPACE_ID),
            abort_on_provisioning_failure: true,
            ..SeedDevArgs::default()
        };
        let config = resolve_config_from(SeedConfig::default(), &args).unwrap();
        assert_eq!(config.workspace_ids, vec![SEED_TWENTY_WORKSPACE_ID]);
        assert_eq!(config.message_workspace_id, SEED_TWENTY_WORKSPACE_ID);
        assert!(config.abort_on_provisioning_failure);
    }

    #[test]
    fn duplicate_flags_are_a_config_error() {
        let args = SeedDevArgs {
            workspaces: vec![SEED_APPLE_WORKSPACE_ID, SEED_APPLE_WORKSPACE_ID],
            ..SeedDevArgs::default()
        };
        let err = resolve_config_from(SeedConfig::default(), &args).unwrap_err();
        assert_eq!(error_exit_code(&anyhow::Error::from(err)), 2);
    }

    #[test]
    fn unseeded_message_workspace_is_logged_once() {
        let args = SeedDevArgs {
            workspaces: vec![SEED_TWENTY_WORKSPACE_ID],
            ..SeedDevArgs::default()
        };
        let config = resolve_config_from(SeedConfig::default(), &args).unwrap();

        let output = warnings_for(&config);
        let warning = "message-enabled workspace is not in the workspace list";
        assert_eq!(output.matches(warning).count(), 1, "{}", output);
        assert!(output.contains(&SEED_APPLE_WORKSPACE_ID.to_string()));
    }

    #[test]
    fn seeded_message_workspace_logs_nothing() {
        let config = resolve_config_from(SeedConfig::default(), &SeedDevArgs::default()).unwrap();
        assert!(warnings_for(&config).is_empty());
    }

    #[test]
    fn other_errors_exit_with_one() {
        assert_eq!(error_exit_code(&anyhow::anyhow!("connection refused")), 1);
    }

    #[tokio::test]
    #[serial]
    async fn missing_database_url_is_a_config_error() {
        for var in [
            "PG_DATABASE_URL",
            "SEED_WORKSPACE_IDS",
            "SEED_MESSAGE_WORKSPACE_ID",
            "SEED_CORE_SCHEMA",
            "SEED_METADATA_SCHEMA",
            "SEED_ENV",
            "ENVIRONMENT",
            "LOG_LEVEL",
        ] {
            std::env::remove_var(var);
        }

        let err = run(SeedDevArgs::default()).await.unwrap_err();
        assert_eq!(error_exit_code(&err), 2);
        assert!(matches!(
            err.downcast_ref::<ConfigError>(),
            Some(ConfigError::MissingRequired { field, .. }) if field == "database_url"
        ));
    }

    #[tokio::test]
    #[serial]
    async fn dry_run_needs_no_database() {
        std::env::remove_var("PG_DATABASE_URL");
        let args = SeedDevArgs {
            dry_run: true,
            ..SeedDevArgs::default()
        };
        assert_eq!(run(args).await.unwrap(), 0);
    }
}
