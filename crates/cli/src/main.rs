mod commands;
mod logging;

use clap::{Parser, Subcommand};
use commands::seed::{self, SeedDevArgs};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "devseed")]
#[command(version, about = "Seed development workspaces with a sample CRM dataset")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Seed the development workspaces: core rows, schemas, metadata and sample data
    #[command(name = "workspace:seed:dev")]
    WorkspaceSeedDev(SeedDevArgs),
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::WorkspaceSeedDev(args) => match seed::run(args).await {
            Ok(code) => ExitCode::from(code),
            Err(e) => {
                eprintln!("❌ {:#}", e);
                ExitCode::from(seed::error_exit_code(&e))
            }
        },
    }
}
