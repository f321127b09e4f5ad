//! negoctl - run satellite coalition negotiations and inspect the results.

use anyhow::Result;
use clap::Parser;
use nego_common::NegoConfig;
use negoctl::cli::{Cli, Commands, ConfigCommands, SatelliteCommands, TaskCommands};
use negoctl::commands::{self, Context};
use negoctl::{errors, logging};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let code = match run(cli).await {
        Ok(()) => errors::EXIT_SUCCESS,
        Err(err) => errors::report(&err),
    };
    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<()> {
    // `config init` must work even when the existing file is broken
    if let Commands::Config { action: ConfigCommands::Init { force } } = &cli.command {
        logging::init("info", cli.verbose);
        return commands::config_init(cli.config.clone(), *force);
    }

    let config = NegoConfig::load(cli.config.as_deref())?;
    logging::init(&config.log.level, cli.verbose);

    let ctx = Context::new(config, cli.config.clone(), cli.backend.clone())?;

    match cli.command {
        Commands::Satellites { action: SatelliteCommands::Create { count, coalitions } } => {
            commands::create_satellites(&ctx, count, coalitions).await
        }
        Commands::Tasks { action: TaskCommands::Create { count } } => {
            commands::create_tasks(&ctx, count).await
        }
        Commands::Negotiate { satellites, tasks, negotiator, initiator, json } => {
            commands::negotiate(&ctx, satellites, tasks, negotiator, initiator, json).await
        }
        Commands::Results { file, json } => commands::results(&ctx, file, json).await,
        Commands::Detail { task_id, file, json } => {
            commands::detail(&ctx, &task_id, file, json).await
        }
        Commands::Save { filename } => commands::save(&ctx, &filename).await,
        Commands::Load { filename } => commands::load(&ctx, &filename).await,
        Commands::Config { action: ConfigCommands::Show } => commands::config_show(&ctx),
        Commands::Config { action: ConfigCommands::Init { force } } => {
            commands::config_init(cli.config, force)
        }
    }
}
