use clap::Parser;
use fee_claimer::cli::{Cli, Commands};
use fee_claimer::config::AppConfig;
use fee_claimer::error::{ClaimerError, Result};
use tracing::{info, warn};

mod main_modes;
mod main_runtime;

use main_modes::{run_check_mode, run_deploy_mode, run_direct_mode, run_relay_mode, run_watch_mode};
use main_runtime::{init_logging, init_logging_simple};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match AppConfig::load_from(&cli.config_dir) {
        Ok(config) => config,
        Err(e) => {
            init_logging_simple();
            warn!("Failed to load config from {}: {}", cli.config_dir.display(), e);
            return Err(ClaimerError::Config(e));
        }
    };

    match cli.command {
        Commands::Run {
            execute,
            dry_run,
            json,
        } => {
            init_logging(&config.logging);
            if dry_run {
                config.execution.dry_run = true;
            }
            run_direct_mode(&config, execute, json).await?;
        }
        Commands::Relay { dry_run, json } => {
            init_logging(&config.logging);
            if dry_run {
                config.relay.dry_run = true;
            }
            run_relay_mode(&config, json).await?;
        }
        Commands::Watch {
            interval,
            relay,
            execute,
        } => {
            init_logging(&config.logging);
            let interval = interval.unwrap_or(config.watch.interval_secs);
            run_watch_mode(&config, interval, relay, execute).await?;
            info!("Fee claimer stopped");
        }
        Commands::Deploy { bundle } => {
            init_logging(&config.logging);
            run_deploy_mode(&config, bundle).await?;
        }
        Commands::Check => {
            init_logging_simple();
            run_check_mode(&config)?;
        }
    }

    Ok(())
}
