//! fee-claimer CLI
//!
//! Commands:
//! - `fee-claimer run` - single-chain evaluation, result handed back to the host
//! - `fee-claimer relay` - multi-chain evaluation with sponsored relay submission
//! - `fee-claimer watch` - run either mode on a fixed interval
//! - `fee-claimer deploy` - publish the bundle and register the recurring task
//! - `fee-claimer check` - show resolved targets and config problems

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Fee claimer CLI
#[derive(Parser, Debug)]
#[command(name = "fee-claimer")]
#[command(author, version, about = "Claims fee-collector balances across chains")]
pub struct Cli {
    /// Directory holding default.toml and environment overrides
    #[arg(long, global = true, default_value = "config", env = "FEE_CLAIMER_CONFIG_DIR")]
    pub config_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Evaluate one chain and print the result for the host executor
    Run {
        /// Send the returned call from the local wallet (PRIVATE_KEY)
        #[arg(long)]
        execute: bool,
        /// Log the call instead of sending it
        #[arg(long)]
        dry_run: bool,
        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Evaluate every configured chain and relay each claim
    Relay {
        /// Log relay requests instead of sending them
        #[arg(long)]
        dry_run: bool,
        /// Print the run report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Re-run on a fixed interval until interrupted
    Watch {
        /// Seconds between runs (defaults to watch.interval_secs)
        #[arg(long)]
        interval: Option<u64>,
        /// Use the relayed multi-chain mode
        #[arg(long)]
        relay: bool,
        /// In direct mode, send returned calls from the local wallet
        #[arg(long, conflicts_with = "relay")]
        execute: bool,
    },

    /// Publish the function bundle and create its task
    Deploy {
        /// Bundle file (defaults to deploy.bundle_path)
        #[arg(long)]
        bundle: Option<PathBuf>,
    },

    /// Validate configuration without touching the network
    Check,
}
