use fee_claimer::adapters::{
    AutomateClient, EnvSecretStore, RelayClient, RpcConnector, WalletExecutor,
};
use fee_claimer::config::{AppConfig, SecretSource};
use fee_claimer::domain::{ChainStatus, FunctionResult, RelayedRun};
use fee_claimer::error::{ClaimerError, Result};
use fee_claimer::signing::Wallet;
use fee_claimer::strategy::{
    deploy_function, execute_calls, run_direct, run_relayed, RelayContext, SecretStore,
};
use std::path::PathBuf;
use tokio::time::{Duration, MissedTickBehavior};
use tracing::{error, info, warn};

use crate::main_runtime::shutdown_signal;

/// One direct pass; optionally sends the returned call from the local wallet
pub async fn run_direct_mode(config: &AppConfig, execute: bool, json: bool) -> Result<FunctionResult> {
    let rpc_urls = config.rpc.chain_urls()?;
    let connector = RpcConnector::new(rpc_urls.clone());

    let result = run_direct(&config.function, config.rpc.default_chain_id, &connector).await;
    print_function_result(&result, json)?;

    if execute && result.can_exec {
        let wallet = Wallet::from_env()?;
        info!("Executing claim from {}", wallet.address());

        let chain_id = config
            .function
            .chain_id
            .unwrap_or(config.rpc.default_chain_id);
        let executor = WalletExecutor::new(wallet, rpc_urls, config.execution.dry_run);

        for hash in execute_calls(&executor, chain_id, &result).await? {
            if hash.is_empty() {
                info!("[DRY RUN] claim not sent");
            } else {
                info!("Claim sent: {}", hash);
            }
        }
    }

    Ok(result)
}

/// One relayed pass over every configured chain
pub async fn run_relay_mode(config: &AppConfig, json: bool) -> Result<RelayedRun> {
    let connector = RpcConnector::new(config.rpc.chain_urls()?);
    let relay = RelayClient::new(&config.relay)?;
    if config.relay.dry_run {
        warn!("Relay dry run: requests are logged, not sent");
    }

    let secrets: Box<dyn SecretStore> = match config.secrets.source {
        SecretSource::Env => Box::new(EnvSecretStore),
        SecretSource::Automate => Box::new(AutomateClient::new(&config.automate)?),
    };

    let ctx = RelayContext {
        connector: &connector,
        relay: &relay,
        secrets: secrets.as_ref(),
        task_id: &config.secrets.task_id,
        api_key_secret: &config.relay.api_key_secret,
    };

    let run = run_relayed(&config.function, &ctx).await;
    print_relayed_run(&run, json)?;
    Ok(run)
}

/// Repeat a pass every `interval` seconds until Ctrl+C or SIGTERM
pub async fn run_watch_mode(
    config: &AppConfig,
    interval: u64,
    relay: bool,
    execute: bool,
) -> Result<()> {
    if interval == 0 {
        return Err(ClaimerError::InvalidConfiguration(
            "watch interval must be positive".into(),
        ));
    }

    info!(
        "Starting fee claimer watch (relay={}, execute={}, interval={}s)",
        relay, execute, interval
    );

    let mut ticker = tokio::time::interval(Duration::from_secs(interval));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                info!("Shutdown signal received, stopping watch");
                break;
            }
            _ = ticker.tick() => {
                let outcome = if relay {
                    run_relay_mode(config, false).await.map(|run| run.result)
                } else {
                    run_direct_mode(config, execute, false).await
                };

                match outcome {
                    Ok(result) => info!(
                        can_exec = result.can_exec,
                        message = result.message.as_deref().unwrap_or(""),
                        "Pass complete, next in {}s",
                        interval
                    ),
                    Err(e) => error!("Pass failed: {}", e),
                }
            }
        }
    }

    Ok(())
}

/// Publish the bundle, create the task and push its secrets
pub async fn run_deploy_mode(config: &AppConfig, bundle: Option<PathBuf>) -> Result<()> {
    let mut deploy = config.deploy.clone();
    if let Some(path) = bundle {
        deploy.bundle_path = path.display().to_string();
    }

    let client = AutomateClient::new(&config.automate)?;
    let report = deploy_function(&client, &deploy).await?;

    println!("\n\x1b[32m✓ Function deployed\x1b[0m");
    println!("  CID:      {}", report.cid);
    println!("  Task ID:  {}", report.task_id);
    if let Some(tx) = &report.tx_hash {
        println!("  Tx hash:  {}", tx);
    }
    println!("  Secrets:  {}", report.secrets_set);
    Ok(())
}

/// Print resolved targets and every configuration problem found
pub fn run_check_mode(config: &AppConfig) -> Result<()> {
    let mut problems = match config.validate() {
        Ok(()) => Vec::new(),
        Err(errors) => errors,
    };

    println!("\n\x1b[36m=== Fee Claimer Configuration ===\x1b[0m");

    match config.function.single_target(config.rpc.default_chain_id) {
        Ok(target) => println!("  Direct target:   {}", target),
        Err(e) => println!("  Direct target:   - ({})", e),
    }

    match config.function.multi_targets() {
        Ok(targets) => {
            println!("  Relayed targets: {}", targets.len());
            for target in &targets {
                println!("    • {}", target);
                if let Ok(urls) = config.rpc.chain_urls() {
                    if !urls.contains_key(&target.chain_id) {
                        problems.push(format!("no rpc.urls entry for chain {}", target.chain_id));
                    }
                }
            }
        }
        Err(e) => println!("  Relayed targets: - ({})", e),
    }

    println!("  Relay endpoint:  {}", config.relay.base_url);
    println!("  Secret source:   {:?} (task {})", config.secrets.source, config.secrets.task_id);

    if problems.is_empty() {
        println!("\n\x1b[32m✓ Configuration OK\x1b[0m");
        Ok(())
    } else {
        println!("\n\x1b[31m✗ {} problem(s):\x1b[0m", problems.len());
        for problem in &problems {
            println!("  - {}", problem);
        }
        Err(ClaimerError::InvalidConfiguration(problems.join("; ")))
    }
}

fn print_function_result(result: &FunctionResult, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    if result.can_exec {
        println!("\x1b[32m✓ canExec: true\x1b[0m");
        for call in result.calls() {
            println!("  to:   {}", call.to);
            println!("  data: {}", call.data);
        }
    } else {
        println!(
            "\x1b[33m• canExec: false\x1b[0m ({})",
            result.message.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}

fn print_relayed_run(run: &RelayedRun, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(run)?);
        return Ok(());
    }

    println!(
        "\n\x1b[36m=== Relayed run {} ===\x1b[0m",
        run.evaluated_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    for chain in &run.chains {
        let line = chain_status_line(&chain.status);
        println!("  chain {:>6} {}  {}", chain.chain_id, chain.fee_claimer, line);
    }
    println!(
        "  result: canExec={} ({})",
        run.result.can_exec,
        run.result.message.as_deref().unwrap_or("-")
    );
    Ok(())
}

fn chain_status_line(status: &ChainStatus) -> String {
    match status {
        ChainStatus::Relayed { task_id, assets } => {
            format!("\x1b[32mrelayed\x1b[0m {} asset(s), task {}", assets, task_id)
        }
        ChainStatus::NothingClaimable => "nothing claimable".to_string(),
        ChainStatus::RpcFailed { reason } => format!("\x1b[31mrpc failed\x1b[0m: {}", reason),
        ChainStatus::RelayFailed { reason } => format!("\x1b[31mrelay failed\x1b[0m: {}", reason),
    }
}
