//! Function drivers: one pass of the direct (single chain) and relayed
//! (multi chain) variants. Both always produce a well-formed result.

use chrono::Utc;
use tracing::{error, info, warn};

use crate::config::FunctionArgs;
use crate::contracts::NATIVE_TOKEN;
use crate::domain::{
    ChainReport, ChainStatus, ChainTarget, FunctionResult, RelayedRun, MSG_CONFIG_INVALID,
    MSG_EVALUATION_COMPLETED, MSG_RELAY_NOT_CONFIGURED, MSG_RPC_FAILED,
};
use crate::error::Result;
use crate::signing::SecretString;
use crate::strategy::claimer::{ClaimEvaluator, ClaimOutcome};
use crate::strategy::traits::{
    CallExecutor, ChainConnector, SecretStore, SponsoredCallRequest, SponsoredRelay,
};

/// Single-chain pass whose call is handed back to the host
pub async fn run_direct(
    args: &FunctionArgs,
    default_chain_id: u64,
    connector: &dyn ChainConnector,
) -> FunctionResult {
    let target = match args.single_target(default_chain_id) {
        Ok(target) => target,
        Err(e) => {
            warn!("Rejecting function arguments: {}", e);
            return FunctionResult::skip(MSG_CONFIG_INVALID);
        }
    };

    let fetcher = match connector.connect(target.chain_id) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            warn!(chain_id = target.chain_id, "Could not connect: {}", e);
            return FunctionResult::skip(MSG_RPC_FAILED);
        }
    };

    ClaimEvaluator::new(fetcher)
        .evaluate(&target)
        .await
        .into_function_result()
}

/// Send every call of an executable result from the host wallet
pub async fn execute_calls(
    executor: &dyn CallExecutor,
    chain_id: u64,
    result: &FunctionResult,
) -> Result<Vec<String>> {
    let mut hashes = Vec::new();
    if !result.can_exec {
        return Ok(hashes);
    }

    for call in result.calls() {
        hashes.push(executor.execute(chain_id, call).await?);
    }
    Ok(hashes)
}

/// Collaborators for a relayed pass
pub struct RelayContext<'a> {
    pub connector: &'a dyn ChainConnector,
    pub relay: &'a dyn SponsoredRelay,
    pub secrets: &'a dyn SecretStore,
    pub task_id: &'a str,
    pub api_key_secret: &'a str,
}

/// Multi-chain pass that submits each chain's claim through the relay.
///
/// The outward result is fixed once chains are iterated; per-chain relay or
/// RPC failures only show up in the logs and in `RelayedRun::chains`.
pub async fn run_relayed(args: &FunctionArgs, ctx: &RelayContext<'_>) -> RelayedRun {
    let targets = match args.multi_targets() {
        Ok(targets) => targets,
        Err(e) => {
            warn!("Rejecting function arguments: {}", e);
            return RelayedRun::rejected(MSG_CONFIG_INVALID);
        }
    };

    let api_key = match ctx.secrets.get(ctx.task_id, ctx.api_key_secret).await {
        Ok(Some(key)) => key,
        Ok(None) => {
            warn!(task_id = ctx.task_id, secret = ctx.api_key_secret, "Relay API key missing");
            return RelayedRun::rejected(MSG_RELAY_NOT_CONFIGURED);
        }
        Err(e) => {
            error!(task_id = ctx.task_id, "Secret lookup failed: {}", e);
            return RelayedRun::rejected(MSG_RELAY_NOT_CONFIGURED);
        }
    };

    let mut chains = Vec::with_capacity(targets.len());
    for target in &targets {
        let status = evaluate_and_relay(target, &api_key, ctx).await;
        chains.push(ChainReport {
            chain_id: target.chain_id,
            fee_claimer: target.fee_claimer.clone(),
            status,
        });
    }

    let run = RelayedRun {
        result: FunctionResult::skip(MSG_EVALUATION_COMPLETED),
        chains,
        evaluated_at: Utc::now(),
    };

    info!(
        chains = run.chains.len(),
        relayed = run.relayed_count(),
        "Relayed evaluation finished"
    );
    run
}

async fn evaluate_and_relay(
    target: &ChainTarget,
    api_key: &SecretString,
    ctx: &RelayContext<'_>,
) -> ChainStatus {
    let fetcher = match ctx.connector.connect(target.chain_id) {
        Ok(fetcher) => fetcher,
        Err(e) => {
            warn!(chain_id = target.chain_id, "Could not connect: {}", e);
            return ChainStatus::RpcFailed {
                reason: e.to_string(),
            };
        }
    };

    let (call, assets) = match ClaimEvaluator::new(fetcher).evaluate(target).await {
        ClaimOutcome::Claim { call, assets } => (call, assets),
        ClaimOutcome::NothingClaimable => return ChainStatus::NothingClaimable,
        ClaimOutcome::RpcFailed(reason) => return ChainStatus::RpcFailed { reason },
    };

    let request = SponsoredCallRequest {
        chain_id: target.chain_id,
        target: call.to,
        data: call.data,
        fee_token: NATIVE_TOKEN,
        sponsor_api_key: api_key.clone(),
    };

    match ctx.relay.sponsored_call(request).await {
        Ok(receipt) => {
            info!(
                chain_id = target.chain_id,
                task_id = %receipt.task_id,
                "Sponsored claim submitted"
            );
            ChainStatus::Relayed {
                task_id: receipt.task_id,
                assets,
            }
        }
        Err(e) => {
            error!(chain_id = target.chain_id, "Sponsored claim failed: {}", e);
            ChainStatus::RelayFailed {
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contracts::IFeeClaimer;
    use crate::domain::{MSG_NOTHING_CLAIMABLE, RelayTaskReceipt};
    use crate::error::ClaimerError;
    use crate::strategy::traits::{
        BalanceFetcher, MockBalanceFetcher, MockCallExecutor, MockChainConnector,
        MockSecretStore, MockSponsoredRelay,
    };
    use alloy::primitives::{address, Address, U256};
    use alloy::sol_types::SolCall;
    use std::sync::Arc;

    const A: &str = "0x000000000000000000000000000000000000000a";
    const B: &str = "0x000000000000000000000000000000000000000b";
    const CLAIMER: &str = "0x00000000000000000000000000000000000000fe";

    fn fetcher_returning(balances: Vec<u64>) -> Arc<dyn BalanceFetcher> {
        let mut fetcher = MockBalanceFetcher::new();
        fetcher.expect_claimable_balances().returning(move |_, _| {
            Ok(balances.iter().map(|b| U256::from(*b)).collect())
        });
        Arc::new(fetcher)
    }

    fn secrets_with_key() -> MockSecretStore {
        let mut secrets = MockSecretStore::new();
        secrets
            .expect_get()
            .withf(|task, name| task == "task-1" && name == "GELATO_RELAY_API_KEY")
            .returning(|_, _| Ok(Some(SecretString::from("sponsor-key"))));
        secrets
    }

    fn two_chain_args() -> FunctionArgs {
        FunctionArgs {
            chain_ids: vec![1, 137],
            addresses: vec![CLAIMER.into(), CLAIMER.into()],
            assets: vec![format!("{A},{B}"), A.to_string()],
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_direct_missing_address_is_invalid_config() {
        let mut connector = MockChainConnector::new();
        connector.expect_connect().times(0);

        let result = run_direct(&FunctionArgs::default(), 1, &connector).await;
        assert!(!result.can_exec);
        assert_eq!(result.message.as_deref(), Some(MSG_CONFIG_INVALID));
    }

    #[tokio::test]
    async fn test_direct_connect_failure_is_rpc_failed() {
        let mut connector = MockChainConnector::new();
        connector
            .expect_connect()
            .returning(|_| Err(ClaimerError::Rpc("no endpoint".into())));

        let args = FunctionArgs {
            address: Some(CLAIMER.into()),
            assets: vec![A.into()],
            ..Default::default()
        };
        let result = run_direct(&args, 1, &connector).await;
        assert_eq!(result.message.as_deref(), Some(MSG_RPC_FAILED));
    }

    #[tokio::test]
    async fn test_direct_returns_single_claim() {
        let mut connector = MockChainConnector::new();
        connector
            .expect_connect()
            .withf(|chain_id| *chain_id == 10)
            .times(1)
            .returning(|_| Ok(fetcher_returning(vec![0, 5])));

        let args = FunctionArgs {
            address: Some(CLAIMER.into()),
            assets: vec![A.into(), B.into()],
            ..Default::default()
        };
        let result = run_direct(&args, 10, &connector).await;

        assert!(result.can_exec);
        let call = &result.calls()[0];
        assert_eq!(call.to, CLAIMER.parse::<Address>().unwrap());
        let decoded = IFeeClaimer::claimToCollectorCall::abi_decode(&call.data).unwrap();
        assert_eq!(decoded.asset, B.parse::<Address>().unwrap());
    }

    #[tokio::test]
    async fn test_direct_nothing_claimable() {
        let mut connector = MockChainConnector::new();
        connector
            .expect_connect()
            .returning(|_| Ok(fetcher_returning(vec![0])));

        let args = FunctionArgs {
            address: Some(CLAIMER.into()),
            assets: vec![A.into()],
            ..Default::default()
        };
        let result = run_direct(&args, 1, &connector).await;
        assert!(!result.can_exec);
        assert!(result.call_data.is_none());
        assert_eq!(result.message.as_deref(), Some(MSG_NOTHING_CLAIMABLE));
    }

    #[tokio::test]
    async fn test_execute_calls_only_when_executable() {
        let mut executor = MockCallExecutor::new();
        executor
            .expect_execute()
            .times(1)
            .returning(|_, _| Ok("0xhash".to_string()));

        let skip = FunctionResult::skip(MSG_NOTHING_CLAIMABLE);
        assert!(execute_calls(&executor, 1, &skip).await.unwrap().is_empty());

        let exec = FunctionResult::exec(vec![crate::domain::ClaimCall {
            to: address!("00000000000000000000000000000000000000fe"),
            data: Default::default(),
        }]);
        let hashes = execute_calls(&executor, 1, &exec).await.unwrap();
        assert_eq!(hashes, vec!["0xhash".to_string()]);
    }

    #[tokio::test]
    async fn test_relayed_rejects_mismatched_lists_before_network() {
        let mut connector = MockChainConnector::new();
        connector.expect_connect().times(0);
        let mut secrets = MockSecretStore::new();
        secrets.expect_get().times(0);
        let mut relay = MockSponsoredRelay::new();
        relay.expect_sponsored_call().times(0);

        let args = FunctionArgs {
            chain_ids: vec![1, 137],
            addresses: vec![CLAIMER.into()],
            assets: vec![A.into(), A.into()],
            ..Default::default()
        };
        let ctx = RelayContext {
            connector: &connector,
            relay: &relay,
            secrets: &secrets,
            task_id: "task-1",
            api_key_secret: "GELATO_RELAY_API_KEY",
        };

        let run = run_relayed(&args, &ctx).await;
        assert_eq!(run.result.message.as_deref(), Some(MSG_CONFIG_INVALID));
        assert!(run.chains.is_empty());
    }

    #[tokio::test]
    async fn test_relayed_missing_key_iterates_nothing() {
        let mut connector = MockChainConnector::new();
        connector.expect_connect().times(0);
        let mut secrets = MockSecretStore::new();
        secrets.expect_get().returning(|_, _| Ok(None));
        let relay = MockSponsoredRelay::new();

        let ctx = RelayContext {
            connector: &connector,
            relay: &relay,
            secrets: &secrets,
            task_id: "task-1",
            api_key_secret: "GELATO_RELAY_API_KEY",
        };

        let run = run_relayed(&two_chain_args(), &ctx).await;
        assert!(!run.result.can_exec);
        assert_eq!(run.result.message.as_deref(), Some(MSG_RELAY_NOT_CONFIGURED));
        assert!(run.chains.is_empty());
    }

    #[tokio::test]
    async fn test_relayed_submits_per_chain_with_native_fee_token() {
        let mut connector = MockChainConnector::new();
        connector
            .expect_connect()
            .withf(|chain_id| *chain_id == 1)
            .times(1)
            .returning(|_| Ok(fetcher_returning(vec![3, 7])));
        connector
            .expect_connect()
            .withf(|chain_id| *chain_id == 137)
            .times(1)
            .returning(|_| Ok(fetcher_returning(vec![0])));

        let mut relay = MockSponsoredRelay::new();
        relay
            .expect_sponsored_call()
            .withf(|req| {
                req.chain_id == 1
                    && req.fee_token == NATIVE_TOKEN
                    && req.sponsor_api_key.expose_secret() == "sponsor-key"
                    && IFeeClaimer::batchClaimToCollectorCall::abi_decode(&req.data)
                        .map(|c| c.assets.len() == 2)
                        .unwrap_or(false)
            })
            .times(1)
            .returning(|_| {
                Ok(RelayTaskReceipt {
                    task_id: "0xtask".into(),
                })
            });

        let secrets = secrets_with_key();
        let ctx = RelayContext {
            connector: &connector,
            relay: &relay,
            secrets: &secrets,
            task_id: "task-1",
            api_key_secret: "GELATO_RELAY_API_KEY",
        };

        let run = run_relayed(&two_chain_args(), &ctx).await;
        assert_eq!(run.result.message.as_deref(), Some(MSG_EVALUATION_COMPLETED));
        assert!(!run.result.can_exec);
        assert_eq!(run.chains.len(), 2);
        assert_eq!(
            run.chains[0].status,
            ChainStatus::Relayed {
                task_id: "0xtask".into(),
                assets: 2
            }
        );
        assert_eq!(run.chains[1].status, ChainStatus::NothingClaimable);
        assert_eq!(run.relayed_count(), 1);
    }

    #[tokio::test]
    async fn test_relayed_relay_failure_does_not_change_result() {
        let mut connector = MockChainConnector::new();
        connector
            .expect_connect()
            .returning(|_| Ok(fetcher_returning(vec![1, 1])));

        let mut relay = MockSponsoredRelay::new();
        relay
            .expect_sponsored_call()
            .times(2)
            .returning(|_| Err(ClaimerError::Relay("HTTP 503".into())));

        let secrets = secrets_with_key();
        let args = FunctionArgs {
            chain_ids: vec![1, 137],
            addresses: vec![CLAIMER.into(), CLAIMER.into()],
            assets: vec![format!("{A},{B}"), format!("{A},{B}")],
            ..Default::default()
        };
        let ctx = RelayContext {
            connector: &connector,
            relay: &relay,
            secrets: &secrets,
            task_id: "task-1",
            api_key_secret: "GELATO_RELAY_API_KEY",
        };

        let run = run_relayed(&args, &ctx).await;
        assert_eq!(run.result.message.as_deref(), Some(MSG_EVALUATION_COMPLETED));
        assert!(run
            .chains
            .iter()
            .all(|c| matches!(c.status, ChainStatus::RelayFailed { .. })));
    }

    #[tokio::test]
    async fn test_relayed_connect_failure_continues_with_next_chain() {
        let mut connector = MockChainConnector::new();
        connector
            .expect_connect()
            .withf(|chain_id| *chain_id == 1)
            .returning(|_| Err(ClaimerError::Rpc("No RPC URL configured for chain 1".into())));
        connector
            .expect_connect()
            .withf(|chain_id| *chain_id == 137)
            .returning(|_| Ok(fetcher_returning(vec![0])));

        let relay = MockSponsoredRelay::new();
        let secrets = secrets_with_key();
        let ctx = RelayContext {
            connector: &connector,
            relay: &relay,
            secrets: &secrets,
            task_id: "task-1",
            api_key_secret: "GELATO_RELAY_API_KEY",
        };

        let run = run_relayed(&two_chain_args(), &ctx).await;
        assert!(matches!(run.chains[0].status, ChainStatus::RpcFailed { .. }));
        assert_eq!(run.chains[1].status, ChainStatus::NothingClaimable);
    }
}
