//! Fee claim evaluation
//!
//! Reads claimable balances for a chain's asset list from the fee claimer
//! contract and turns the positive ones into the smallest claim call:
//! nothing, `claimToCollector(asset)` or `batchClaimToCollector(assets)`.

use alloy::primitives::{Address, U256};
use alloy::sol_types::SolCall;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::contracts::IFeeClaimer;
use crate::domain::{
    AssetSource, ChainTarget, ClaimCall, FunctionResult, MSG_NOTHING_CLAIMABLE, MSG_RPC_FAILED,
};
use crate::error::{ClaimerError, Result};
use crate::strategy::traits::BalanceFetcher;

/// A balance counts only when it is present and strictly positive.
/// A short balance list leaves the trailing assets without an entry.
fn is_claimable(balance: Option<&U256>) -> bool {
    match balance {
        Some(amount) => *amount > U256::ZERO,
        None => false,
    }
}

/// Assets whose index-aligned balance is claimable, in original order
pub fn select_claimable(assets: &[Address], balances: &[U256]) -> Vec<Address> {
    assets
        .iter()
        .enumerate()
        .filter(|(i, _)| is_claimable(balances.get(*i)))
        .map(|(_, asset)| *asset)
        .collect()
}

/// Which claim entry point, if any, a batch maps to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimPlan {
    Nothing,
    Single(Address),
    Batch(Vec<Address>),
}

impl ClaimPlan {
    pub fn from_claimable(mut assets: Vec<Address>) -> Self {
        match assets.len() {
            0 => ClaimPlan::Nothing,
            1 => ClaimPlan::Single(assets.remove(0)),
            _ => ClaimPlan::Batch(assets),
        }
    }

    pub fn asset_count(&self) -> usize {
        match self {
            ClaimPlan::Nothing => 0,
            ClaimPlan::Single(_) => 1,
            ClaimPlan::Batch(assets) => assets.len(),
        }
    }

    /// ABI-encode the call against `fee_claimer`
    pub fn encode(&self, fee_claimer: Address) -> Option<ClaimCall> {
        let data = match self {
            ClaimPlan::Nothing => return None,
            ClaimPlan::Single(asset) => IFeeClaimer::claimToCollectorCall { asset: *asset }.abi_encode(),
            ClaimPlan::Batch(assets) => IFeeClaimer::batchClaimToCollectorCall {
                assets: assets.clone(),
            }
            .abi_encode(),
        };

        Some(ClaimCall {
            to: fee_claimer,
            data: data.into(),
        })
    }
}

/// Result of evaluating one chain
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClaimOutcome {
    Claim { call: ClaimCall, assets: usize },
    NothingClaimable,
    RpcFailed(String),
}

impl ClaimOutcome {
    pub fn into_function_result(self) -> FunctionResult {
        match self {
            ClaimOutcome::Claim { call, .. } => FunctionResult::exec(vec![call]),
            ClaimOutcome::NothingClaimable => FunctionResult::skip(MSG_NOTHING_CLAIMABLE),
            ClaimOutcome::RpcFailed(_) => FunctionResult::skip(MSG_RPC_FAILED),
        }
    }
}

/// Evaluates claimable fees on a single chain
pub struct ClaimEvaluator {
    fetcher: Arc<dyn BalanceFetcher>,
}

impl ClaimEvaluator {
    pub fn new(fetcher: Arc<dyn BalanceFetcher>) -> Self {
        Self { fetcher }
    }

    /// Evaluate a chain target. Failures come back as `RpcFailed`, never as errors.
    pub async fn evaluate(&self, target: &ChainTarget) -> ClaimOutcome {
        let fee_claimer = match parse_address(&target.fee_claimer) {
            Ok(addr) => addr,
            Err(e) => {
                warn!(chain_id = target.chain_id, "Invalid fee claimer address: {}", e);
                return ClaimOutcome::RpcFailed(e.to_string());
            }
        };

        match self.try_evaluate(target.chain_id, fee_claimer, &target.assets).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(
                    chain_id = target.chain_id,
                    fee_claimer = %fee_claimer,
                    "Claimable balance read failed: {}",
                    e
                );
                ClaimOutcome::RpcFailed(e.to_string())
            }
        }
    }

    /// Explicit list as given, or the data provider's reserve tokens
    pub async fn resolve_assets(&self, source: &AssetSource) -> Result<Vec<Address>> {
        match source {
            AssetSource::Explicit(assets) => Ok(assets.clone()),
            AssetSource::DataProvider(provider) => {
                let assets = self.fetcher.reserve_assets(*provider).await?;
                debug!(
                    data_provider = %provider,
                    "Discovered {} reserve assets",
                    assets.len()
                );
                Ok(assets)
            }
        }
    }

    async fn try_evaluate(
        &self,
        chain_id: u64,
        fee_claimer: Address,
        source: &AssetSource,
    ) -> Result<ClaimOutcome> {
        let assets = self.resolve_assets(source).await?;
        if assets.is_empty() {
            debug!(chain_id, "No assets to check");
            return Ok(ClaimOutcome::NothingClaimable);
        }

        let balances = self
            .fetcher
            .claimable_balances(fee_claimer, &assets)
            .await?;

        if balances.len() != assets.len() {
            warn!(
                chain_id,
                assets = assets.len(),
                balances = balances.len(),
                "batchGetClaimable returned a misaligned balance list"
            );
        }

        for (i, asset) in assets.iter().enumerate() {
            match balances.get(i) {
                Some(balance) => info!(chain_id, asset = %asset, balance = %balance, "Asset balance"),
                None => info!(chain_id, asset = %asset, balance = "missing", "Asset balance"),
            }
        }

        let plan = ClaimPlan::from_claimable(select_claimable(&assets, &balances));
        let outcome = match plan.encode(fee_claimer) {
            Some(call) => {
                info!(
                    chain_id,
                    fee_claimer = %fee_claimer,
                    "{} claimable asset(s)",
                    plan.asset_count()
                );
                ClaimOutcome::Claim {
                    call,
                    assets: plan.asset_count(),
                }
            }
            None => {
                info!(chain_id, fee_claimer = %fee_claimer, "No claimable balance");
                ClaimOutcome::NothingClaimable
            }
        };

        Ok(outcome)
    }
}

/// Parse a configured address, mapping failures to `AddressParsing`
pub fn parse_address(raw: &str) -> Result<Address> {
    raw.trim()
        .parse()
        .map_err(|e| ClaimerError::AddressParsing(format!("{}: {}", raw.trim(), e)))
}
