//! Alloy-backed chain reads for the fee claimer and pool data provider.

use alloy::primitives::{Address, U256};
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

use crate::contracts::{IFeeClaimer, IPoolDataProvider};
use crate::error::{ClaimerError, Result};
use crate::strategy::traits::{BalanceFetcher, ChainConnector};

/// Balance reader bound to one HTTP RPC endpoint
#[derive(Clone)]
pub struct OnchainBalanceFetcher {
    provider: DynProvider,
}

impl OnchainBalanceFetcher {
    pub fn connect_http(rpc_url: &str) -> Result<Self> {
        let url: url::Url = rpc_url
            .trim()
            .parse()
            .map_err(|e| ClaimerError::Rpc(format!("Invalid RPC URL {}: {}", rpc_url, e)))?;
        let provider = ProviderBuilder::new().connect_http(url).erased();

        Ok(Self { provider })
    }
}

#[async_trait]
impl BalanceFetcher for OnchainBalanceFetcher {
    async fn reserve_assets(&self, data_provider: Address) -> Result<Vec<Address>> {
        let contract = IPoolDataProvider::new(data_provider, self.provider.clone());

        let tokens = contract
            .getAllReservesTokens()
            .call()
            .await
            .map_err(|e| ClaimerError::Rpc(format!("getAllReservesTokens failed: {}", e)))?;

        for token in &tokens {
            debug!(symbol = %token.symbol, asset = %token.tokenAddress, "Reserve token");
        }

        Ok(tokens.into_iter().map(|t| t.tokenAddress).collect())
    }

    async fn claimable_balances(
        &self,
        fee_claimer: Address,
        assets: &[Address],
    ) -> Result<Vec<U256>> {
        let contract = IFeeClaimer::new(fee_claimer, self.provider.clone());

        contract
            .batchGetClaimable(assets.to_vec())
            .call()
            .await
            .map_err(|e| ClaimerError::Rpc(format!("batchGetClaimable failed: {}", e)))
    }
}

/// Builds a fresh provider per chain from the configured endpoints
#[derive(Debug, Clone, Default)]
pub struct RpcConnector {
    urls: HashMap<u64, String>,
}

impl RpcConnector {
    pub fn new(urls: HashMap<u64, String>) -> Self {
        Self { urls }
    }

    pub fn url_for(&self, chain_id: u64) -> Option<&str> {
        self.urls.get(&chain_id).map(String::as_str)
    }
}

impl ChainConnector for RpcConnector {
    fn connect(&self, chain_id: u64) -> Result<Arc<dyn BalanceFetcher>> {
        let url = self.url_for(chain_id).ok_or_else(|| {
            ClaimerError::Rpc(format!("No RPC URL configured for chain {}", chain_id))
        })?;

        debug!(chain_id, "Opening RPC connection");
        Ok(Arc::new(OnchainBalanceFetcher::connect_http(url)?))
    }
}
