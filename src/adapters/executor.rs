//! Sends returned claim calls from the host's own wallet.

use alloy::network::TransactionBuilder;
use alloy::providers::{Provider, ProviderBuilder};
use alloy::rpc::types::TransactionRequest;
use async_trait::async_trait;
use std::collections::HashMap;
use tracing::info;

use crate::domain::ClaimCall;
use crate::error::{ClaimerError, Result};
use crate::signing::Wallet;
use crate::strategy::traits::CallExecutor;

pub struct WalletExecutor {
    wallet: Wallet,
    rpc_urls: HashMap<u64, String>,
    dry_run: bool,
}

impl WalletExecutor {
    pub fn new(wallet: Wallet, rpc_urls: HashMap<u64, String>, dry_run: bool) -> Self {
        Self {
            wallet,
            rpc_urls,
            dry_run,
        }
    }
}

#[async_trait]
impl CallExecutor for WalletExecutor {
    async fn execute(&self, chain_id: u64, call: &ClaimCall) -> Result<String> {
        if self.dry_run {
            info!(
                chain_id,
                to = %call.to,
                data = %call.data,
                "[DRY RUN] Would send claim from {}",
                self.wallet.address()
            );
            return Ok(String::new());
        }

        let rpc_url: url::Url = self
            .rpc_urls
            .get(&chain_id)
            .ok_or_else(|| ClaimerError::Rpc(format!("No RPC URL configured for chain {}", chain_id)))?
            .parse()
            .map_err(|e| ClaimerError::Rpc(format!("Invalid RPC URL: {}", e)))?;

        let provider = ProviderBuilder::new()
            .wallet(self.wallet.ethereum_wallet())
            .connect_http(rpc_url);

        let tx = TransactionRequest::default()
            .with_to(call.to)
            .with_input(call.data.clone());

        info!(chain_id, to = %call.to, "Sending claim transaction");

        let pending = provider
            .send_transaction(tx)
            .await
            .map_err(|e| ClaimerError::Transaction(format!("Claim tx failed: {}", e)))?;

        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| ClaimerError::Transaction(format!("Tx confirmation failed: {}", e)))?;

        let tx_hash = format!("{:?}", receipt.transaction_hash);
        info!(chain_id, "Claim confirmed: {}", tx_hash);

        Ok(tx_hash)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::{address, Bytes};

    const TEST_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[tokio::test]
    async fn test_dry_run_skips_network() {
        let executor = WalletExecutor::new(
            Wallet::from_private_key(TEST_KEY).unwrap(),
            HashMap::new(),
            true,
        );

        let call = ClaimCall {
            to: address!("00000000000000000000000000000000000000fe"),
            data: Bytes::from(vec![0x01]),
        };
        assert_eq!(executor.execute(1, &call).await.unwrap(), "");
    }

    #[tokio::test]
    async fn test_unknown_chain_is_rpc_error() {
        let executor = WalletExecutor::new(
            Wallet::from_private_key(TEST_KEY).unwrap(),
            HashMap::new(),
            false,
        );

        let call = ClaimCall {
            to: address!("00000000000000000000000000000000000000fe"),
            data: Bytes::new(),
        };
        let err = executor.execute(5, &call).await.unwrap_err();
        assert!(matches!(err, ClaimerError::Rpc(_)));
    }
}
