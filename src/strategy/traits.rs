//! Capability seams between the claim logic and the outside world.
//!
//! Every network-facing collaborator (chain reads, relay, wallet, secret store,
//! automation API) sits behind one of these traits so the evaluator and the
//! drivers can run against fakes.

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::{ClaimCall, RelayTaskReceipt};
use crate::error::Result;
use crate::signing::SecretString;

/// Read-only chain access for one chain
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BalanceFetcher: Send + Sync {
    /// Reserve asset addresses listed by a pool data provider
    async fn reserve_assets(&self, data_provider: Address) -> Result<Vec<Address>>;

    /// `batchGetClaimable` on the fee claimer, index-aligned with `assets`
    async fn claimable_balances(&self, fee_claimer: Address, assets: &[Address])
        -> Result<Vec<U256>>;
}

/// Opens a distinct chain connection per chain id
#[cfg_attr(test, mockall::automock)]
pub trait ChainConnector: Send + Sync {
    fn connect(&self, chain_id: u64) -> Result<Arc<dyn BalanceFetcher>>;
}

/// Body of a fee-sponsored relay call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SponsoredCallRequest {
    pub chain_id: u64,
    pub target: Address,
    pub data: alloy::primitives::Bytes,
    pub fee_token: Address,
    pub sponsor_api_key: SecretString,
}

/// Fee-sponsoring relay
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SponsoredRelay: Send + Sync {
    async fn sponsored_call(&self, request: SponsoredCallRequest) -> Result<RelayTaskReceipt>;
}

/// Sends a returned call on-chain from the host's own wallet
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallExecutor: Send + Sync {
    /// Returns the transaction hash
    async fn execute(&self, chain_id: u64, call: &ClaimCall) -> Result<String>;
}

/// Task-scoped secret lookup
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get(&self, task_id: &str, name: &str) -> Result<Option<SecretString>>;
}

/// Trigger for a registered task
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TaskTrigger {
    Time { interval: u64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub name: String,
    pub web3_function_hash: String,
    pub web3_function_args: BTreeMap<String, serde_json::Value>,
    pub trigger: TaskTrigger,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedTask {
    pub task_id: String,
    pub tx_hash: Option<String>,
}

/// Automation network: bundle store, task registration and task secrets
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TaskRegistry: Send + Sync {
    /// Upload the function bundle, returning its content id
    async fn publish_bundle(&self, bundle: Vec<u8>) -> Result<String>;

    async fn create_task(&self, request: CreateTaskRequest) -> Result<CreatedTask>;

    async fn set_secrets(
        &self,
        task_id: &str,
        secrets: BTreeMap<String, SecretString>,
    ) -> Result<()>;
}
