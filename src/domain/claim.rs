use alloy::primitives::{Address, Bytes};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Status reported when the function arguments are unusable
pub const MSG_CONFIG_INVALID: &str = "Configuration is not valid";
/// Status reported when the contract or its RPC endpoint cannot be used
pub const MSG_RPC_FAILED: &str = "Rpc call failed";
/// Status reported when every balance is zero
pub const MSG_NOTHING_CLAIMABLE: &str = "No claimable balance";
/// Status reported when the relay sponsor key is missing
pub const MSG_RELAY_NOT_CONFIGURED: &str = "Relay API key not configured";
/// Fixed status of a relayed multi-chain pass
pub const MSG_EVALUATION_COMPLETED: &str = "Fee claim evaluation completed";

/// A call the host (or a relay) should send
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimCall {
    pub to: Address,
    pub data: Bytes,
}

/// Result handed back to the host scheduler
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResult {
    pub can_exec: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_data: Option<Vec<ClaimCall>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl FunctionResult {
    pub fn exec(calls: Vec<ClaimCall>) -> Self {
        Self {
            can_exec: true,
            call_data: Some(calls),
            message: None,
        }
    }

    pub fn skip(message: impl Into<String>) -> Self {
        Self {
            can_exec: false,
            call_data: None,
            message: Some(message.into()),
        }
    }

    pub fn calls(&self) -> &[ClaimCall] {
        self.call_data.as_deref().unwrap_or(&[])
    }
}

/// Receipt returned by the sponsoring relay
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayTaskReceipt {
    pub task_id: String,
}

/// What happened on one chain during a relayed pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ChainStatus {
    Relayed { task_id: String, assets: usize },
    NothingClaimable,
    RpcFailed { reason: String },
    RelayFailed { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainReport {
    pub chain_id: u64,
    pub fee_claimer: String,
    #[serde(flatten)]
    pub status: ChainStatus,
}

/// Outward result plus per-chain detail of a relayed pass
#[derive(Debug, Clone, Serialize)]
pub struct RelayedRun {
    pub result: FunctionResult,
    pub chains: Vec<ChainReport>,
    pub evaluated_at: DateTime<Utc>,
}

impl RelayedRun {
    pub fn rejected(message: &str) -> Self {
        Self {
            result: FunctionResult::skip(message),
            chains: Vec::new(),
            evaluated_at: Utc::now(),
        }
    }

    pub fn relayed_count(&self) -> usize {
        self.chains
            .iter()
            .filter(|c| matches!(c.status, ChainStatus::Relayed { .. }))
            .count()
    }
}
