use alloy::primitives::Address;
use serde::Serialize;

/// Where the evaluator gets the candidate asset list for a chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum AssetSource {
    /// Caller-supplied asset addresses
    Explicit(Vec<Address>),
    /// Pool data provider whose reserve list is enumerated first
    DataProvider(Address),
}

/// One chain's evaluation input. Immutable for a single pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainTarget {
    pub chain_id: u64,
    /// Fee claimer contract address as configured (parsed lazily so a
    /// malformed value surfaces as an RPC failure, not a config error)
    pub fee_claimer: String,
    pub assets: AssetSource,
}

impl ChainTarget {
    pub fn explicit(chain_id: u64, fee_claimer: impl Into<String>, assets: Vec<Address>) -> Self {
        Self {
            chain_id,
            fee_claimer: fee_claimer.into(),
            assets: AssetSource::Explicit(assets),
        }
    }

    pub fn with_data_provider(
        chain_id: u64,
        fee_claimer: impl Into<String>,
        data_provider: Address,
    ) -> Self {
        Self {
            chain_id,
            fee_claimer: fee_claimer.into(),
            assets: AssetSource::DataProvider(data_provider),
        }
    }
}

impl std::fmt::Display for ChainTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.assets {
            AssetSource::Explicit(assets) => write!(
                f,
                "chain={} fee_claimer={} assets={}",
                self.chain_id,
                self.fee_claimer,
                assets.len()
            ),
            AssetSource::DataProvider(provider) => write!(
                f,
                "chain={} fee_claimer={} data_provider={}",
                self.chain_id, self.fee_claimer, provider
            ),
        }
    }
}
