//! Contract bindings consumed by the claimer.
//!
//! The ABI surface is fixed: a batched balance view, single and batched claim
//! entry points on the fee claimer, and the reserve enumeration on the pool
//! data provider.

use alloy::primitives::{address, Address};
use alloy::sol;

/// Sentinel the relay uses for "pay fees in the chain's native asset"
pub const NATIVE_TOKEN: Address = address!("eeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IFeeClaimer {
        /// Sweep the listed assets to the collector
        function batchClaimToCollector(address[] calldata assets) external;

        /// Claimable balance per asset, index-aligned with the input
        function batchGetClaimable(address[] calldata assets) external view returns (uint256[] memory);

        /// Sweep one asset to the collector
        function claimToCollector(address asset) external;
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface IPoolDataProvider {
        struct TokenData {
            string symbol;
            address tokenAddress;
        }

        function getAllReservesTokens() external view returns (TokenData[] memory);
    }
}
