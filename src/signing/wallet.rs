use crate::error::{ClaimerError, Result};
use alloy::network::EthereumWallet;
use alloy::primitives::Address;
use alloy::signers::local::PrivateKeySigner;
use tracing::info;
use zeroize::Zeroize;

/// Signer used when the host executes a returned claim call itself
///
/// # Security
/// The private key string is zeroized right after the signer is built.
/// It is never stored in the Wallet struct.
#[derive(Clone)]
pub struct Wallet {
    signer: PrivateKeySigner,
}

impl Wallet {
    /// Create a wallet from a private key hex string
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let mut secure_key = private_key.trim().trim_start_matches("0x").to_string();

        let parsed = secure_key.parse::<PrivateKeySigner>();
        secure_key.zeroize();

        let signer =
            parsed.map_err(|e| ClaimerError::Wallet(format!("Invalid private key: {}", e)))?;

        info!(
            "Wallet initialized: {} (private key zeroized from memory)",
            signer.address()
        );

        Ok(Self { signer })
    }

    /// Create a wallet from `FEE_CLAIMER_PRIVATE_KEY` or `PRIVATE_KEY`
    pub fn from_env() -> Result<Self> {
        let mut private_key = std::env::var("FEE_CLAIMER_PRIVATE_KEY")
            .or_else(|_| std::env::var("PRIVATE_KEY"))
            .map_err(|_| {
                ClaimerError::Wallet(
                    "FEE_CLAIMER_PRIVATE_KEY or PRIVATE_KEY environment variable not set"
                        .to_string(),
                )
            })?;

        let result = Self::from_private_key(&private_key);
        private_key.zeroize();

        result
    }

    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Wallet filler for an alloy provider
    pub fn ethereum_wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("address", &self.address())
            .finish()
    }
}
