pub mod automate;
pub mod executor;
pub mod onchain;
pub mod relay;
pub mod secrets;

pub use automate::AutomateClient;
pub use executor::WalletExecutor;
pub use onchain::{OnchainBalanceFetcher, RpcConnector};
pub use relay::RelayClient;
pub use secrets::{EnvSecretStore, StaticSecretStore};
