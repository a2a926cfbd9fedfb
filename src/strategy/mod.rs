//! Claim strategy
//!
//! - `claimer` - claim-batching policy and per-chain evaluator
//! - `runner` - direct (single chain) and relayed (multi chain) drivers
//! - `deploy` - bundle publication and task registration
//! - `traits` - capability seams for chain, relay, wallet, secrets and automation API

pub mod claimer;
pub mod deploy;
pub mod runner;
pub mod traits;

pub use claimer::{select_claimable, ClaimEvaluator, ClaimOutcome, ClaimPlan};
pub use deploy::{deploy_bundle, deploy_function, DeployReport};
pub use runner::{execute_calls, run_direct, run_relayed, RelayContext};
pub use traits::{
    BalanceFetcher, CallExecutor, ChainConnector, CreateTaskRequest, CreatedTask, SecretStore,
    SponsoredCallRequest, SponsoredRelay, TaskRegistry, TaskTrigger,
};
