pub mod adapters;
pub mod cli;
pub mod config;
pub mod contracts;
pub mod domain;
pub mod error;
pub mod signing;
pub mod strategy;

pub use config::AppConfig;
pub use domain::{ChainTarget, ClaimCall, FunctionResult, RelayedRun};
pub use error::{ClaimerError, Result};
pub use strategy::{ClaimEvaluator, ClaimOutcome, ClaimPlan};
