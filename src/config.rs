use alloy::primitives::Address;
use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use tracing::warn;

use crate::domain::ChainTarget;
use crate::error::{ClaimerError, Result};

/// 30 days, the interval the sample task is registered with
pub const DEFAULT_TASK_INTERVAL_MS: u64 = 30 * 24 * 60 * 60 * 1000;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    /// Per-invocation function arguments
    #[serde(default)]
    pub function: FunctionArgs,
    #[serde(default)]
    pub rpc: RpcConfig,
    #[serde(default)]
    pub relay: RelayConfig,
    #[serde(default)]
    pub secrets: SecretsConfig,
    #[serde(default)]
    pub automate: AutomateConfig,
    #[serde(default)]
    pub deploy: DeployConfig,
    #[serde(default)]
    pub execution: ExecutionConfig,
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Function arguments.
///
/// Single chain: `address` + `assets` (one address per entry).
/// Multi chain: `chain_ids` + `fee_claimers` + `data_providers`, or
/// `chain_ids` + `addresses` + `assets` (one comma-delimited list per chain).
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FunctionArgs {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub assets: Vec<String>,
    /// Chain for single-chain mode (falls back to `rpc.default_chain_id`)
    #[serde(default)]
    pub chain_id: Option<u64>,
    #[serde(default)]
    pub chain_ids: Vec<u64>,
    #[serde(default)]
    pub fee_claimers: Vec<String>,
    #[serde(default)]
    pub data_providers: Vec<String>,
    #[serde(default)]
    pub addresses: Vec<String>,
}

fn parse_asset(raw: &str) -> Result<Address> {
    raw.trim().parse().map_err(|e| {
        ClaimerError::InvalidConfiguration(format!("invalid asset address '{}': {}", raw.trim(), e))
    })
}

/// Split one chain's delimited asset string into addresses
pub fn split_asset_list(raw: &str) -> Result<Vec<Address>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(parse_asset)
        .collect()
}

impl FunctionArgs {
    /// Target for single-chain mode
    pub fn single_target(&self, default_chain_id: u64) -> Result<ChainTarget> {
        let address = self
            .address
            .as_deref()
            .map(str::trim)
            .filter(|a| !a.is_empty())
            .ok_or_else(|| ClaimerError::InvalidConfiguration("missing fee claimer address".into()))?;

        let assets = self
            .assets
            .iter()
            .map(|a| parse_asset(a))
            .collect::<Result<Vec<_>>>()?;

        Ok(ChainTarget::explicit(
            self.chain_id.unwrap_or(default_chain_id),
            address,
            assets,
        ))
    }

    /// Targets for multi-chain mode. Lists must be parallel.
    pub fn multi_targets(&self) -> Result<Vec<ChainTarget>> {
        if self.chain_ids.is_empty() {
            return Err(ClaimerError::InvalidConfiguration(
                "chain_ids is empty".into(),
            ));
        }

        let n = self.chain_ids.len();

        if !self.fee_claimers.is_empty() || !self.data_providers.is_empty() {
            if !self.addresses.is_empty() {
                return Err(ClaimerError::InvalidConfiguration(
                    "addresses cannot be combined with fee_claimers/data_providers".into(),
                ));
            }
            if !self.assets.is_empty() {
                warn!("function.assets is ignored when data_providers are configured");
            }

            if self.fee_claimers.len() != n || self.data_providers.len() != n {
                return Err(ClaimerError::InvalidConfiguration(format!(
                    "list lengths differ: chain_ids={}, fee_claimers={}, data_providers={}",
                    n,
                    self.fee_claimers.len(),
                    self.data_providers.len()
                )));
            }

            return self
                .chain_ids
                .iter()
                .zip(&self.fee_claimers)
                .zip(&self.data_providers)
                .map(|((chain_id, claimer), provider)| {
                    let provider: Address = provider.trim().parse().map_err(|e| {
                        ClaimerError::InvalidConfiguration(format!(
                            "invalid data provider '{}': {}",
                            provider.trim(),
                            e
                        ))
                    })?;
                    Ok(ChainTarget::with_data_provider(*chain_id, claimer.trim(), provider))
                })
                .collect();
        }

        if self.addresses.len() != n || self.assets.len() != n {
            return Err(ClaimerError::InvalidConfiguration(format!(
                "list lengths differ: chain_ids={}, addresses={}, assets={}",
                n,
                self.addresses.len(),
                self.assets.len()
            )));
        }

        self.chain_ids
            .iter()
            .zip(&self.addresses)
            .zip(&self.assets)
            .map(|((chain_id, claimer), assets)| {
                Ok(ChainTarget::explicit(
                    *chain_id,
                    claimer.trim(),
                    split_asset_list(assets)?,
                ))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RpcConfig {
    /// RPC endpoint per chain id (keys are decimal chain ids)
    #[serde(default)]
    pub urls: HashMap<String, String>,
    #[serde(default = "default_chain_id")]
    pub default_chain_id: u64,
}

fn default_chain_id() -> u64 {
    1
}

impl Default for RpcConfig {
    fn default() -> Self {
        Self {
            urls: HashMap::new(),
            default_chain_id: default_chain_id(),
        }
    }
}

impl RpcConfig {
    /// Endpoints keyed by numeric chain id; non-numeric keys are rejected
    pub fn chain_urls(&self) -> Result<HashMap<u64, String>> {
        self.urls
            .iter()
            .map(|(k, v)| {
                let chain_id = k.trim().parse::<u64>().map_err(|_| {
                    ClaimerError::InvalidConfiguration(format!("rpc.urls key '{}' is not a chain id", k))
                })?;
                Ok((chain_id, v.clone()))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RelayConfig {
    #[serde(default = "default_relay_url")]
    pub base_url: String,
    /// Name of the secret holding the sponsor API key
    #[serde(default = "default_api_key_secret")]
    pub api_key_secret: String,
    #[serde(default = "default_http_timeout")]
    pub timeout_secs: u64,
    /// Log relay requests instead of sending them
    #[serde(default)]
    pub dry_run: bool,
}

fn default_relay_url() -> String {
    "https://api.gelato.digital".to_string()
}

fn default_api_key_secret() -> String {
    "GELATO_RELAY_API_KEY".to_string()
}

fn default_http_timeout() -> u64 {
    30
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            base_url: default_relay_url(),
            api_key_secret: default_api_key_secret(),
            timeout_secs: default_http_timeout(),
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SecretSource {
    /// Process environment
    #[default]
    Env,
    /// Task secrets held by the automation API
    Automate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecretsConfig {
    #[serde(default)]
    pub source: SecretSource,
    /// Task the secrets are scoped to
    #[serde(default = "default_task_id")]
    pub task_id: String,
}

fn default_task_id() -> String {
    "local".to_string()
}

impl Default for SecretsConfig {
    fn default() -> Self {
        Self {
            source: SecretSource::Env,
            task_id: default_task_id(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AutomateConfig {
    #[serde(default = "default_automate_url")]
    pub base_url: String,
    #[serde(default = "default_automate_timeout")]
    pub timeout_secs: u64,
}

fn default_automate_url() -> String {
    "https://api.gelato.digital/automate".to_string()
}

fn default_automate_timeout() -> u64 {
    60
}

impl Default for AutomateConfig {
    fn default() -> Self {
        Self {
            base_url: default_automate_url(),
            timeout_secs: default_automate_timeout(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeployConfig {
    /// Built function bundle to publish
    #[serde(default = "default_bundle_path")]
    pub bundle_path: String,
    #[serde(default = "default_task_name")]
    pub task_name: String,
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,
    /// Arguments stored with the task
    #[serde(default)]
    pub function_args: BTreeMap<String, serde_json::Value>,
    /// Secrets pushed into the task namespace after creation
    #[serde(default)]
    pub secrets: BTreeMap<String, String>,
}

fn default_bundle_path() -> String {
    "dist/fee-claimer/bundle.bin".to_string()
}

fn default_task_name() -> String {
    "Web3Function - AAVE Paraswap Fee Claimer".to_string()
}

fn default_interval_ms() -> u64 {
    DEFAULT_TASK_INTERVAL_MS
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            bundle_path: default_bundle_path(),
            task_name: default_task_name(),
            interval_ms: default_interval_ms(),
            function_args: BTreeMap::new(),
            secrets: BTreeMap::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct ExecutionConfig {
    /// Log returned calls instead of sending them from the local wallet
    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WatchConfig {
    #[serde(default = "default_watch_interval")]
    pub interval_secs: u64,
}

fn default_watch_interval() -> u64 {
    3600
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_watch_interval(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Enable JSON formatted logs
    #[serde(default)]
    pub json: bool,
    /// Directory for daily rotated log files
    #[serde(default)]
    pub dir: Option<String>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            dir: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from files and environment
    pub fn load() -> std::result::Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> std::result::Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();

        let builder = Config::builder()
            .set_default("logging.level", "info")?
            .set_default("logging.json", false)?
            .add_source(File::from(config_dir.join("default.toml")).required(false))
            // Environment-specific overrides (e.g. config/production.toml)
            .add_source(
                File::from(config_dir.join(
                    std::env::var("FEE_CLAIMER_ENV").unwrap_or_else(|_| "development".to_string()),
                ))
                .required(false),
            )
            // FEE_CLAIMER__FUNCTION__ADDRESS, FEE_CLAIMER__FUNCTION__CHAIN_IDS=1,137, ...
            .add_source(
                Environment::with_prefix("FEE_CLAIMER")
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("function.assets")
                    .with_list_parse_key("function.chain_ids")
                    .with_list_parse_key("function.fee_claimers")
                    .with_list_parse_key("function.data_providers")
                    .with_list_parse_key("function.addresses"),
            );

        builder.build()?.try_deserialize()
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> std::result::Result<Self, ConfigError> {
        Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?
            .try_deserialize()
    }

    /// Validate configuration values that do not depend on the run mode
    pub fn validate(&self) -> std::result::Result<(), Vec<String>> {
        let mut errors = Vec::new();

        match self.rpc.chain_urls() {
            Ok(urls) => {
                for (chain_id, url) in urls {
                    if url::Url::parse(&url).is_err() {
                        errors.push(format!("rpc.urls.{} is not a valid URL: {}", chain_id, url));
                    }
                }
            }
            Err(e) => errors.push(e.to_string()),
        }

        if url::Url::parse(&self.relay.base_url).is_err() {
            errors.push(format!("relay.base_url is not a valid URL: {}", self.relay.base_url));
        }

        if url::Url::parse(&self.automate.base_url).is_err() {
            errors.push(format!(
                "automate.base_url is not a valid URL: {}",
                self.automate.base_url
            ));
        }

        if self.relay.api_key_secret.trim().is_empty() {
            errors.push("relay.api_key_secret must not be empty".to_string());
        }

        if self.deploy.interval_ms == 0 {
            errors.push("deploy.interval_ms must be positive".to_string());
        }

        if self.watch.interval_secs == 0 {
            errors.push("watch.interval_secs must be positive".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}
