//! Gelato-style sponsored call relay
//!
//! Submits a call on behalf of the claimer and lets the relay pay gas,
//! authorised by a sponsor API key.

use alloy::primitives::{Address, Bytes};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::RelayConfig;
use crate::domain::RelayTaskReceipt;
use crate::error::{ClaimerError, Result};
use crate::strategy::traits::{SponsoredCallRequest, SponsoredRelay};

const SPONSORED_CALL_PATH: &str = "relays/v2/sponsored-call";

/// Wire body; the only place the sponsor key is exposed
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SponsoredCallBody<'a> {
    chain_id: u64,
    target: Address,
    data: &'a Bytes,
    fee_token: Address,
    sponsor_api_key: &'a str,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SponsoredCallResponse {
    task_id: String,
}

/// HTTP relay client
#[derive(Clone)]
pub struct RelayClient {
    http: Client,
    endpoint: url::Url,
    dry_run: bool,
}

impl RelayClient {
    pub fn new(config: &RelayConfig) -> Result<Self> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClaimerError::Relay(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: sponsored_call_url(&config.base_url)?,
            dry_run: config.dry_run,
        })
    }

    pub fn endpoint(&self) -> &url::Url {
        &self.endpoint
    }
}

/// `{base}/relays/v2/sponsored-call`, tolerating a trailing slash on the base
fn sponsored_call_url(base_url: &str) -> Result<url::Url> {
    let mut base = url::Url::parse(base_url.trim())?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(SPONSORED_CALL_PATH)?)
}

#[async_trait]
impl SponsoredRelay for RelayClient {
    async fn sponsored_call(&self, request: SponsoredCallRequest) -> Result<RelayTaskReceipt> {
        if self.dry_run {
            info!(
                chain_id = request.chain_id,
                target = %request.target,
                data = %request.data,
                "[DRY RUN] Would submit sponsored call to {}",
                self.endpoint()
            );
            return Ok(RelayTaskReceipt {
                task_id: "dry-run".to_string(),
            });
        }

        let body = SponsoredCallBody {
            chain_id: request.chain_id,
            target: request.target,
            data: &request.data,
            fee_token: request.fee_token,
            sponsor_api_key: request.sponsor_api_key.expose_secret(),
        };

        debug!(chain_id = request.chain_id, target = %request.target, "Submitting sponsored call");

        let response = self
            .http
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(|e| ClaimerError::Relay(format!("Relay request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            error!("Relay rejected sponsored call: {} - {}", status, text);
            return Err(ClaimerError::Relay(format!("HTTP {}: {}", status, text)));
        }

        let parsed: SponsoredCallResponse = response
            .json()
            .await
            .map_err(|e| ClaimerError::Relay(format!("Failed to parse relay response: {}", e)))?;

        Ok(RelayTaskReceipt {
            task_id: parsed.task_id,
        })
    }
}
