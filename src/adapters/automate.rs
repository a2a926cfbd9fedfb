//! Automation network API: bundle store, task registration and task secrets.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use tracing::{debug, error, info};

use crate::config::AutomateConfig;
use crate::error::{ClaimerError, Result};
use crate::signing::SecretString;
use crate::strategy::traits::{CreateTaskRequest, CreatedTask, SecretStore, TaskRegistry};

#[derive(Deserialize)]
struct PublishResponse {
    cid: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTaskResponse {
    task_id: String,
    #[serde(default)]
    tx_hash: Option<String>,
}

#[derive(Deserialize)]
struct SecretResponse {
    value: String,
}

/// HTTP client for the automation API
#[derive(Clone)]
pub struct AutomateClient {
    http: Client,
    base_url: String,
}

impl AutomateClient {
    pub fn new(config: &AutomateConfig) -> Result<Self> {
        url::Url::parse(config.base_url.trim())?;

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ClaimerError::Automate(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn check(response: reqwest::Response, what: &str) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        error!("{} failed: {} - {}", what, status, body);
        Err(ClaimerError::Automate(format!(
            "{} failed: HTTP {}: {}",
            what, status, body
        )))
    }
}

#[async_trait]
impl TaskRegistry for AutomateClient {
    async fn publish_bundle(&self, bundle: Vec<u8>) -> Result<String> {
        let size = bundle.len();
        let response = self
            .http
            .post(self.url("web3-functions"))
            .header(reqwest::header::CONTENT_TYPE, "application/octet-stream")
            .body(bundle)
            .send()
            .await?;

        let parsed: PublishResponse = Self::check(response, "Bundle upload").await?.json().await?;
        info!(cid = %parsed.cid, bytes = size, "Function bundle published");
        Ok(parsed.cid)
    }

    async fn create_task(&self, request: CreateTaskRequest) -> Result<CreatedTask> {
        debug!(name = %request.name, "Creating task");
        let response = self
            .http
            .post(self.url("tasks"))
            .json(&request)
            .send()
            .await?;

        let parsed: CreateTaskResponse = Self::check(response, "Task creation").await?.json().await?;
        Ok(CreatedTask {
            task_id: parsed.task_id,
            tx_hash: parsed.tx_hash,
        })
    }

    async fn set_secrets(
        &self,
        task_id: &str,
        secrets: BTreeMap<String, SecretString>,
    ) -> Result<()> {
        let exposed: BTreeMap<&str, &str> = secrets
            .iter()
            .map(|(k, v)| (k.as_str(), v.expose_secret()))
            .collect();

        let response = self
            .http
            .post(self.url(&format!("tasks/{}/secrets", task_id)))
            .json(&exposed)
            .send()
            .await?;

        Self::check(response, "Setting task secrets").await?;
        Ok(())
    }
}

#[async_trait]
impl SecretStore for AutomateClient {
    async fn get(&self, task_id: &str, name: &str) -> Result<Option<SecretString>> {
        let response = self
            .http
            .get(self.url(&format!("tasks/{}/secrets/{}", task_id, name)))
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let parsed: SecretResponse = Self::check(response, "Secret lookup").await?.json().await?;
        let secret = SecretString::new(parsed.value);
        Ok(if secret.is_empty() { None } else { Some(secret) })
    }
}
