//! Publish the function bundle and register its recurring task.

use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{info, warn};

use crate::config::DeployConfig;
use crate::error::{ClaimerError, Result};
use crate::signing::SecretString;
use crate::strategy::traits::{CreateTaskRequest, TaskRegistry, TaskTrigger};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeployReport {
    pub cid: String,
    pub task_id: String,
    pub tx_hash: Option<String>,
    pub secrets_set: usize,
}

/// Read the bundle from `deploy.bundle_path` and deploy it
pub async fn deploy_function(
    registry: &dyn TaskRegistry,
    config: &DeployConfig,
) -> Result<DeployReport> {
    let path = Path::new(&config.bundle_path);
    let bundle = tokio::fs::read(path).await.map_err(|e| {
        ClaimerError::Io(std::io::Error::new(
            e.kind(),
            format!("cannot read bundle {}: {}", path.display(), e),
        ))
    })?;

    deploy_bundle(registry, bundle, config).await
}

/// Publish, create the time-triggered task, then push secrets if any
pub async fn deploy_bundle(
    registry: &dyn TaskRegistry,
    bundle: Vec<u8>,
    config: &DeployConfig,
) -> Result<DeployReport> {
    if bundle.is_empty() {
        return Err(ClaimerError::InvalidConfiguration(
            "function bundle is empty".into(),
        ));
    }

    info!("Deploying function bundle...");
    let cid = registry.publish_bundle(bundle).await?;
    info!("Function bundle CID: {}", cid);

    info!("Creating automation task...");
    let task = registry
        .create_task(CreateTaskRequest {
            name: config.task_name.clone(),
            web3_function_hash: cid.clone(),
            web3_function_args: config.function_args.clone(),
            trigger: TaskTrigger::Time {
                interval: config.interval_ms,
            },
        })
        .await?;
    info!(
        "Task created, taskId: {} (tx hash: {})",
        task.task_id,
        task.tx_hash.as_deref().unwrap_or("n/a")
    );

    let secrets: BTreeMap<String, SecretString> = config
        .secrets
        .iter()
        .filter(|(name, value)| {
            let blank = value.trim().is_empty();
            if blank {
                warn!("Skipping blank secret {}", name);
            }
            !blank
        })
        .map(|(name, value)| (name.clone(), SecretString::from(value.as_str())))
        .collect();

    let secrets_set = secrets.len();
    if secrets_set > 0 {
        registry.set_secrets(&task.task_id, secrets).await?;
        info!("Secrets set ({})", secrets_set);
    }

    Ok(DeployReport {
        cid,
        task_id: task.task_id,
        tx_hash: task.tx_hash,
        secrets_set,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_TASK_INTERVAL_MS;
    use crate::strategy::traits::{CreatedTask, MockTaskRegistry};

    fn registry_expecting_task() -> MockTaskRegistry {
        let mut registry = MockTaskRegistry::new();
        registry
            .expect_publish_bundle()
            .withf(|bundle| bundle == b"bundle")
            .times(1)
            .returning(|_| Ok("bafy-cid".to_string()));
        registry
            .expect_create_task()
            .withf(|req| {
                req.web3_function_hash == "bafy-cid"
                    && req.trigger
                        == TaskTrigger::Time {
                            interval: DEFAULT_TASK_INTERVAL_MS,
                        }
                    && req.name == "Web3Function - AAVE Paraswap Fee Claimer"
            })
            .times(1)
            .returning(|_| {
                Ok(CreatedTask {
                    task_id: "0xtask".to_string(),
                    tx_hash: Some("0xtx".to_string()),
                })
            });
        registry
    }

    #[tokio::test]
    async fn test_deploy_without_secrets_skips_secret_push() {
        let mut registry = registry_expecting_task();
        registry.expect_set_secrets().times(0);

        let report = deploy_bundle(&registry, b"bundle".to_vec(), &DeployConfig::default())
            .await
            .unwrap();

        assert_eq!(report.cid, "bafy-cid");
        assert_eq!(report.task_id, "0xtask");
        assert_eq!(report.tx_hash.as_deref(), Some("0xtx"));
        assert_eq!(report.secrets_set, 0);
    }

    #[tokio::test]
    async fn test_deploy_pushes_non_blank_secrets() {
        let mut registry = registry_expecting_task();
        registry
            .expect_set_secrets()
            .withf(|task_id, secrets| {
                task_id == "0xtask"
                    && secrets.len() == 1
                    && secrets["GELATO_RELAY_API_KEY"].expose_secret() == "key"
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let mut config = DeployConfig::default();
        config
            .secrets
            .insert("GELATO_RELAY_API_KEY".to_string(), "key".to_string());
        config.secrets.insert("EMPTY".to_string(), " ".to_string());

        let report = deploy_bundle(&registry, b"bundle".to_vec(), &config)
            .await
            .unwrap();
        assert_eq!(report.secrets_set, 1);
    }

    #[tokio::test]
    async fn test_deploy_rejects_empty_bundle() {
        let mut registry = MockTaskRegistry::new();
        registry.expect_publish_bundle().times(0);

        let err = deploy_bundle(&registry, Vec::new(), &DeployConfig::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ClaimerError::InvalidConfiguration(_)));
    }

    #[tokio::test]
    async fn test_deploy_missing_bundle_file() {
        let registry = MockTaskRegistry::new();
        let config = DeployConfig {
            bundle_path: "/nonexistent/fee-claimer/bundle.bin".to_string(),
            ..DeployConfig::default()
        };

        let err = deploy_function(&registry, &config).await.unwrap_err();
        assert!(matches!(err, ClaimerError::Io(_)));
    }

    #[test]
    fn test_create_task_request_json() {
        let request = CreateTaskRequest {
            name: "claimer".to_string(),
            web3_function_hash: "cid".to_string(),
            web3_function_args: BTreeMap::new(),
            trigger: TaskTrigger::Time { interval: 1000 },
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["web3FunctionHash"], "cid");
        assert_eq!(json["trigger"]["type"], "time");
        assert_eq!(json["trigger"]["interval"], 1000);
    }
}
