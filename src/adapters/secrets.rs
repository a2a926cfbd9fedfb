use async_trait::async_trait;
use std::collections::HashMap;
use tracing::debug;

use crate::error::Result;
use crate::signing::SecretString;
use crate::strategy::traits::SecretStore;

/// Secrets from the process environment.
///
/// `NAME__<TASK_ID>` wins over plain `NAME` so one host can serve several tasks.
#[derive(Debug, Clone, Default)]
pub struct EnvSecretStore;

impl EnvSecretStore {
    fn scoped_var(task_id: &str, name: &str) -> String {
        let task: String = task_id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_uppercase() } else { '_' })
            .collect();
        format!("{}__{}", name, task)
    }
}

#[async_trait]
impl SecretStore for EnvSecretStore {
    async fn get(&self, task_id: &str, name: &str) -> Result<Option<SecretString>> {
        let value = std::env::var(Self::scoped_var(task_id, name))
            .or_else(|_| std::env::var(name))
            .ok()
            .map(SecretString::new)
            .filter(|s| !s.is_empty());

        debug!(task_id, name, found = value.is_some(), "Secret lookup");
        Ok(value)
    }
}

/// Fixed in-memory secrets, keyed by task id then name
#[derive(Debug, Clone, Default)]
pub struct StaticSecretStore {
    secrets: HashMap<String, HashMap<String, SecretString>>,
}

impl StaticSecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_secret(mut self, task_id: &str, name: &str, value: &str) -> Self {
        self.secrets
            .entry(task_id.to_string())
            .or_default()
            .insert(name.to_string(), SecretString::from(value));
        self
    }
}

#[async_trait]
impl SecretStore for StaticSecretStore {
    async fn get(&self, task_id: &str, name: &str) -> Result<Option<SecretString>> {
        Ok(self
            .secrets
            .get(task_id)
            .and_then(|scope| scope.get(name))
            .cloned())
    }
}
