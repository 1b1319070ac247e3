use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use pipesend_api::{
    ExportError,
    ExportResult,
    SecretProvider,
};
use secrecy::{
    ExposeSecret,
    SecretString,
};

/// In-memory secret store, mainly for embedding and tests
pub struct MemorySecretStore {
    secrets: RwLock<HashMap<String, HashMap<String, SecretString>>>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self {
            secrets: RwLock::new(HashMap::new()),
        }
    }

    pub fn store_secret(&self, name: &str, values: HashMap<String, String>) -> ExportResult<()> {
        let mut secrets = self
            .secrets
            .write()
            .map_err(|e| ExportError::Internal(format!("Lock poisoned: {}", e)))?;
        let entry = secrets.entry(name.to_string()).or_default();
        for (key, value) in values {
            entry.insert(key, SecretString::from(value));
        }
        Ok(())
    }

    pub fn delete_secret(&self, name: &str) -> ExportResult<()> {
        let mut secrets = self
            .secrets
            .write()
            .map_err(|e| ExportError::Internal(format!("Lock poisoned: {}", e)))?;
        secrets.remove(name);
        Ok(())
    }
}

impl Default for MemorySecretStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SecretProvider for MemorySecretStore {
    async fn get_secret(&self, name: &str, keys: &[&str]) -> ExportResult<HashMap<String, String>> {
        let secrets = self
            .secrets
            .read()
            .map_err(|e| ExportError::Internal(format!("Lock poisoned: {}", e)))?;

        let secret = secrets.get(name).ok_or_else(|| {
            ExportError::SecretResolution(format!("Secret '{}' not found", name))
        })?;

        if keys.is_empty() {
            return Ok(secret
                .iter()
                .map(|(k, v)| (k.clone(), v.expose_secret().to_string()))
                .collect());
        }

        keys.iter()
            .map(|key| {
                secret
                    .get(*key)
                    .map(|v| (key.to_string(), v.expose_secret().to_string()))
                    .ok_or_else(|| {
                        ExportError::SecretResolution(format!(
                            "Key '{}' not found in secret '{}'",
                            key, name
                        ))
                    })
            })
            .collect()
    }
}

/// Reads secrets from `<PREFIX><NAME>_<KEY>` environment variables
///
/// Name and key are upper-cased and `-`/`.`/`/` become `_`.
pub struct EnvSecretStore {
    prefix: String,
}

impl EnvSecretStore {
    pub fn new() -> Self {
        Self::with_prefix("PIPESEND_SECRET_")
    }

    pub fn with_prefix(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    fn env_var_name(&self, name: &str, key: &str) -> String {
        format!("{}{}_{}", self.prefix, normalize(name), normalize(key))
    }
}

impl Default for EnvSecretStore {
    fn default() -> Self {
        Self::new()
    }
}

fn normalize(part: &str) -> String {
    part.chars()
        .map(|c| match c {
            '-' | '.' | '/' => '_',
            c => c.to_ascii_uppercase(),
        })
        .collect()
}

#[async_trait]
impl SecretProvider for EnvSecretStore {
    async fn get_secret(&self, name: &str, keys: &[&str]) -> ExportResult<HashMap<String, String>> {
        if keys.is_empty() {
            return Err(ExportError::SecretResolution(format!(
                "Environment secret store needs explicit keys for secret '{}'",
                name
            )));
        }

        keys.iter()
            .map(|key| {
                let var_name = self.env_var_name(name, key);
                std::env::var(&var_name)
                    .map(|value| (key.to_string(), value))
                    .map_err(|_| {
                        ExportError::SecretResolution(format!(
                            "Key '{}' of secret '{}' not found (env var: {})",
                            key, name, var_name
                        ))
                    })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemorySecretStore::new();
        store
            .store_secret(
                "collector",
                HashMap::from([
                    ("token".to_string(), "s3cr3t".to_string()),
                    ("user".to_string(), "edge".to_string()),
                ]),
            )
            .unwrap();

        let values = store.get_secret("collector", &["token"]).await.unwrap();
        assert_eq!(values.len(), 1);
        assert_eq!(values.get("token").unwrap(), "s3cr3t");

        let all = store.get_secret("collector", &[]).await.unwrap();
        assert_eq!(all.len(), 2);

        store.delete_secret("collector").unwrap();
        assert!(store.get_secret("collector", &["token"]).await.is_err());
    }

    #[tokio::test]
    async fn test_memory_store_missing_key() {
        let store = MemorySecretStore::new();
        store
            .store_secret("collector", HashMap::from([("user".to_string(), "edge".to_string())]))
            .unwrap();

        let result = store.get_secret("collector", &["token"]).await;
        assert!(matches!(result, Err(ExportError::SecretResolution(_))));
    }

    #[tokio::test]
    async fn test_env_store() {
        std::env::set_var("PIPESEND_TEST_SECRET_MY_API_TOKEN", "from-env");
        let store = EnvSecretStore::with_prefix("PIPESEND_TEST_SECRET_");

        let values = store.get_secret("my-api", &["token"]).await.unwrap();
        assert_eq!(values.get("token").unwrap(), "from-env");

        assert!(store.get_secret("my-api", &["missing"]).await.is_err());
        assert!(store.get_secret("my-api", &[]).await.is_err());
        std::env::remove_var("PIPESEND_TEST_SECRET_MY_API_TOKEN");
    }

    #[test]
    fn test_env_var_name() {
        let store = EnvSecretStore::new();
        assert_eq!(
            store.env_var_name("edge.collector", "api-key"),
            "PIPESEND_SECRET_EDGE_COLLECTOR_API_KEY"
        );
    }
}
