use std::collections::HashMap;
use std::sync::{
    Arc,
    Mutex,
};
use std::time::{
    Duration,
    Instant,
};

use pipesend_api::{
    MetricsRegistry,
    PipelineContext,
    SecretProvider,
};

use super::secret_store::MemorySecretStore;

/// Context handed to a stage for one pipeline execution
pub struct ExportContext {
    pipeline_id: String,
    correlation_id: String,
    values: HashMap<String, String>,
    secret_provider: Arc<dyn SecretProvider>,
    metrics: Arc<MetricsRegistry>,
    deadline: Option<Instant>,
    retry_data: Mutex<Option<Vec<u8>>>,
}

impl ExportContext {
    pub fn builder(pipeline_id: impl Into<String>) -> ExportContextBuilder {
        ExportContextBuilder::new(pipeline_id)
    }

    pub fn set_value(&mut self, key: &str, value: impl Into<String>) {
        self.values.insert(key.to_lowercase(), value.into());
    }

    /// Payload stored by the last persisting failure, if any
    pub fn retry_data(&self) -> Option<Vec<u8>> {
        self.retry_data
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    pub fn take_retry_data(&self) -> Option<Vec<u8>> {
        self.retry_data
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .take()
    }

    pub fn metrics_registry(&self) -> Arc<MetricsRegistry> {
        Arc::clone(&self.metrics)
    }
}

impl PipelineContext for ExportContext {
    fn correlation_id(&self) -> &str {
        &self.correlation_id
    }

    fn pipeline_id(&self) -> &str {
        &self.pipeline_id
    }

    fn get_value(&self, key: &str) -> Option<String> {
        self.values.get(&key.to_lowercase()).cloned()
    }

    fn secret_provider(&self) -> &dyn SecretProvider {
        self.secret_provider.as_ref()
    }

    fn set_retry_data(&self, payload: Vec<u8>) {
        tracing::debug!(
            pipeline_id = %self.pipeline_id,
            bytes = payload.len(),
            "Retry data stored for store-and-forward"
        );
        *self.retry_data.lock().unwrap_or_else(|e| e.into_inner()) = Some(payload);
    }

    fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    fn deadline(&self) -> Option<Instant> {
        self.deadline
    }
}

pub struct ExportContextBuilder {
    pipeline_id: String,
    correlation_id: String,
    values: HashMap<String, String>,
    secret_provider: Option<Arc<dyn SecretProvider>>,
    metrics: Option<Arc<MetricsRegistry>>,
    deadline: Option<Instant>,
}

impl ExportContextBuilder {
    fn new(pipeline_id: impl Into<String>) -> Self {
        Self {
            pipeline_id: pipeline_id.into(),
            correlation_id: String::new(),
            values: HashMap::new(),
            secret_provider: None,
            metrics: None,
            deadline: None,
        }
    }

    pub fn correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = correlation_id.into();
        self
    }

    pub fn value(mut self, key: &str, value: impl Into<String>) -> Self {
        self.values.insert(key.to_lowercase(), value.into());
        self
    }

    pub fn secret_provider(mut self, provider: Arc<dyn SecretProvider>) -> Self {
        self.secret_provider = Some(provider);
        self
    }

    pub fn metrics(mut self, registry: Arc<MetricsRegistry>) -> Self {
        self.metrics = Some(registry);
        self
    }

    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn timeout(self, timeout: Duration) -> Self {
        self.deadline(Instant::now() + timeout)
    }

    pub fn build(self) -> ExportContext {
        ExportContext {
            pipeline_id: self.pipeline_id,
            correlation_id: self.correlation_id,
            values: self.values,
            secret_provider: self
                .secret_provider
                .unwrap_or_else(|| Arc::new(MemorySecretStore::new())),
            metrics: self.metrics.unwrap_or_else(MetricsRegistry::global),
            deadline: self.deadline,
            retry_data: Mutex::new(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_values_case_insensitive() {
        let mut ctx = ExportContext::builder("p1")
            .value("DeviceName", "thermo-1")
            .build();
        ctx.set_value("ProfileName", "thermostat");

        assert_eq!(ctx.get_value("devicename").unwrap(), "thermo-1");
        assert_eq!(ctx.get_value("DEVICENAME").unwrap(), "thermo-1");
        assert_eq!(ctx.get_value("profilename").unwrap(), "thermostat");
        assert!(ctx.get_value("missing").is_none());
    }

    #[test]
    fn test_retry_data_slot() {
        let ctx = ExportContext::builder("p1").build();
        assert!(ctx.retry_data().is_none());

        ctx.set_retry_data(b"payload".to_vec());
        assert_eq!(ctx.retry_data().unwrap(), b"payload".to_vec());
        assert_eq!(ctx.take_retry_data().unwrap(), b"payload".to_vec());
        assert!(ctx.retry_data().is_none());
    }

    #[test]
    fn test_defaults() {
        let ctx = ExportContext::builder("p1").correlation_id("c-1").build();
        assert_eq!(ctx.pipeline_id(), "p1");
        assert_eq!(ctx.correlation_id(), "c-1");
        assert!(ctx.deadline().is_none());
        assert!(Arc::ptr_eq(&ctx.metrics_registry(), &MetricsRegistry::global()));
    }

    #[test]
    fn test_timeout_sets_deadline() {
        let ctx = ExportContext::builder("p1")
            .timeout(Duration::from_secs(5))
            .build();
        assert!(ctx.deadline().unwrap() > Instant::now());
    }
}
