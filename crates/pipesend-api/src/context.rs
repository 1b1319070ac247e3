use std::collections::HashMap;
use std::time::Instant;

use async_trait::async_trait;

use crate::error::ExportResult;
use crate::metrics::MetricsRegistry;

/// Secret store accessor
#[async_trait]
pub trait SecretProvider: Send + Sync {
    /// Fetch the requested keys of a named secret.
    ///
    /// Implementations fail when the secret or any requested key is missing.
    async fn get_secret(&self, name: &str, keys: &[&str]) -> ExportResult<HashMap<String, String>>;
}

/// Per-execution view of the pipeline that invoked a stage
pub trait PipelineContext: Send + Sync {
    /// Correlation id of the event that triggered this execution
    fn correlation_id(&self) -> &str;

    /// Id of the pipeline being executed, used in diagnostics
    fn pipeline_id(&self) -> &str;

    /// Look up a context value (case-insensitive)
    fn get_value(&self, key: &str) -> Option<String>;

    fn secret_provider(&self) -> &dyn SecretProvider;

    /// Hand a payload to the store-and-forward mechanism for later replay
    fn set_retry_data(&self, payload: Vec<u8>);

    fn metrics(&self) -> &MetricsRegistry;

    /// Deadline after which in-flight work for this execution is abandoned
    fn deadline(&self) -> Option<Instant> {
        None
    }
}
