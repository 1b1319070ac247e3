use thiserror::Error;

/// Export stage error types
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExportError {
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("No data received: {0}")]
    NoData(String),

    #[error("Data coercion failed: {0}")]
    Coercion(String),

    #[error("Secret resolution failed: {0}")]
    SecretResolution(String),

    #[error("URL resolution failed: {0}")]
    UrlResolution(String),

    #[error("Export failed: {0}")]
    Transport(String),

    #[error("Export failed with {status} HTTP status code in pipeline '{pipeline_id}'")]
    Status { status: u16, pipeline_id: String },

    #[error("Failed to read response body: {0}")]
    ResponseRead(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ExportError {
    /// True for failures that happened after a request was attempted.
    ///
    /// Only these are eligible for store-and-forward persistence; every other
    /// variant is raised before any network activity.
    pub fn is_export_failure(&self) -> bool {
        matches!(
            self,
            ExportError::Transport(_) | ExportError::Status { .. } | ExportError::ResponseRead(_)
        )
    }
}

pub type ExportResult<T> = Result<T, ExportError>;

impl From<serde_json::Error> for ExportError {
    fn from(err: serde_json::Error) -> Self {
        ExportError::Coercion(err.to_string())
    }
}
