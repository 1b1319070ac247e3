//! HTTP export stage for data pipelines.
//!
//! [`HttpSender`] posts or puts the data it receives to a configured URL,
//! optionally with a header taken from the secret store, and decides from
//! the result whether the pipeline continues.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod logging;

pub use application::{
    redact,
    register_destination,
    DestinationMetrics,
    HttpSender,
    ResolvedUrl,
};
pub use domain::{
    ExportConfig,
    SecretHeaderRef,
    DEFAULT_MIME_TYPE,
};
pub use infrastructure::{
    ConfigLoadError,
    ConfigLoader,
    ContextValueFormatter,
    DefaultCoercer,
    EnvSecretStore,
    ExportContext,
    ExportContextBuilder,
    MemorySecretStore,
};
pub use pipesend_api::{
    DataCoercer,
    ExportError,
    ExportOutcome,
    ExportResult,
    MetricsRegistry,
    PipelineContext,
    PipelineData,
    SecretProvider,
    UrlFormatter,
};
