pub mod coerce;
pub mod config;
pub mod context;
pub mod http_client;
pub mod secret_store;
pub mod url_formatter;

pub use coerce::DefaultCoercer;
pub use config::{
    ConfigLoadError,
    ConfigLoadResult,
    ConfigLoader,
};
pub use context::{
    ExportContext,
    ExportContextBuilder,
};
pub use http_client::export_client;
pub use secret_store::{
    EnvSecretStore,
    MemorySecretStore,
};
pub use url_formatter::ContextValueFormatter;
