pub mod registrar;
pub mod secret_header;
pub mod sender;
pub mod url_resolver;

pub use registrar::{
    errors_metric_name,
    register_destination,
    size_metric_name,
    DestinationMetrics,
    HTTP_EXPORT_ERRORS_NAME,
    HTTP_EXPORT_SIZE_NAME,
};
pub use secret_header::resolve_secret_header;
pub use sender::HttpSender;
pub use url_resolver::{
    redact,
    resolve_url,
    ResolvedUrl,
};
