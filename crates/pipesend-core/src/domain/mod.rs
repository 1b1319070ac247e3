pub mod config;
pub mod validation;

pub use config::{
    ExportConfig,
    DEFAULT_MIME_TYPE,
};
pub use validation::{
    secret_header_plan,
    validate_flags,
    SecretHeaderRef,
};
