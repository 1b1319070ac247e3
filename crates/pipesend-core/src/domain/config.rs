use std::collections::HashMap;

use serde::{
    Deserialize,
    Serialize,
};

pub const DEFAULT_MIME_TYPE: &str = "application/json";

/// Settings for one HTTP export stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Destination URL, may contain `{key}` placeholders
    pub url: String,

    /// Content type sent with the payload, `application/json` when empty
    pub mime_type: String,

    /// Hand failed payloads to store-and-forward
    pub persist_on_error: bool,

    /// Keep the pipeline running after a failed export so chained senders
    /// still see the data
    pub continue_on_send_error: bool,

    /// Return the input instead of the response body
    pub return_input_data: bool,

    /// Header that carries the secret value
    pub http_header_name: String,

    pub secret_name: String,

    pub secret_value_key: String,

    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub request_headers: HashMap<String, String>,
}

impl ExportConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    pub fn resolved_mime_type(&self) -> &str {
        if self.mime_type.is_empty() {
            DEFAULT_MIME_TYPE
        } else {
            &self.mime_type
        }
    }
}
