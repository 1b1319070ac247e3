use serde::{
    Deserialize,
    Serialize,
};

/// Payload flowing between pipeline stages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum PipelineData {
    Bytes(Vec<u8>),
    Text(String),
    Json(serde_json::Value),
}

impl PipelineData {
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            PipelineData::Bytes(bytes) => Some(bytes),
            PipelineData::Text(text) => Some(text.as_bytes()),
            PipelineData::Json(_) => None,
        }
    }
}

impl From<Vec<u8>> for PipelineData {
    fn from(bytes: Vec<u8>) -> Self {
        PipelineData::Bytes(bytes)
    }
}

impl From<&[u8]> for PipelineData {
    fn from(bytes: &[u8]) -> Self {
        PipelineData::Bytes(bytes.to_vec())
    }
}

impl From<String> for PipelineData {
    fn from(text: String) -> Self {
        PipelineData::Text(text)
    }
}

impl From<&str> for PipelineData {
    fn from(text: &str) -> Self {
        PipelineData::Text(text.to_string())
    }
}

impl From<serde_json::Value> for PipelineData {
    fn from(value: serde_json::Value) -> Self {
        PipelineData::Json(value)
    }
}
