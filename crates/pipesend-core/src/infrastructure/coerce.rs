use pipesend_api::{
    DataCoercer,
    ExportResult,
    PipelineData,
};

/// Bytes pass through, text is sent as UTF-8 and JSON values are serialized.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultCoercer;

impl DataCoercer for DefaultCoercer {
    fn coerce(&self, data: &PipelineData) -> ExportResult<Vec<u8>> {
        match data {
            PipelineData::Bytes(bytes) => Ok(bytes.clone()),
            PipelineData::Text(text) => Ok(text.as_bytes().to_vec()),
            PipelineData::Json(value) => Ok(serde_json::to_vec(value)?),
        }
    }
}
