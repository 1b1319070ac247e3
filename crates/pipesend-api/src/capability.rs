//! Pluggable single-method capabilities injected into export stages

use crate::context::PipelineContext;
use crate::data::PipelineData;
use crate::error::ExportResult;

/// Expands placeholders in a URL template
pub trait UrlFormatter: Send + Sync {
    fn format(
        &self, template: &str, ctx: &dyn PipelineContext, data: &PipelineData,
    ) -> ExportResult<String>;
}

/// Converts pipeline data into the bytes placed on the wire
pub trait DataCoercer: Send + Sync {
    fn coerce(&self, data: &PipelineData) -> ExportResult<Vec<u8>>;
}

impl<F> UrlFormatter for F
where
    F: Fn(&str, &dyn PipelineContext, &PipelineData) -> ExportResult<String> + Send + Sync,
{
    fn format(
        &self, template: &str, ctx: &dyn PipelineContext, data: &PipelineData,
    ) -> ExportResult<String> {
        self(template, ctx, data)
    }
}
