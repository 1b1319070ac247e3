use std::sync::LazyLock;

use pipesend_api::{
    ExportError,
    ExportResult,
    PipelineContext,
    PipelineData,
    UrlFormatter,
};
use regex::{
    Captures,
    Regex,
};

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([^{}]*)\}").expect("Invalid regex pattern"));

/// Replaces `{key}` placeholders with values from the pipeline context.
///
/// Lookups are case-insensitive. A placeholder without a matching context
/// value is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContextValueFormatter;

impl UrlFormatter for ContextValueFormatter {
    fn format(
        &self, template: &str, ctx: &dyn PipelineContext, _data: &PipelineData,
    ) -> ExportResult<String> {
        let mut unresolved = Vec::new();

        let formatted = PLACEHOLDER.replace_all(template, |cap: &Captures| {
            match ctx.get_value(cap[1].trim()) {
                Some(value) => value,
                None => {
                    unresolved.push(cap[0].to_string());
                    cap[0].to_string()
                }
            }
        });

        if !unresolved.is_empty() {
            return Err(ExportError::UrlResolution(format!(
                "failed to replace all context placeholders in input ('{}' after replacements, unresolved: {})",
                formatted,
                unresolved.join(", ")
            )));
        }

        Ok(formatted.into_owned())
    }
}
