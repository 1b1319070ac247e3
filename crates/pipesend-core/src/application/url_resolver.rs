use pipesend_api::{
    ExportError,
    ExportResult,
    PipelineContext,
    PipelineData,
    UrlFormatter,
};
use reqwest::Url;

/// Concrete destination of one export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    pub url: Url,
    /// Credential-free form, only for metrics keys and logs
    pub redacted: String,
}

pub fn resolve_url(
    formatter: &dyn UrlFormatter, template: &str, ctx: &dyn PipelineContext, data: &PipelineData,
) -> ExportResult<ResolvedUrl> {
    let formatted = formatter
        .format(template, ctx, data)
        .map_err(|e| match e {
            ExportError::UrlResolution(_) => e,
            other => ExportError::UrlResolution(other.to_string()),
        })?;

    let url = Url::parse(&formatted).map_err(|e| {
        ExportError::UrlResolution(format!(
            "in pipeline '{}', invalid destination URL: {}",
            ctx.pipeline_id(),
            e
        ))
    })?;

    let redacted = redact(&url);
    Ok(ResolvedUrl { url, redacted })
}

/// Strip userinfo from a URL.
pub fn redact(url: &Url) -> String {
    if url.username().is_empty() && url.password().is_none() {
        return url.to_string();
    }

    let mut stripped = url.clone();
    // Only fails for cannot-be-a-base URLs, which never carry userinfo.
    let _ = stripped.set_username("");
    let _ = stripped.set_password(None);
    stripped.to_string()
}
