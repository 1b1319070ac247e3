use pipesend_api::{
    ExportError,
    ExportResult,
    PipelineContext,
};
use reqwest::header::{
    HeaderName,
    HeaderValue,
};

use crate::domain::SecretHeaderRef;

/// Fetch the secret named by `plan` and turn it into a request header.
pub async fn resolve_secret_header(
    ctx: &dyn PipelineContext, plan: &SecretHeaderRef,
) -> ExportResult<(HeaderName, HeaderValue)> {
    let header_name = HeaderName::from_bytes(plan.header_name.as_bytes()).map_err(|e| {
        ExportError::Configuration(format!(
            "in pipeline '{}', invalid HTTP Header Name '{}': {}",
            ctx.pipeline_id(),
            plan.header_name,
            e
        ))
    })?;

    let mut secrets = ctx
        .secret_provider()
        .get_secret(&plan.secret_name, &[plan.secret_value_key.as_str()])
        .await
        .map_err(|e| match e {
            ExportError::SecretResolution(_) => e,
            other => ExportError::SecretResolution(other.to_string()),
        })?;

    let value = secrets.remove(&plan.secret_value_key).ok_or_else(|| {
        ExportError::SecretResolution(format!(
            "in pipeline '{}', secret '{}' has no value for key '{}'",
            ctx.pipeline_id(),
            plan.secret_name,
            plan.secret_value_key
        ))
    })?;

    let mut header_value = HeaderValue::from_str(&value).map_err(|_| {
        ExportError::SecretResolution(format!(
            "in pipeline '{}', value of secret '{}' is not a valid header value",
            ctx.pipeline_id(),
            plan.secret_name
        ))
    })?;
    header_value.set_sensitive(true);

    tracing::debug!(
        pipeline_id = %ctx.pipeline_id(),
        header = %plan.header_name,
        secret_name = %plan.secret_name,
        secret_value_key = %plan.secret_value_key,
        "Setting HTTP header with secret value from secret store"
    );

    Ok((header_name, header_value))
}
