//! HTTP export stage
//!
//! One invocation validates the configuration, resolves the secret header and
//! destination, registers per-destination metrics, performs a single request
//! and routes the outcome:
//!
//! - non-2xx or transport failure: count the error, then either continue with
//!   the input (`continue_on_send_error`) or halt, handing the payload to
//!   store-and-forward when `persist_on_error` is set;
//! - 2xx: record the payload size, then return the input
//!   (`return_input_data`) or the response body.

use std::collections::HashMap;
use std::sync::{
    Arc,
    RwLock,
};

use pipesend_api::{
    DataCoercer,
    ExportError,
    ExportOutcome,
    ExportResult,
    PipelineContext,
    PipelineData,
    UrlFormatter,
};
use reqwest::header::{
    HeaderMap,
    HeaderName,
    HeaderValue,
    CONTENT_TYPE,
};
use reqwest::{
    Method,
    RequestBuilder,
};
use tracing::Instrument;

use super::registrar::{
    register_destination,
    DestinationMetrics,
};
use super::secret_header::resolve_secret_header;
use super::url_resolver::{
    resolve_url,
    ResolvedUrl,
};
use crate::domain::{
    secret_header_plan,
    validate_flags,
    ExportConfig,
};
use crate::infrastructure::http_client::{
    export_client,
    remaining_until,
};
use crate::infrastructure::{
    ContextValueFormatter,
    DefaultCoercer,
};


/// Everything resolved before the request goes out
struct PreparedExport {
    input: PipelineData,
    payload: Vec<u8>,
    destination: ResolvedUrl,
    secret_header: Option<(HeaderName, HeaderValue)>,
    metrics: DestinationMetrics,
}

pub struct HttpSender {
    config: ExportConfig,
    mime_type: String,
    url_formatter: Arc<dyn UrlFormatter>,
    coercer: Arc<dyn DataCoercer>,
    request_headers: RwLock<HashMap<String, String>>,
}

impl HttpSender {
    pub fn new(url: impl Into<String>, mime_type: impl Into<String>, persist_on_error: bool) -> Self {
        Self::with_options(ExportConfig {
            mime_type: mime_type.into(),
            persist_on_error,
            ..ExportConfig::new(url)
        })
    }

    pub fn with_secret_header(
        url: impl Into<String>, mime_type: impl Into<String>, persist_on_error: bool,
        header_name: impl Into<String>, secret_name: impl Into<String>,
        secret_value_key: impl Into<String>,
    ) -> Self {
        Self::with_options(ExportConfig {
            mime_type: mime_type.into(),
            persist_on_error,
            http_header_name: header_name.into(),
            secret_name: secret_name.into(),
            secret_value_key: secret_value_key.into(),
            ..ExportConfig::new(url)
        })
    }

    pub fn with_options(mut config: ExportConfig) -> Self {
        let request_headers = std::mem::take(&mut config.request_headers);
        let mime_type = config.resolved_mime_type().to_string();

        Self {
            config,
            mime_type,
            url_formatter: Arc::new(ContextValueFormatter),
            coercer: Arc::new(DefaultCoercer),
            request_headers: RwLock::new(request_headers),
        }
    }

    pub fn with_url_formatter(mut self, formatter: Arc<dyn UrlFormatter>) -> Self {
        self.url_formatter = formatter;
        self
    }

    pub fn with_coercer(mut self, coercer: Arc<dyn DataCoercer>) -> Self {
        self.coercer = coercer;
        self
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Content type sent with every request
    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    /// Replace all static request headers. `None` keeps the current ones.
    pub fn set_request_headers(&self, headers: Option<HashMap<String, String>>) {
        if let Some(headers) = headers {
            *self
                .request_headers
                .write()
                .unwrap_or_else(|e| e.into_inner()) = headers;
        }
    }

    pub fn request_headers(&self) -> HashMap<String, String> {
        self.request_headers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Send the data with POST.
    ///
    /// `data` is the output of the previous stage, or the triggering event
    /// when this is the first one.
    pub async fn http_post(
        &self, ctx: &dyn PipelineContext, data: Option<PipelineData>,
    ) -> ExportOutcome {
        self.send(ctx, data, Method::POST).await
    }

    /// Send the data with PUT.
    pub async fn http_put(
        &self, ctx: &dyn PipelineContext, data: Option<PipelineData>,
    ) -> ExportOutcome {
        self.send(ctx, data, Method::PUT).await
    }

    async fn send(
        &self, ctx: &dyn PipelineContext, data: Option<PipelineData>, method: Method,
    ) -> ExportOutcome {
        let span = tracing::debug_span!(
            "http_export",
            pipeline_id = %ctx.pipeline_id(),
            correlation_id = %ctx.correlation_id(),
            method = %method,
        );

        async move {
            tracing::debug!(pipeline_id = %ctx.pipeline_id(), "HTTP exporting");

            let prepared = match self.prepare(ctx, data, &method).await {
                Ok(prepared) => prepared,
                Err(err) => {
                    tracing::error!(error = %err, "HTTP export aborted before sending");
                    return ExportOutcome::Halt(err);
                }
            };

            self.transfer(ctx, method, prepared).await
        }
        .instrument(span)
        .await
    }

    async fn prepare(
        &self, ctx: &dyn PipelineContext, data: Option<PipelineData>, method: &Method,
    ) -> ExportResult<PreparedExport> {
        let pipeline_id = ctx.pipeline_id();

        validate_flags(&self.config, pipeline_id)?;
        let secret_plan = secret_header_plan(&self.config, pipeline_id)?;

        let input = data.ok_or_else(|| {
            ExportError::NoData(format!(
                "function HTTP {} in pipeline '{}'",
                method, pipeline_id
            ))
        })?;

        let payload = self.coercer.coerce(&input).map_err(|e| match e {
            ExportError::Coercion(_) => e,
            other => ExportError::Coercion(other.to_string()),
        })?;

        let secret_header = match &secret_plan {
            Some(plan) => Some(resolve_secret_header(ctx, plan).await?),
            None => None,
        };

        let destination = resolve_url(self.url_formatter.as_ref(), &self.config.url, ctx, &input)?;
        let metrics = register_destination(ctx.metrics(), &destination.redacted)?;

        Ok(PreparedExport {
            input,
            payload,
            destination,
            secret_header,
            metrics,
        })
    }

    async fn transfer(
        &self, ctx: &dyn PipelineContext, method: Method, prepared: PreparedExport,
    ) -> ExportOutcome {
        let pipeline_id = ctx.pipeline_id();

        let request = match self.build_request(ctx, method, &prepared) {
            Ok(request) => request,
            Err(err) => {
                tracing::error!(error = %err, "Failed to build export request");
                return ExportOutcome::Halt(err);
            }
        };

        tracing::debug!(
            url = %prepared.destination.redacted,
            pipeline_id = %pipeline_id,
            "Sending data"
        );

        let response = match request.send().await {
            Ok(response) if response.status().is_success() => response,
            Ok(response) => {
                let err = ExportError::Status {
                    status: response.status().as_u16(),
                    pipeline_id: pipeline_id.to_string(),
                };
                return self.export_failed(ctx, prepared, err);
            }
            Err(e) => {
                let err =
                    ExportError::Transport(format!("in pipeline '{}': {}", pipeline_id, e));
                return self.export_failed(ctx, prepared, err);
            }
        };

        let sent = prepared.payload.len();
        prepared.metrics.size.update(sent as i64);

        tracing::debug!(
            bytes = sent,
            status = %response.status(),
            pipeline_id = %pipeline_id,
            "Sent data"
        );
        tracing::trace!(
            pipeline_id = %pipeline_id,
            correlation_id = %ctx.correlation_id(),
            "Data exported"
        );

        // Chained senders only need the input, so the body is never read.
        if self.config.return_input_data {
            return ExportOutcome::Continue(prepared.input);
        }

        match response.bytes().await {
            Ok(body) => ExportOutcome::Continue(PipelineData::Bytes(body.to_vec())),
            Err(e) => {
                // continue_on_send_error requires return_input_data, so it cannot apply here.
                let err =
                    ExportError::ResponseRead(format!("in pipeline '{}': {}", pipeline_id, e));
                self.persist_if_enabled(ctx, prepared.payload, &err);
                ExportOutcome::Halt(err)
            }
        }
    }

    fn build_request(
        &self, ctx: &dyn PipelineContext, method: Method, prepared: &PreparedExport,
    ) -> ExportResult<RequestBuilder> {
        let mut headers = HeaderMap::new();

        if let Some((name, value)) = &prepared.secret_header {
            headers.insert(name.clone(), value.clone());
        }

        let content_type = HeaderValue::from_str(&self.mime_type).map_err(|_| {
            ExportError::Configuration(format!(
                "in pipeline '{}', invalid mime type '{}'",
                ctx.pipeline_id(),
                self.mime_type
            ))
        })?;
        headers.insert(CONTENT_TYPE, content_type);

        // Static headers go last and win over the secret header and content type.
        for (key, value) in self
            .request_headers
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .iter()
        {
            let name = HeaderName::from_bytes(key.as_bytes()).map_err(|e| {
                ExportError::Configuration(format!(
                    "in pipeline '{}', invalid request header name '{}': {}",
                    ctx.pipeline_id(),
                    key,
                    e
                ))
            })?;
            let value = HeaderValue::from_str(value).map_err(|e| {
                ExportError::Configuration(format!(
                    "in pipeline '{}', invalid value for request header '{}': {}",
                    ctx.pipeline_id(),
                    key,
                    e
                ))
            })?;
            headers.insert(name, value);
        }

        let mut request = export_client()?
            .request(method, prepared.destination.url.clone())
            .headers(headers)
            .body(prepared.payload.clone());

        if let Some(timeout) = remaining_until(ctx.deadline()) {
            request = request.timeout(timeout);
        }

        Ok(request)
    }

    fn export_failed(
        &self, ctx: &dyn PipelineContext, prepared: PreparedExport, err: ExportError,
    ) -> ExportOutcome {
        prepared.metrics.errors.inc(1);

        if self.config.continue_on_send_error {
            tracing::error!(
                pipeline_id = %ctx.pipeline_id(),
                url = %prepared.destination.redacted,
                error = %err,
                "Continuing pipeline on error"
            );
            return ExportOutcome::Continue(prepared.input);
        }

        tracing::warn!(
            url = %prepared.destination.redacted,
            error = %err,
            persist = self.config.persist_on_error,
            "HTTP export failed"
        );
        self.persist_if_enabled(ctx, prepared.payload, &err);
        ExportOutcome::Halt(err)
    }

    /// Hand the payload to store-and-forward, once, for failures of a sent request.
    fn persist_if_enabled(&self, ctx: &dyn PipelineContext, payload: Vec<u8>, err: &ExportError) {
        if self.config.persist_on_error && err.is_export_failure() {
            ctx.set_retry_data(payload);
        }
    }
}
