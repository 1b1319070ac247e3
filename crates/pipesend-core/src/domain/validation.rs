use pipesend_api::{
    ExportError,
    ExportResult,
};

use super::ExportConfig;

/// Names the secret backing an authentication header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SecretHeaderRef {
    pub header_name: String,
    pub secret_name: String,
    pub secret_value_key: String,
}

/// Reject contradictory delivery flags.
pub fn validate_flags(config: &ExportConfig, pipeline_id: &str) -> ExportResult<()> {
    if config.persist_on_error && config.continue_on_send_error {
        return Err(ExportError::Configuration(format!(
            "in pipeline '{}' persistOnError & continueOnSendError can not both be set to true for HTTP Export",
            pipeline_id
        )));
    }

    if config.continue_on_send_error && !config.return_input_data {
        return Err(ExportError::Configuration(format!(
            "in pipeline '{}' continueOnSendError can only be used in conjunction returnInputData for multiple HTTP Export",
            pipeline_id
        )));
    }

    Ok(())
}

/// Work out whether a secret header is configured.
///
/// Returns `None` when all three secret fields are empty and fails when only
/// some of them are set.
pub fn secret_header_plan(
    config: &ExportConfig, pipeline_id: &str,
) -> ExportResult<Option<SecretHeaderRef>> {
    let has_header = !config.http_header_name.is_empty();
    let has_name = !config.secret_name.is_empty();
    let has_key = !config.secret_value_key.is_empty();

    match (has_header, has_name, has_key) {
        (false, false, false) => Ok(None),
        (true, false, false) => Err(ExportError::Configuration(format!(
            "in pipeline '{}', secretName & secretValueKey must be specified when HTTP Header Name is specified",
            pipeline_id
        ))),
        (_, true, false) => Err(ExportError::Configuration(format!(
            "in pipeline '{}', secretName was specified but no secretValueKey was provided",
            pipeline_id
        ))),
        (_, false, true) => Err(ExportError::Configuration(format!(
            "in pipeline '{}', secretValueKey was specified but no secretName was provided",
            pipeline_id
        ))),
        (false, true, true) => Err(ExportError::Configuration(format!(
            "in pipeline '{}', HTTP Header Name required when using secrets",
            pipeline_id
        ))),
        (true, true, true) => Ok(Some(SecretHeaderRef {
            header_name: config.http_header_name.clone(),
            secret_name: config.secret_name.clone(),
            secret_value_key: config.secret_value_key.clone(),
        })),
    }
}
