use crate::data::PipelineData;
use crate::error::ExportError;

/// Result of one stage invocation
///
/// `Continue` passes its data to the next stage, `Halt` stops the pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportOutcome {
    Continue(PipelineData),
    Halt(ExportError),
}

impl ExportOutcome {
    pub fn should_continue(&self) -> bool {
        matches!(self, ExportOutcome::Continue(_))
    }

    pub fn data(&self) -> Option<&PipelineData> {
        match self {
            ExportOutcome::Continue(data) => Some(data),
            ExportOutcome::Halt(_) => None,
        }
    }

    pub fn error(&self) -> Option<&ExportError> {
        match self {
            ExportOutcome::Continue(_) => None,
            ExportOutcome::Halt(err) => Some(err),
        }
    }

    /// Split into the `(continue, output)` pair pipeline engines expect
    pub fn into_parts(self) -> (bool, Result<PipelineData, ExportError>) {
        match self {
            ExportOutcome::Continue(data) => (true, Ok(data)),
            ExportOutcome::Halt(err) => (false, Err(err)),
        }
    }
}

impl From<Result<PipelineData, ExportError>> for ExportOutcome {
    fn from(result: Result<PipelineData, ExportError>) -> Self {
        match result {
            Ok(data) => ExportOutcome::Continue(data),
            Err(err) => ExportOutcome::Halt(err),
        }
    }
}
