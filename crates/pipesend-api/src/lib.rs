pub mod capability;
pub mod context;
pub mod data;
pub mod error;
pub mod metrics;
pub mod outcome;

pub use capability::{
    DataCoercer,
    UrlFormatter,
};
pub use context::{
    PipelineContext,
    SecretProvider,
};
pub use data::PipelineData;
pub use error::{
    ExportError,
    ExportResult,
};
pub use metrics::{
    Counter,
    Histogram,
    HistogramSnapshot,
    Instrument,
    MetricsRegistry,
    RegisteredInstrument,
    DEFAULT_RESERVOIR_SIZE,
};
pub use outcome::ExportOutcome;
