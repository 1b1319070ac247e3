mod interpolation;
mod loader;

pub use interpolation::{
    expand_env,
    has_env_refs,
    InterpolationError,
    InterpolationResult,
};
pub use loader::{
    ConfigLoadError,
    ConfigLoadResult,
    ConfigLoader,
};
