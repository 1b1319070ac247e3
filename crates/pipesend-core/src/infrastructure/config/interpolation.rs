use std::sync::LazyLock;

use regex::{
    Captures,
    Regex,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InterpolationError {
    #[error("Required environment variable not found: {0}")]
    RequiredVarNotFound(String),
}

pub type InterpolationResult<T> = Result<T, InterpolationError>;

static ENV_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(?::-([^}]*))?\}").expect("Invalid regex pattern")
});

/// Expand `${VAR}` and `${VAR:-default}` references from the environment.
///
/// Defaults are taken literally; a missing variable without a default is an
/// error.
pub fn expand_env(input: &str) -> InterpolationResult<String> {
    expand_with(input, |name| std::env::var(name).ok())
}

pub(crate) fn expand_with<F>(input: &str, lookup: F) -> InterpolationResult<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut missing = None;

    let expanded = ENV_REF.replace_all(input, |cap: &Captures| {
        let name = &cap[1];
        match (lookup(name), cap.get(2)) {
            (Some(value), _) => value,
            (None, Some(default)) => default.as_str().to_string(),
            (None, None) => {
                missing.get_or_insert_with(|| name.to_string());
                String::new()
            }
        }
    });

    match missing {
        Some(name) => Err(InterpolationError::RequiredVarNotFound(name)),
        None => Ok(expanded.into_owned()),
    }
}

pub fn has_env_refs(input: &str) -> bool {
    ENV_REF.is_match(input)
}
