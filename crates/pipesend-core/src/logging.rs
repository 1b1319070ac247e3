use tracing_subscriber::{
    fmt,
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};

pub const DEFAULT_LOG_FILTER: &str = "pipesend_core=info,pipesend_api=info";

pub const DEV_LOG_FILTER: &str = "pipesend_core=debug,pipesend_api=debug,reqwest=debug";

/// Install the global subscriber. `RUST_LOG` overrides the default filter.
///
/// Panics if a global subscriber is already set.
pub fn init() {
    init_with_default(DEFAULT_LOG_FILTER);
}

pub fn init_with_default(default_filter: &str) {
    subscriber(default_filter).init();
}

pub fn init_dev() {
    init_with_default(DEV_LOG_FILTER);
}

/// Like [`init_with_default`], but returns `false` instead of panicking when
/// a subscriber is already installed. Hosts embedding the stage use this.
pub fn try_init_with_default(default_filter: &str) -> bool {
    subscriber(default_filter).try_init().is_ok()
}

fn subscriber(default_filter: &str) -> impl SubscriberInitExt {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true).with_thread_ids(false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        let _ = try_init_with_default(DEFAULT_LOG_FILTER);
        assert!(!try_init_with_default(DEV_LOG_FILTER));
    }
}
