use std::collections::HashMap;
use std::sync::Arc;

use pipesend_api::{
    Counter,
    ExportResult,
    Histogram,
    MetricsRegistry,
};

pub const HTTP_EXPORT_ERRORS_NAME: &str = "HttpExportErrors";

pub const HTTP_EXPORT_SIZE_NAME: &str = "HttpExportSize";

pub fn errors_metric_name(redacted_url: &str) -> String {
    format!("{}-{}", HTTP_EXPORT_ERRORS_NAME, redacted_url)
}

pub fn size_metric_name(redacted_url: &str) -> String {
    format!("{}-{}", HTTP_EXPORT_SIZE_NAME, redacted_url)
}

/// Instruments for one destination
#[derive(Debug, Clone)]
pub struct DestinationMetrics {
    pub errors: Arc<Counter>,
    pub size: Arc<Histogram>,
}

/// Get-or-create the instruments for `redacted_url` in `registry`.
///
/// Always goes through the registry handed in by the caller, so a sender
/// reused across contexts reports into each context's own registry.
pub fn register_destination(
    registry: &MetricsRegistry, redacted_url: &str,
) -> ExportResult<DestinationMetrics> {
    let tags = HashMap::from([("url".to_string(), redacted_url.to_string())]);
    let metrics = DestinationMetrics {
        errors: registry.counter(&errors_metric_name(redacted_url), tags.clone())?,
        size: registry.histogram(&size_metric_name(redacted_url), tags)?,
    };

    tracing::trace!(url = %redacted_url, "Export metrics resolved");
    Ok(metrics)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_names() {
        assert_eq!(
            errors_metric_name("http://host/in"),
            "HttpExportErrors-http://host/in"
        );
        assert_eq!(size_metric_name("http://host/in"), "HttpExportSize-http://host/in");
    }

    #[test]
    fn test_registers_both_instruments_with_url_tag() {
        let registry = MetricsRegistry::new();

        register_destination(&registry, "http://host/in").unwrap();

        assert_eq!(registry.len(), 2);
        let errors = registry.get("HttpExportErrors-http://host/in").unwrap();
        assert_eq!(errors.tags.get("url").unwrap(), "http://host/in");
        assert!(registry.contains("HttpExportSize-http://host/in"));
    }

    #[test]
    fn test_repeat_registration_shares_instruments() {
        let registry = MetricsRegistry::new();

        let a = register_destination(&registry, "http://host/in").unwrap();
        let b = register_destination(&registry, "http://host/in").unwrap();

        assert!(Arc::ptr_eq(&a.errors, &b.errors));
        assert!(Arc::ptr_eq(&a.size, &b.size));
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_each_registry_gets_its_own_instruments() {
        let first = MetricsRegistry::new();
        let second = MetricsRegistry::new();

        let a = register_destination(&first, "http://host/in").unwrap();
        let b = register_destination(&second, "http://host/in").unwrap();
        a.errors.inc(1);

        assert_eq!(first.len(), 2);
        assert_eq!(second.len(), 2);
        assert!(!Arc::ptr_eq(&a.errors, &b.errors));
        assert_eq!(b.errors.count(), 0);
    }

    #[test]
    fn test_destinations_are_separate() {
        let registry = MetricsRegistry::new();

        let a = register_destination(&registry, "http://a/in").unwrap();
        let b = register_destination(&registry, "http://b/in").unwrap();

        a.errors.inc(1);
        assert_eq!(b.errors.count(), 0);
        assert_eq!(registry.len(), 4);
    }
}
