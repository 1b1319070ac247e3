use std::time::Instant;

use pipesend_api::{
    ExportError,
    ExportResult,
};
use reqwest::Client;

/// Build the client for a single export.
///
/// Each export gets its own client with idle pooling disabled, so nothing
/// outlives the invocation.
pub fn export_client() -> ExportResult<Client> {
    Client::builder()
        .pool_max_idle_per_host(0)
        .build()
        .map_err(|e| ExportError::Internal(format!("Failed to create HTTP client: {}", e)))
}

/// Time left before `deadline`, or `None` when no deadline is set.
///
/// An already expired deadline yields a zero duration so the request fails
/// immediately with a timeout instead of being sent.
pub fn remaining_until(deadline: Option<Instant>) -> Option<std::time::Duration> {
    deadline.map(|d| d.saturating_duration_since(Instant::now()))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_export_client_creation() {
        assert!(export_client().is_ok());
    }

    #[test]
    fn test_remaining_until() {
        assert!(remaining_until(None).is_none());

        let expired = Instant::now() - Duration::from_secs(1);
        assert_eq!(remaining_until(Some(expired)), Some(Duration::ZERO));

        let later = Instant::now() + Duration::from_secs(60);
        let left = remaining_until(Some(later)).unwrap();
        assert!(left > Duration::from_secs(50));
    }
}
