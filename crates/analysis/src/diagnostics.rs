//! Observation hook for failed requests.
//!
//! Only "not found" failures are reported: they are the signature of a route
//! mismatch between this client and the backend, and the full attempted address
//! is what you need to spot it. The hook never touches the error itself.

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Full address of the attempted request when `err` is a 404, `None` otherwise.
pub fn not_found_address(config: &ClientConfig, path: &str, err: &ClientError) -> Option<String> {
    err.is_not_found().then(|| config.url_for(path))
}

/// Emits a `warn` trace for 404 failures.
pub(crate) fn observe_failure(config: &ClientConfig, method: &str, path: &str, err: &ClientError) {
    if let Some(url) = not_found_address(config, path, err) {
        tracing::warn!(%method, %url, status = 404, "backend route not found");
    }
}
