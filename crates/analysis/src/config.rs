use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::time::Duration;

use crate::payload::MediaKind;

/// Backend address used when no override is supplied.
pub const DEFAULT_BASE_ADDRESS: &str = "http://127.0.0.1:8000";

/// Environment variable holding the base address override.
pub const API_URL_ENV: &str = "METALENS_API_URL";

/// Per-request upper bound: five minutes, large videos take a while.
pub const DEFAULT_TIMEOUT_MS: u64 = 300_000;

/// `Content-Type` installed as a client-wide default header. Multipart uploads
/// replace it with their own `boundary=` variant.
pub const DEFAULT_CONTENT_TYPE: &str = "multipart/form-data";

/// Shortest accepted timeout. Zero would time out every request immediately.
const MIN_TIMEOUT_MS: u64 = 1;

/// Process-wide client configuration. Built once at startup and read-only afterwards.
///
/// # Example
/// ```
/// use analysis::{ClientConfig, MediaKind};
///
/// let cfg = ClientConfig::resolve(Some("  https://analyzer.internal:9000 "))
///     .with_fallback(MediaKind::Image, true);
///
/// assert_eq!(cfg.base_address, "https://analyzer.internal:9000");
/// assert!(cfg.has_fallback(MediaKind::Image));
/// assert!(cfg.has_fallback(MediaKind::Document));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Scheme + host + optional port, prepended verbatim to every request path.
    pub base_address: String,
    /// Request timeout in milliseconds, never below 1.
    #[serde(deserialize_with = "positive_millis")]
    pub timeout_ms: u64,
    /// `Content-Type` sent by default on every request.
    pub default_content_type: String,
    /// Media kinds whose analysis route is retried once with a trailing slash after a 404.
    pub fallback_routes: BTreeSet<MediaKind>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_address: DEFAULT_BASE_ADDRESS.to_string(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            default_content_type: DEFAULT_CONTENT_TYPE.to_string(),
            fallback_routes: BTreeSet::from([MediaKind::Document]),
        }
    }
}

impl ClientConfig {
    /// Resolves the configuration from an optional base address override.
    ///
    /// An override that is empty after trimming counts as absent. Never fails:
    /// an address that does not parse is kept as given and only logged.
    pub fn resolve(override_address: Option<&str>) -> Self {
        let base_address = resolve_base_address(override_address);
        if reqwest::Url::parse(&base_address).is_err() {
            tracing::warn!(base_address = %base_address, "base address is not a well-formed URL");
        }
        Self {
            base_address,
            ..Self::default()
        }
    }

    /// Resolves the configuration from [`API_URL_ENV`].
    pub fn from_env() -> Self {
        let value = std::env::var(API_URL_ENV).ok();
        Self::resolve(value.as_deref())
    }

    /// Overrides the request timeout. Sub-millisecond values are raised to 1 ms.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        let millis = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self.timeout_ms = millis.max(MIN_TIMEOUT_MS);
        self
    }

    /// Enables or disables the trailing-slash fallback for `kind`.
    pub fn with_fallback(mut self, kind: MediaKind, enabled: bool) -> Self {
        if enabled {
            self.fallback_routes.insert(kind);
        } else {
            self.fallback_routes.remove(&kind);
        }
        self
    }

    /// Replaces the whole fallback set.
    pub fn with_fallback_routes(mut self, kinds: impl IntoIterator<Item = MediaKind>) -> Self {
        self.fallback_routes = kinds.into_iter().collect();
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn has_fallback(&self, kind: MediaKind) -> bool {
        self.fallback_routes.contains(&kind)
    }

    /// Absolute address for a request path: plain concatenation, no normalization.
    pub fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_address, path)
    }
}

fn positive_millis<'de, D>(deserializer: D) -> Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(u64::deserialize(deserializer)?.max(MIN_TIMEOUT_MS))
}

/// Picks the trimmed override when it is non-empty, the default otherwise.
fn resolve_base_address(override_address: Option<&str>) -> String {
    match override_address.map(str::trim) {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => DEFAULT_BASE_ADDRESS.to_string(),
    }
}
