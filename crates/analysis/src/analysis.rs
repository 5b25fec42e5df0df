use std::path::Path;

use bytes::Bytes;
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::{ClientError, RequestOutcome};
use crate::http::ApiClient;
use crate::payload::{MediaKind, UploadPayload};
use crate::report::report_url;
use crate::types::AnalysisResult;

const HEALTH_ROUTE: &str = "/api/health";
const ROUTES_ROUTE: &str = "/api/routes";

/// Which route an analysis request is currently aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attempt {
    Primary,
    Retried,
}

/// Entry point for the analysis operations.
///
/// Construct one at startup and share it (it is cheap to clone). Concurrent
/// calls are independent: the only shared state is the immutable configuration
/// and the connection pool.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    api: ApiClient,
}

impl AnalysisClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        Ok(Self {
            api: ApiClient::new(config)?,
        })
    }

    pub fn from_api(api: ApiClient) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn config(&self) -> &ClientConfig {
        self.api.config()
    }

    pub async fn analyze_image(&self, payload: &UploadPayload) -> RequestOutcome<AnalysisResult> {
        self.analyze(MediaKind::Image, payload).await
    }

    pub async fn analyze_video(&self, payload: &UploadPayload) -> RequestOutcome<AnalysisResult> {
        self.analyze(MediaKind::Video, payload).await
    }

    pub async fn analyze_document(
        &self,
        payload: &UploadPayload,
    ) -> RequestOutcome<AnalysisResult> {
        self.analyze(MediaKind::Document, payload).await
    }

    /// Submits `payload` to the route for `kind`.
    ///
    /// If `kind` has the trailing-slash fallback enabled and the primary route
    /// answers 404, the same payload is posted once more to the fallback route
    /// and that outcome is final. Every other failure is returned untouched.
    pub async fn analyze(
        &self,
        kind: MediaKind,
        payload: &UploadPayload,
    ) -> RequestOutcome<AnalysisResult> {
        let mut attempt = Attempt::Primary;
        loop {
            let path = match attempt {
                Attempt::Primary => kind.route(),
                Attempt::Retried => kind.fallback_route(),
            };
            match self.api.post(path, payload, None).await {
                Ok(body) => return Ok(AnalysisResult::from(body)),
                Err(err)
                    if attempt == Attempt::Primary
                        && err.is_not_found()
                        && self.config().has_fallback(kind) =>
                {
                    tracing::info!(
                        %kind,
                        from = kind.route(),
                        to = kind.fallback_route(),
                        "primary route not found, retrying once"
                    );
                    attempt = Attempt::Retried;
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Reads the file at `path` and analyzes it as `kind`.
    pub async fn analyze_path(
        &self,
        kind: MediaKind,
        path: impl AsRef<Path>,
    ) -> RequestOutcome<AnalysisResult> {
        let payload = UploadPayload::from_path(path).await?;
        self.analyze(kind, &payload).await
    }

    /// Absolute address for a backend-issued report reference. No request is made.
    pub fn report_url(&self, reference: &str) -> String {
        report_url(&self.config().base_address, reference)
    }

    /// Fetches the report behind `reference` (a PDF on the reference backend).
    pub async fn download_report(&self, reference: &str) -> RequestOutcome<Bytes> {
        self.api.get_bytes(reference).await
    }

    /// Backend liveness probe.
    pub async fn health(&self) -> RequestOutcome<Value> {
        self.api.get_json(HEALTH_ROUTE).await
    }

    /// Endpoint listing advertised by the backend.
    pub async fn routes(&self) -> RequestOutcome<Value> {
        self.api.get_json(ROUTES_ROUTE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_url_uses_configured_base() {
        let client =
            AnalysisClient::new(ClientConfig::resolve(Some("http://127.0.0.1:8000"))).unwrap();
        assert_eq!(
            client.report_url("/reports/abc.pdf"),
            "http://127.0.0.1:8000/reports/abc.pdf"
        );
    }

    #[test]
    fn client_exposes_config() {
        let cfg = ClientConfig::resolve(Some("http://localhost:8000"))
            .with_fallback(MediaKind::Video, true);
        let client = AnalysisClient::new(cfg.clone()).unwrap();
        assert_eq!(client.config(), &cfg);
        assert_eq!(client.api().config(), &cfg);
    }

    #[tokio::test]
    async fn analyze_path_surfaces_io_errors() {
        let client = AnalysisClient::new(ClientConfig::default()).unwrap();
        let err = client
            .analyze_path(MediaKind::Image, "/no/such/file.jpg")
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Io(_)));
    }
}
