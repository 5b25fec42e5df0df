//! The shared HTTP client.
//!
//! One [`ApiClient`] is built at startup and handed to every operation. It owns
//! the connection pool, applies the configured timeout and default
//! `Content-Type`, turns non-2xx responses into [`ClientError::Status`], and
//! passes every failure through the diagnostic hook before returning it.

use std::sync::Arc;
use std::time::Instant;

use bytes::Bytes;
use reqwest::header::{HeaderMap, HeaderValue, CONTENT_TYPE};
use reqwest::{RequestBuilder, Response};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::diagnostics::observe_failure;
use crate::error::{ClientError, RequestOutcome};
use crate::payload::UploadPayload;

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl ApiClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let content_type = HeaderValue::from_str(&config.default_content_type).map_err(|e| {
            ClientError::Init(format!(
                "invalid default content type '{}': {e}",
                config.default_content_type
            ))
        })?;
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, content_type);

        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Init(e.to_string()))?;

        tracing::debug!(
            base_address = %config.base_address,
            timeout_ms = config.timeout_ms,
            "analysis client ready"
        );

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Posts `payload` as a multipart body to `path`.
    ///
    /// `header_overrides` are added on top of the defaults. A `Content-Type`
    /// override is ignored: the multipart encoder sets it together with the
    /// boundary.
    pub async fn post(
        &self,
        path: &str,
        payload: &UploadPayload,
        header_overrides: Option<&HeaderMap>,
    ) -> RequestOutcome<Value> {
        let url = self.config.url_for(path);
        let mut request = self.http.post(&url);
        if let Some(overrides) = header_overrides {
            for (name, value) in overrides {
                if *name != CONTENT_TYPE {
                    request = request.header(name.clone(), value.clone());
                }
            }
        }
        let request = request.multipart(payload.to_form());

        tracing::debug!(%url, file_name = %payload.file_name, bytes = payload.len(), "uploading");
        let response = self.execute("POST", path, request).await?;
        self.read_json(&url, response).await
    }

    pub async fn get_json(&self, path: &str) -> RequestOutcome<Value> {
        let url = self.config.url_for(path);
        let response = self.execute("GET", path, self.http.get(&url)).await?;
        self.read_json(&url, response).await
    }

    pub async fn get_bytes(&self, path: &str) -> RequestOutcome<Bytes> {
        let url = self.config.url_for(path);
        let response = self.execute("GET", path, self.http.get(&url)).await?;
        response
            .bytes()
            .await
            .map_err(|e| ClientError::from_reqwest(&url, self.config.timeout(), e))
    }

    async fn execute(
        &self,
        method: &str,
        path: &str,
        request: RequestBuilder,
    ) -> RequestOutcome<Response> {
        let url = self.config.url_for(path);
        let start = Instant::now();

        let outcome = match request.send().await {
            Ok(response) if response.status().is_success() => Ok(response),
            Ok(response) => {
                let status = response.status().as_u16();
                let body = match response.text().await {
                    Ok(body) => body,
                    Err(err) => {
                        tracing::debug!(%url, status, error = %err, "could not read error body");
                        String::new()
                    }
                };
                Err(ClientError::Status {
                    url: url.clone(),
                    status,
                    body,
                })
            }
            Err(err) => Err(ClientError::from_reqwest(&url, self.config.timeout(), err)),
        };

        let elapsed_ms = start.elapsed().as_millis() as u64;
        match &outcome {
            Ok(response) => {
                tracing::debug!(%method, %url, status = response.status().as_u16(), elapsed_ms, "request finished");
            }
            Err(err) => {
                tracing::debug!(%method, %url, elapsed_ms, error = %err, "request failed");
                observe_failure(&self.config, method, path, err);
            }
        }
        outcome
    }

    async fn read_json(&self, url: &str, response: Response) -> RequestOutcome<Value> {
        response
            .json::<Value>()
            .await
            .map_err(|e| ClientError::from_reqwest(url, self.config.timeout(), e))
    }
}
