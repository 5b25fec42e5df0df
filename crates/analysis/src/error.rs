use std::io;
use std::time::Duration;
use thiserror::Error;

/// Result of a single request through the shared client.
pub type RequestOutcome<T> = Result<T, ClientError>;

/// Errors surfaced by the analysis client.
///
/// Every variant is scoped to the request that produced it; none of them is
/// fatal to the process.
#[derive(Debug, Error)]
pub enum ClientError {
    /// No response arrived within the configured request timeout.
    #[error("request to {url} timed out after {timeout_ms}ms")]
    Timeout { url: String, timeout_ms: u64 },
    /// The connection could not be established or broke mid-flight (DNS, refused, reset).
    #[error("transport failure for {url}: {message}")]
    Transport { url: String, message: String },
    /// The backend answered with a non-2xx status.
    #[error("backend returned HTTP {status} for {url}: {body}")]
    Status {
        url: String,
        status: u16,
        body: String,
    },
    /// A 2xx response whose body was not valid JSON.
    #[error("invalid response body from {url}: {message}")]
    Decode { url: String, message: String },
    /// The shared client could not be constructed (TLS backend, invalid default header).
    #[error("failed to build HTTP client: {0}")]
    Init(String),
    /// Reading a local file into an upload payload failed.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

impl ClientError {
    /// Classifies a `reqwest` failure for `url` into the client taxonomy.
    pub(crate) fn from_reqwest(url: &str, timeout: Duration, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout {
                url: url.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            }
        } else if err.is_decode() {
            ClientError::Decode {
                url: url.to_string(),
                message: err.to_string(),
            }
        } else {
            ClientError::Transport {
                url: url.to_string(),
                message: err.to_string(),
            }
        }
    }

    /// HTTP status carried by the failure, when the backend responded at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout { .. })
    }

    pub fn is_transport(&self) -> bool {
        matches!(self, ClientError::Transport { .. })
    }

    /// Address of the request that failed, if the failure came from the network.
    pub fn url(&self) -> Option<&str> {
        match self {
            ClientError::Timeout { url, .. }
            | ClientError::Transport { url, .. }
            | ClientError::Status { url, .. }
            | ClientError::Decode { url, .. } => Some(url),
            ClientError::Init(_) | ClientError::Io(_) => None,
        }
    }
}
