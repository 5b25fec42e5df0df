//! Metalens analysis client
//!
//! This crate is the service layer between an application and the metadata
//! analysis backend. Hand it an image, a video or an office document and it
//! uploads the file as multipart `file`, waits for the verdict, and gives you the
//! backend's JSON back untouched.
//!
//! What it does on top of a bare HTTP call:
//!
//! - **Base address resolution** - `METALENS_API_URL` if set and non-blank,
//!   `http://127.0.0.1:8000` otherwise.
//! - **One shared client** - built once, 5 minute timeout, default
//!   `Content-Type: multipart/form-data`.
//! - **404 diagnostics** - a "not found" logs the full address that was tried,
//!   the error still reaches you as-is.
//! - **Trailing-slash fallback** - document uploads that hit a 404 are retried
//!   exactly once against `/api/analyze/document/`. Other kinds can opt in.
//! - **Report links** - turn the backend's relative `report_url` into an
//!   absolute address.
//!
//! No retries, no backoff, no caching beyond that.
//!
//! ## Quick example
//!
//! ```no_run
//! use analysis::{AnalysisClient, ClientConfig, UploadPayload};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), analysis::ClientError> {
//!     let client = AnalysisClient::new(ClientConfig::from_env())?;
//!
//!     let payload = UploadPayload::from_path("./contract.docx").await?;
//!     let result = client.analyze_document(&payload).await?;
//!
//!     if let Some(reference) = result.report_reference() {
//!         println!("report: {}", client.report_url(reference));
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod payload;
pub mod report;
pub mod types;

mod analysis;
mod http;

pub use crate::analysis::AnalysisClient;
pub use crate::config::{ClientConfig, API_URL_ENV, DEFAULT_BASE_ADDRESS, DEFAULT_TIMEOUT_MS};
pub use crate::error::{ClientError, RequestOutcome};
pub use crate::http::ApiClient;
pub use crate::payload::{MediaKind, UploadPayload, FILE_FIELD};
pub use crate::report::report_url;
pub use crate::types::AnalysisResult;

pub use reqwest::header::HeaderMap;
