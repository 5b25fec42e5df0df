//! Umbrella crate for the Metalens analysis client.
//!
//! Re-exports the [`analysis`] service layer so applications depend on a
//! single crate. With the `cli` feature (on by default) it also carries the
//! settings loader and log setup used by the `metalens` binary.

pub use analysis::{
    AnalysisClient, AnalysisResult, ApiClient, ClientConfig, ClientError, HeaderMap, MediaKind,
    RequestOutcome, UploadPayload, API_URL_ENV, DEFAULT_BASE_ADDRESS, DEFAULT_TIMEOUT_MS,
    FILE_FIELD, diagnostics, report_url,
};

#[cfg(feature = "cli")]
pub mod settings;
#[cfg(feature = "cli")]
pub mod telemetry;

#[cfg(feature = "cli")]
pub use settings::{LogFormat, Settings};
