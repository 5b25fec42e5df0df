//! Media kinds, their backend routes, and the multipart upload payload.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use bytes::Bytes;
use reqwest::multipart::{Form, Part};
use serde::{Deserialize, Serialize};

use crate::error::ClientError;

/// Multipart field name the backend reads the upload from.
pub const FILE_FIELD: &str = "file";

const FALLBACK_CONTENT_TYPE: &str = "application/octet-stream";

/// The three media kinds the backend can analyze.
///
/// Each kind maps to one fixed route:
///
/// | Kind | Route |
/// |------|-------|
/// | `Image` | `/api/analyze/image` |
/// | `Video` | `/api/analyze/video` |
/// | `Document` | `/api/analyze/document` |
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Image,
    Video,
    Document,
}

impl MediaKind {
    pub const ALL: [MediaKind; 3] = [MediaKind::Image, MediaKind::Video, MediaKind::Document];

    /// Primary analysis route for this kind.
    pub fn route(self) -> &'static str {
        match self {
            MediaKind::Image => "/api/analyze/image",
            MediaKind::Video => "/api/analyze/video",
            MediaKind::Document => "/api/analyze/document",
        }
    }

    /// Trailing-slash variant of [`route`](Self::route), tried once after a 404
    /// when fallback is enabled for this kind.
    pub fn fallback_route(self) -> &'static str {
        match self {
            MediaKind::Image => "/api/analyze/image/",
            MediaKind::Video => "/api/analyze/video/",
            MediaKind::Document => "/api/analyze/document/",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MediaKind::Image => "image",
            MediaKind::Video => "video",
            MediaKind::Document => "document",
        }
    }
}

impl fmt::Display for MediaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "image" => Ok(MediaKind::Image),
            "video" => Ok(MediaKind::Video),
            "document" => Ok(MediaKind::Document),
            other => Err(format!(
                "unknown media kind '{other}' (expected image, video or document)"
            )),
        }
    }
}

/// A single file destined for the `file` field of a multipart request.
///
/// The bytes are forwarded as-is: no size or format checks happen here. The
/// content type is only a label guessed from the file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadPayload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl UploadPayload {
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let file_name = file_name.into();
        let content_type = mime_guess::from_path(&file_name)
            .first_raw()
            .unwrap_or(FALLBACK_CONTENT_TYPE)
            .to_string();
        Self {
            file_name,
            content_type,
            bytes: bytes.into(),
        }
    }

    /// Reads `path` into a payload named after the file's last path component.
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self, ClientError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| FILE_FIELD.to_string());
        Ok(Self::new(file_name, bytes))
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Builds the multipart form. `Bytes` clones are reference-counted, so a
    /// payload can be turned into a form more than once (primary + fallback).
    pub(crate) fn to_form(&self) -> Form {
        let part = || {
            Part::stream_with_length(
                reqwest::Body::from(self.bytes.clone()),
                self.bytes.len() as u64,
            )
            .file_name(self.file_name.clone())
        };
        // unparsable label: send the part unlabelled rather than fail the upload
        let part = part().mime_str(&self.content_type).unwrap_or_else(|_| part());
        Form::new().part(FILE_FIELD, part)
    }
}
