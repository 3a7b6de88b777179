//! Response artifacts.
//!
//! Gotenberg answers a conversion with either a single rendered file or a
//! zip archive holding one `<input filename>.pdf` per document. The shape is
//! decided from the declared `Content-Type` alone; the body is never sniffed.

use crate::context::Context;
use crate::error::GotenbergError;
use reqwest::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a response body holds, derived from its content type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputKind {
    /// `application/pdf`
    Pdf,
    /// `application/zip`: one rendered file per input document.
    Archive,
    /// `image/*` (screenshots)
    Image,
    /// `application/json` (metadata read)
    Json,
    /// Anything else, passed through untouched.
    Other,
}

impl OutputKind {
    /// Classify a `Content-Type` header value. Parameters and case are
    /// ignored.
    pub fn from_content_type(content_type: &str) -> Self {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "application/pdf" => Self::Pdf,
            "application/zip" | "application/x-zip-compressed" => Self::Archive,
            "application/json" => Self::Json,
            other if other.starts_with("image/") => Self::Image,
            _ => Self::Other,
        }
    }
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pdf => "pdf",
            Self::Archive => "archive",
            Self::Image => "image",
            Self::Json => "json",
            Self::Other => "other",
        };
        f.write_str(name)
    }
}

/// An open, successful response.
///
/// Dropping the handle closes the underlying connection, whether or not the
/// body was read.
pub struct Output {
    response: reqwest::Response,
    ctx: Context,
}

impl Output {
    pub(crate) fn new(response: reqwest::Response, ctx: Context) -> Self {
        Self { response, ctx }
    }

    pub fn status(&self) -> u16 {
        self.response.status().as_u16()
    }

    /// The raw `Content-Type` header, or `""` when absent or not ASCII.
    pub fn content_type(&self) -> &str {
        header_str(&self.response, CONTENT_TYPE)
    }

    pub fn kind(&self) -> OutputKind {
        OutputKind::from_content_type(self.content_type())
    }

    /// Filename announced in `Content-Disposition`, if any.
    pub fn filename(&self) -> Option<String> {
        disposition_filename(header_str(&self.response, CONTENT_DISPOSITION))
    }

    /// Read the whole body, still bounded by the dispatch context.
    pub async fn bytes(self) -> Result<Vec<u8>, GotenbergError> {
        let Self { response, ctx } = self;
        let body = ctx.run(response.bytes()).await??;
        Ok(body.to_vec())
    }

    /// Give up the wrapper and take the response, e.g. to stream it.
    pub fn into_inner(self) -> reqwest::Response {
        self.response
    }
}

impl fmt::Debug for Output {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Output")
            .field("status", &self.status())
            .field("content_type", &self.content_type())
            .field("kind", &self.kind())
            .finish()
    }
}

pub(crate) fn header_str(response: &reqwest::Response, name: reqwest::header::HeaderName) -> &str {
    response
        .headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
}

/// Extract `filename` from a `Content-Disposition` value.
fn disposition_filename(value: &str) -> Option<String> {
    value.split(';').map(str::trim).find_map(|param| {
        let (key, raw) = param.split_once('=')?;
        if !key.trim().eq_ignore_ascii_case("filename") {
            return None;
        }
        let name = raw.trim().trim_matches('"');
        (!name.is_empty()).then(|| name.to_string())
    })
}
