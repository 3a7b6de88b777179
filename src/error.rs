//! Error types for the gotenberg-client library.
//!
//! A single error type, [`GotenbergError`], covers every way a conversion can
//! fail. Variants are grouped by *when* they occur so callers can react
//! without string matching:
//!
//! * **Construction**: a request or client was configured with something
//!   the wire can never carry (bad header, bad scope regex, bad base URL).
//!   Raised by the setter itself, before any network activity.
//! * **I/O**: a document could not be read or the destination could not be
//!   written. No partial file is ever left at the destination.
//! * **Transport**: DNS, connect, TLS or mid-stream failures from reqwest.
//! * **Protocol**: the service answered with a non-2xx status.
//! * **Content mismatch**: the response type is not what the call expects
//!   (e.g. a screenshot call receiving a PDF).
//! * **Cancellation**: the [`crate::Context`] was cancelled or its deadline
//!   passed before the operation completed.
//!
//! [`GotenbergError::kind`] collapses the variants into an [`ErrorKind`] for
//! callers that only care about the category.

use std::path::PathBuf;
use thiserror::Error;

/// Maximum number of response-body bytes kept in [`GotenbergError::Status`].
pub(crate) const MAX_ERROR_BODY: usize = 4096;

/// All errors returned by the gotenberg-client library.
#[derive(Debug, Error)]
pub enum GotenbergError {
    // ── Construction errors ──────────────────────────────────────────────
    /// An extra or outbound header has an empty name or contains control
    /// characters.
    #[error("Invalid header '{name}': {reason}")]
    InvalidHeader { name: String, reason: String },

    /// A scoped header (`value;scope=<regex>`) carries a scope that is not a
    /// valid regular expression.
    #[error("Invalid scope for header '{name}': {source}")]
    InvalidHeaderScope {
        name: String,
        #[source]
        source: regex::Error,
    },

    /// The configured base URL cannot be parsed or is not HTTP(S).
    #[error("Invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── I/O errors ────────────────────────────────────────────────────────
    /// A document's content could not be read while building the form.
    #[error("Failed to read document '{filename}': {source}")]
    DocumentRead {
        filename: String,
        #[source]
        source: std::io::Error,
    },

    /// The output file could not be created, written or moved into place.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Transport errors ──────────────────────────────────────────────────
    /// Connection, TLS, DNS or body-stream failure.
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    // ── Protocol errors ───────────────────────────────────────────────────
    /// The service answered with a non-2xx status.
    ///
    /// `body` holds (at most the first 4 KiB of) the response body, which is
    /// where Gotenberg explains what went wrong.
    #[error("Gotenberg returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// A 2xx response whose body could not be decoded (metadata read only).
    #[error("Invalid response from Gotenberg: {0}")]
    InvalidResponse(String),

    // ── Content-mismatch errors ───────────────────────────────────────────
    /// The response's content type does not match what the call expects.
    #[error("Unexpected content type: expected {expected}, got '{actual}'")]
    UnexpectedContentType {
        expected: &'static str,
        actual: String,
    },

    // ── Cancellation ──────────────────────────────────────────────────────
    /// The request context was cancelled through its [`crate::CancelHandle`].
    #[error("Request cancelled")]
    Cancelled,

    /// The request context's deadline passed before completion.
    #[error("Request deadline exceeded")]
    DeadlineExceeded,
}

/// Coarse classification of a [`GotenbergError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Detected while configuring, before any network call.
    Construction,
    /// Reading a document or writing the output failed.
    Io,
    /// Connection-level failure.
    Transport,
    /// Non-2xx status or undecodable response.
    Protocol,
    /// Response type did not match the call.
    ContentMismatch,
    /// Cancelled or deadline exceeded.
    Cancelled,
}

impl GotenbergError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidHeader { .. }
            | Self::InvalidHeaderScope { .. }
            | Self::InvalidBaseUrl { .. }
            | Self::InvalidConfig(_) => ErrorKind::Construction,
            Self::DocumentRead { .. } | Self::OutputWrite { .. } => ErrorKind::Io,
            Self::Transport(_) => ErrorKind::Transport,
            Self::Status { .. } | Self::InvalidResponse(_) => ErrorKind::Protocol,
            Self::UnexpectedContentType { .. } => ErrorKind::ContentMismatch,
            Self::Cancelled | Self::DeadlineExceeded => ErrorKind::Cancelled,
        }
    }

    /// HTTP status code, when the service answered with an error status.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Build a [`GotenbergError::Status`], truncating the body on a char
    /// boundary.
    pub(crate) fn status_with_body(status: u16, body: &str) -> Self {
        let mut end = body.len().min(MAX_ERROR_BODY);
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        Self::Status {
            status,
            body: body[..end].to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_display() {
        let e = GotenbergError::Status {
            status: 400,
            body: "Invalid form data".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("400"), "got: {msg}");
        assert!(msg.contains("Invalid form data"), "got: {msg}");
        assert_eq!(e.status(), Some(400));
        assert_eq!(e.kind(), ErrorKind::Protocol);
    }

    #[test]
    fn status_body_is_truncated() {
        let body = "é".repeat(MAX_ERROR_BODY);
        match GotenbergError::status_with_body(500, &body) {
            GotenbergError::Status { body, .. } => {
                assert!(body.len() <= MAX_ERROR_BODY);
                assert!(body.chars().all(|c| c == 'é'));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn scope_error_is_construction() {
        let source = regex::Regex::new("(").unwrap_err();
        let e = GotenbergError::InvalidHeaderScope {
            name: "X-Scoped".into(),
            source,
        };
        assert_eq!(e.kind(), ErrorKind::Construction);
        assert!(e.to_string().contains("X-Scoped"));
    }

    #[test]
    fn cancellation_kinds() {
        assert_eq!(GotenbergError::Cancelled.kind(), ErrorKind::Cancelled);
        assert_eq!(GotenbergError::DeadlineExceeded.kind(), ErrorKind::Cancelled);
    }

    #[test]
    fn content_mismatch_display() {
        let e = GotenbergError::UnexpectedContentType {
            expected: "image/*",
            actual: "application/pdf".into(),
        };
        assert_eq!(e.kind(), ErrorKind::ContentMismatch);
        assert!(e.to_string().contains("application/pdf"));
    }

    #[test]
    fn io_kinds() {
        let e = GotenbergError::OutputWrite {
            path: PathBuf::from("/nope/foo.pdf"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert_eq!(e.kind(), ErrorKind::Io);
        assert!(e.to_string().contains("/nope/foo.pdf"));
    }
}
