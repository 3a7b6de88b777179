//! # gotenberg-client
//!
//! Typed, async client for the [Gotenberg](https://gotenberg.dev) 8
//! document-conversion API.
//!
//! ## Why this crate?
//!
//! Gotenberg speaks multipart forms: every option is a text field with its
//! own spelling (`"true"`, `"8.27in"`, `"PDF/A-3b"`, `"1500ms"`, a JSON map),
//! and every document is a file part whose name ends up naming the files in
//! a zip response. Getting one of those strings wrong produces a 400 at run
//! time. This crate keeps the wire textual but makes the setters strongly
//! typed, and shares one encode → dispatch → resolve pipeline across every
//! route.
//!
//! ## Pipeline Overview
//!
//! ```text
//! Request (fields + documents)
//!  │
//!  ├─ 1. Encode    read documents, build the multipart form
//!  ├─ 2. Dispatch  POST with auth/trace/output-filename headers
//!  └─ 3. Resolve   classify by content type, stream to disk atomically
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use gotenberg_client::{Client, Context, Document, OfficeRequest, PdfA, RequestOptions};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Client::new("http://localhost:3000")?;
//!     let req = OfficeRequest::new([
//!         Document::from_path("document1.docx", "in/document1.docx"),
//!         Document::from_path("document2.docx", "in/document2.docx"),
//!     ])
//!     .trace("nightly")
//!     .pdfa(PdfA::A3b);
//!
//!     // Two inputs without `merge()` come back as a zip archive.
//!     let ctx = Context::with_timeout(Duration::from_secs(60));
//!     let kind = client.store(&ctx, &req, "out/documents.zip").await?;
//!     eprintln!("stored {kind}");
//!     Ok(())
//! }
//! ```
//!
//! ## Routes
//!
//! | Request | Route |
//! |---------|-------|
//! | [`OfficeRequest`] | `/forms/libreoffice/convert` |
//! | [`HtmlRequest`] | `/forms/chromium/convert/html` (+ screenshot) |
//! | [`UrlRequest`] | `/forms/chromium/convert/url` (+ screenshot) |
//! | [`MarkdownRequest`] | `/forms/chromium/convert/markdown` (+ screenshot) |
//! | [`MergeRequest`] | `/forms/pdfengines/merge` |
//! | [`ConvertRequest`] | `/forms/pdfengines/convert` |
//! | [`WriteMetadataRequest`] | `/forms/pdfengines/metadata/write` |
//! | [`ReadMetadataRequest`] | `/forms/pdfengines/metadata/read` |
//!
//! The crate logs through `tracing` and never installs a subscriber.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod context;
pub mod document;
pub mod error;
pub mod fields;
mod headers;
pub mod output;
mod pipeline;
pub mod request;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use context::{CancelHandle, Context};
pub use document::Document;
pub use error::{ErrorKind, GotenbergError};
pub use fields::{FieldValue, Margins, MediaType, PaperSize, PdfA, ScreenshotFormat, Unit};
pub use output::{Output, OutputKind};
pub use request::{
    BaseRequest, ChromiumOptions, ConvertRequest, HtmlRequest, MainRequest, MarkdownRequest,
    MergeRequest, MultipartRequest, OfficeRequest, ReadMetadataRequest, RequestOptions,
    ScreenshotOptions, ScreenshotRequest, UrlRequest, WriteMetadataRequest,
};
