//! Conversion requests: one type per Gotenberg route.
//!
//! Every flavor owns its documents plus a [`BaseRequest`]: the encoded
//! option set and the per-request HTTP metadata. What a flavor *can do* is
//! expressed by the traits it implements:
//!
//! | Trait | Meaning |
//! |-------|---------|
//! | [`MultipartRequest`] | has an endpoint and a filename → document map; every flavor |
//! | [`MainRequest`] | a standalone PDF-engine operation on existing PDFs |
//! | [`ScreenshotRequest`] | Chromium flavor that can also render to an image |
//! | [`RequestOptions`] | trace id, basic auth, output filename, headers, wait delay |
//! | [`ChromiumOptions`] | paper, margins, header/footer, assets, … |
//! | [`ScreenshotOptions`] | image format, size, quality |
//!
//! The traits are sealed: the set of flavors is closed and mirrors the
//! service's routes, so [`crate::Client`] can dispatch on capabilities
//! instead of inspecting types at runtime.
//!
//! Setters consume and return the request so configuration chains:
//!
//! ```rust
//! use gotenberg_client::{Document, OfficeRequest, PdfA, RequestOptions};
//!
//! let req = OfficeRequest::new([Document::from_path("report.docx", "report.docx")])
//!     .trace("nightly-report")
//!     .landscape()
//!     .pdfa(PdfA::A3b);
//! # let _ = req;
//! ```

mod chromium;
mod office;
mod pdfengines;

pub use chromium::{
    ChromiumOptions, HtmlRequest, MarkdownRequest, ScreenshotOptions, UrlRequest,
};
pub use office::OfficeRequest;
pub use pdfengines::{ConvertRequest, MergeRequest, ReadMetadataRequest, WriteMetadataRequest};

use crate::document::Document;
use crate::error::GotenbergError;
use crate::fields::{FieldValue, FIELD_EXTRA_HTTP_HEADERS, FIELD_WAIT_DELAY};
use crate::headers::{validate_extra_header, validate_outbound_header};
use std::collections::BTreeMap;
use std::time::Duration;

/// Request header carrying the caller's trace id; echoed in Gotenberg's logs.
pub const HEADER_TRACE: &str = "Gotenberg-Trace";

/// Request header naming the file Gotenberg returns (without extension).
pub const HEADER_OUTPUT_FILENAME: &str = "Gotenberg-Output-Filename";

/// State shared by every flavor: encoded form fields and HTTP metadata.
#[derive(Debug, Clone, Default)]
pub struct BaseRequest {
    fields: BTreeMap<String, String>,
    raw_fields: BTreeMap<String, Vec<u8>>,
    headers: BTreeMap<String, String>,
    basic_auth: Option<(String, String)>,
}

impl BaseRequest {
    /// Encode `value` into `name`, replacing any previous value.
    pub(crate) fn set<V: FieldValue + ?Sized>(&mut self, name: &str, value: &V) {
        self.set_text(name, value.to_field());
    }

    /// Store text as-is.
    pub(crate) fn set_text(&mut self, name: &str, value: impl Into<String>) {
        self.raw_fields.remove(name);
        self.fields.insert(name.to_string(), value.into());
    }

    /// Store an opaque blob without re-encoding it.
    ///
    /// UTF-8 blobs join the text fields; anything else is kept as bytes and
    /// sent as a raw part under the same name.
    pub(crate) fn set_raw(&mut self, name: &str, value: &[u8]) {
        match std::str::from_utf8(value) {
            Ok(text) => self.set_text(name, text),
            Err(_) => {
                self.fields.remove(name);
                self.raw_fields.insert(name.to_string(), value.to_vec());
            }
        }
    }

    /// Flag-only option: always written as `"true"`.
    pub(crate) fn flag(&mut self, name: &str) {
        self.set(name, &true);
    }

    /// The encoded option set.
    pub fn fields(&self) -> &BTreeMap<String, String> {
        &self.fields
    }

    /// Options holding bytes that are not valid UTF-8.
    pub fn raw_fields(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.raw_fields
    }

    /// Outbound HTTP headers, including trace and output filename.
    pub fn headers(&self) -> &BTreeMap<String, String> {
        &self.headers
    }

    pub fn basic_auth(&self) -> Option<(&str, &str)> {
        self.basic_auth
            .as_ref()
            .map(|(user, pass)| (user.as_str(), pass.as_str()))
    }

    pub fn trace_id(&self) -> Option<&str> {
        self.headers.get(HEADER_TRACE).map(String::as_str)
    }
}

pub(crate) mod sealed {
    use super::{BaseRequest, ChromiumDocuments};

    pub trait Sealed {
        fn base(&self) -> &BaseRequest;
        fn base_mut(&mut self) -> &mut BaseRequest;
    }

    pub trait Chromium: Sealed {
        fn chromium(&self) -> &ChromiumDocuments;
        fn chromium_mut(&mut self) -> &mut ChromiumDocuments;
    }
}

/// A request that can be encoded as a multipart form and posted.
pub trait MultipartRequest: sealed::Sealed + Send + Sync {
    /// Route path, e.g. `/forms/libreoffice/convert`.
    fn endpoint(&self) -> &'static str;

    /// Documents keyed by logical filename.
    ///
    /// Two documents with the same filename collapse into one entry; the
    /// later one wins.
    fn form_documents(&self) -> BTreeMap<String, Document>;

    /// The encoded option set.
    fn form_fields(&self) -> &BTreeMap<String, String> {
        self.base().fields()
    }

    /// Per-request HTTP metadata.
    fn request_base(&self) -> &BaseRequest {
        self.base()
    }
}

/// A standalone PDF-engine operation (merge, convert, metadata).
///
/// [`crate::Client`] dispatches on [`MultipartRequest`]; this marker is for
/// caller code that should only accept operations on existing PDFs:
///
/// ```rust
/// use gotenberg_client::{Client, Context, GotenbergError, MainRequest, OutputKind};
///
/// async fn postprocess<R: MainRequest>(
///     client: &Client,
///     req: &R,
/// ) -> Result<OutputKind, GotenbergError> {
///     client.store(&Context::background(), req, "out/processed.pdf").await
/// }
/// ```
pub trait MainRequest: MultipartRequest {}

/// A Chromium flavor that can render to an image instead of a PDF.
pub trait ScreenshotRequest: MultipartRequest {
    /// Route path of the screenshot variant.
    fn screenshot_endpoint(&self) -> &'static str;
}

/// Options available on every flavor.
pub trait RequestOptions: sealed::Sealed + Sized {
    /// Tag the request with a trace id (sent as `Gotenberg-Trace`).
    fn trace(mut self, id: impl Into<String>) -> Self {
        self.base_mut()
            .headers
            .insert(HEADER_TRACE.to_string(), id.into());
        self
    }

    /// Authenticate with HTTP basic auth.
    fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.base_mut().basic_auth = Some((username.into(), password.into()));
        self
    }

    /// Ask Gotenberg to name the resulting file `filename`.
    fn output_filename(mut self, filename: impl Into<String>) -> Self {
        self.base_mut()
            .headers
            .insert(HEADER_OUTPUT_FILENAME.to_string(), filename.into());
        self
    }

    /// Headers Chromium adds when loading the page and its resources.
    ///
    /// A value may be scoped to matching URLs: `value;scope=<regex>`. The
    /// whole map is validated before anything is stored; calling again
    /// replaces the previous map.
    fn extra_http_headers<I, K, V>(mut self, headers: I) -> Result<Self, GotenbergError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut map: BTreeMap<String, String> = BTreeMap::new();
        for (name, value) in headers {
            let (name, value): (String, String) = (name.into(), value.into());
            validate_extra_header(&name, &value)?;
            map.insert(name, value);
        }
        self.base_mut().set(FIELD_EXTRA_HTTP_HEADERS, &map);
        Ok(self)
    }

    /// Attach a header to the POST sent to Gotenberg itself.
    ///
    /// `Content-Type`, `Content-Length`, `Transfer-Encoding`, `Host` and
    /// `Authorization` are refused with [`GotenbergError::InvalidHeader`];
    /// use [`RequestOptions::basic_auth`] for credentials.
    fn http_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Self, GotenbergError> {
        let (name, value): (String, String) = (name.into(), value.into());
        validate_outbound_header(&name, &value)?;
        self.base_mut().headers.insert(name, value);
        Ok(self)
    }

    /// Time to wait after the page loads before rendering.
    fn wait_delay(mut self, delay: Duration) -> Self {
        self.base_mut().set(FIELD_WAIT_DELAY, &delay);
        self
    }
}

impl<T: sealed::Sealed> RequestOptions for T {}

/// Header, footer and assets shared by the Chromium flavors.
#[derive(Debug, Clone, Default)]
pub struct ChromiumDocuments {
    header: Option<Document>,
    footer: Option<Document>,
    assets: Vec<Document>,
}

impl ChromiumDocuments {
    /// Add header, footer and assets to `files`, in that order.
    pub(crate) fn extend_into(&self, files: &mut BTreeMap<String, Document>) {
        if let Some(header) = &self.header {
            files.insert(header.filename().to_string(), header.clone());
        }
        if let Some(footer) = &self.footer {
            files.insert(footer.filename().to_string(), footer.clone());
        }
        for asset in &self.assets {
            files.insert(asset.filename().to_string(), asset.clone());
        }
    }
}

/// Key documents by filename, last write wins.
pub(crate) fn by_filename<'a>(
    docs: impl IntoIterator<Item = &'a Document>,
) -> BTreeMap<String, Document> {
    docs.into_iter()
        .map(|doc| (doc.filename().to_string(), doc.clone()))
        .collect()
}
