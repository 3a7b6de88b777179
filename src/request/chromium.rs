//! Chromium routes: HTML, URL and Markdown rendering, to PDF or to an image.

use super::sealed::{Chromium, Sealed};
use super::{
    by_filename, BaseRequest, ChromiumDocuments, MultipartRequest, RequestOptions,
    ScreenshotRequest,
};
use crate::document::Document;
use crate::fields::*;
use std::collections::BTreeMap;

const ENDPOINT_HTML: &str = "/forms/chromium/convert/html";
const ENDPOINT_URL: &str = "/forms/chromium/convert/url";
const ENDPOINT_MARKDOWN: &str = "/forms/chromium/convert/markdown";
const ENDPOINT_SCREENSHOT_HTML: &str = "/forms/chromium/screenshot/html";
const ENDPOINT_SCREENSHOT_URL: &str = "/forms/chromium/screenshot/url";
const ENDPOINT_SCREENSHOT_MARKDOWN: &str = "/forms/chromium/screenshot/markdown";

/// Filenames Gotenberg expects for the special Chromium documents.
const INDEX_HTML: &str = "index.html";
const HEADER_HTML: &str = "header.html";
const FOOTER_HTML: &str = "footer.html";

/// Page-rendering options shared by every Chromium flavor.
pub trait ChromiumOptions: Chromium + RequestOptions {
    /// HTML rendered at the top of every page (sent as `header.html`).
    fn header(mut self, doc: Document) -> Self {
        self.chromium_mut().header = Some(doc.renamed(HEADER_HTML));
        self
    }

    /// HTML rendered at the bottom of every page (sent as `footer.html`).
    fn footer(mut self, doc: Document) -> Self {
        self.chromium_mut().footer = Some(doc.renamed(FOOTER_HTML));
        self
    }

    /// Images, fonts, stylesheets… referenced by the main document.
    ///
    /// Appends to any assets already attached.
    fn assets(mut self, docs: impl IntoIterator<Item = Document>) -> Self {
        self.chromium_mut().assets.extend(docs);
        self
    }

    fn paper_size(mut self, size: PaperSize) -> Self {
        for (name, value) in size.fields() {
            self.base_mut().set(name, &value);
        }
        self
    }

    fn margins(mut self, margins: Margins) -> Self {
        for (name, value) in margins.fields() {
            self.base_mut().set(name, &value);
        }
        self
    }

    /// Print the whole document on one single page.
    fn single_page(mut self) -> Self {
        self.base_mut().flag(FIELD_CHROMIUM_SINGLE_PAGE);
        self
    }

    /// Let the page's CSS `@page` size win over `paper_size`.
    fn prefer_css_page_size(mut self) -> Self {
        self.base_mut().flag(FIELD_CHROMIUM_PREFER_CSS_PAGE_SIZE);
        self
    }

    fn print_background(mut self) -> Self {
        self.base_mut().flag(FIELD_CHROMIUM_PRINT_BACKGROUND);
        self
    }

    /// Hide the default white background, allowing transparency.
    fn omit_background(mut self) -> Self {
        self.base_mut().flag(FIELD_CHROMIUM_OMIT_BACKGROUND);
        self
    }

    fn landscape(mut self) -> Self {
        self.base_mut().flag(FIELD_LANDSCAPE);
        self
    }

    /// Page rendering scale, e.g. `0.75`.
    fn scale(mut self, scale: f64) -> Self {
        self.base_mut().set(FIELD_CHROMIUM_SCALE, &scale);
        self
    }

    /// Page ranges to print, e.g. `"1-5, 8"`. Empty means all pages.
    fn native_page_ranges(mut self, ranges: impl Into<String>) -> Self {
        self.base_mut().set_text(FIELD_NATIVE_PAGE_RANGES, ranges);
        self
    }

    /// JavaScript expression that must evaluate to `true` before rendering.
    fn wait_for_expression(mut self, expression: impl Into<String>) -> Self {
        self.base_mut().set_text(FIELD_CHROMIUM_WAIT_FOR_EXPRESSION, expression);
        self
    }

    fn emulated_media_type(mut self, media: MediaType) -> Self {
        self.base_mut().set(FIELD_CHROMIUM_EMULATED_MEDIA_TYPE, &media);
        self
    }

    /// Fail the conversion when the page throws a console exception.
    fn fail_on_console_exceptions(mut self) -> Self {
        self.base_mut().flag(FIELD_CHROMIUM_FAIL_ON_CONSOLE_EXCEPTIONS);
        self
    }

    /// Render without waiting for the network to go idle.
    fn skip_network_idle_event(mut self) -> Self {
        self.base_mut().flag(FIELD_CHROMIUM_SKIP_NETWORK_IDLE_EVENT);
        self
    }

    /// Embed an outline (bookmarks) built from the document headings.
    fn generate_document_outline(mut self) -> Self {
        self.base_mut().flag(FIELD_CHROMIUM_GENERATE_DOCUMENT_OUTLINE);
        self
    }

    fn pdfa(mut self, pdfa: PdfA) -> Self {
        self.base_mut().set(FIELD_PDFA, &pdfa);
        self
    }

    /// Enable PDF for Universal Access.
    fn pdfua(mut self) -> Self {
        self.base_mut().flag(FIELD_PDFUA);
        self
    }

    /// Metadata to write, as a JSON object.
    fn metadata(mut self, metadata: impl AsRef<[u8]>) -> Self {
        self.base_mut().set_raw(FIELD_METADATA, metadata.as_ref());
        self
    }
}

impl<T: Chromium> ChromiumOptions for T {}

/// Image options for the screenshot variant of a Chromium flavor.
pub trait ScreenshotOptions: Chromium + RequestOptions {
    fn format(mut self, format: ScreenshotFormat) -> Self {
        self.base_mut().set(FIELD_SCREENSHOT_FORMAT, &format);
        self
    }

    /// JPEG compression quality, 1–100. Ignored for other formats.
    fn quality(mut self, quality: u8) -> Self {
        self.base_mut().set(FIELD_SCREENSHOT_QUALITY, &quality);
        self
    }

    /// Viewport width in pixels.
    fn width(mut self, width: u32) -> Self {
        self.base_mut().set(FIELD_SCREENSHOT_WIDTH, &width);
        self
    }

    /// Viewport height in pixels.
    fn height(mut self, height: u32) -> Self {
        self.base_mut().set(FIELD_SCREENSHOT_HEIGHT, &height);
        self
    }

    /// Clip the image to the viewport dimensions.
    fn clip(mut self) -> Self {
        self.base_mut().flag(FIELD_SCREENSHOT_CLIP);
        self
    }

    fn optimize_for_speed(mut self) -> Self {
        self.base_mut().flag(FIELD_SCREENSHOT_OPTIMIZE_FOR_SPEED);
        self
    }
}

impl<T: Chromium> ScreenshotOptions for T {}

// ── HTML ─────────────────────────────────────────────────────────────────

/// Render an HTML page (plus assets) with Chromium.
#[derive(Debug, Clone)]
pub struct HtmlRequest {
    index: Document,
    chromium: ChromiumDocuments,
    base: BaseRequest,
}

impl HtmlRequest {
    /// `index` is sent as `index.html` whatever its logical filename.
    pub fn new(index: Document) -> Self {
        Self {
            index: index.renamed(INDEX_HTML),
            chromium: ChromiumDocuments::default(),
            base: BaseRequest::default(),
        }
    }
}

impl Sealed for HtmlRequest {
    fn base(&self) -> &BaseRequest {
        &self.base
    }
    fn base_mut(&mut self) -> &mut BaseRequest {
        &mut self.base
    }
}

impl Chromium for HtmlRequest {
    fn chromium(&self) -> &ChromiumDocuments {
        &self.chromium
    }
    fn chromium_mut(&mut self) -> &mut ChromiumDocuments {
        &mut self.chromium
    }
}

impl MultipartRequest for HtmlRequest {
    fn endpoint(&self) -> &'static str {
        ENDPOINT_HTML
    }

    fn form_documents(&self) -> BTreeMap<String, Document> {
        let mut files = by_filename([&self.index]);
        self.chromium().extend_into(&mut files);
        files
    }
}

impl ScreenshotRequest for HtmlRequest {
    fn screenshot_endpoint(&self) -> &'static str {
        ENDPOINT_SCREENSHOT_HTML
    }
}

// ── URL ──────────────────────────────────────────────────────────────────

/// Render a remote page with Chromium.
#[derive(Debug, Clone)]
pub struct UrlRequest {
    chromium: ChromiumDocuments,
    base: BaseRequest,
}

impl UrlRequest {
    pub fn new(url: impl Into<String>) -> Self {
        let mut base = BaseRequest::default();
        base.set_text(FIELD_CHROMIUM_URL, url);
        Self {
            chromium: ChromiumDocuments::default(),
            base,
        }
    }
}

impl Sealed for UrlRequest {
    fn base(&self) -> &BaseRequest {
        &self.base
    }
    fn base_mut(&mut self) -> &mut BaseRequest {
        &mut self.base
    }
}

impl Chromium for UrlRequest {
    fn chromium(&self) -> &ChromiumDocuments {
        &self.chromium
    }
    fn chromium_mut(&mut self) -> &mut ChromiumDocuments {
        &mut self.chromium
    }
}

impl MultipartRequest for UrlRequest {
    fn endpoint(&self) -> &'static str {
        ENDPOINT_URL
    }

    fn form_documents(&self) -> BTreeMap<String, Document> {
        let mut files = BTreeMap::new();
        self.chromium().extend_into(&mut files);
        files
    }
}

impl ScreenshotRequest for UrlRequest {
    fn screenshot_endpoint(&self) -> &'static str {
        ENDPOINT_SCREENSHOT_URL
    }
}

// ── Markdown ─────────────────────────────────────────────────────────────

/// Render Markdown files through an HTML template with Chromium.
///
/// The template (`index.html`) pulls each file in with
/// `{{ toHTML "file.md" }}`, so markdown documents keep their logical names.
#[derive(Debug, Clone)]
pub struct MarkdownRequest {
    index: Document,
    markdowns: Vec<Document>,
    chromium: ChromiumDocuments,
    base: BaseRequest,
}

impl MarkdownRequest {
    pub fn new(index: Document, markdowns: impl IntoIterator<Item = Document>) -> Self {
        Self {
            index: index.renamed(INDEX_HTML),
            markdowns: markdowns.into_iter().collect(),
            chromium: ChromiumDocuments::default(),
            base: BaseRequest::default(),
        }
    }
}

impl Sealed for MarkdownRequest {
    fn base(&self) -> &BaseRequest {
        &self.base
    }
    fn base_mut(&mut self) -> &mut BaseRequest {
        &mut self.base
    }
}

impl Chromium for MarkdownRequest {
    fn chromium(&self) -> &ChromiumDocuments {
        &self.chromium
    }
    fn chromium_mut(&mut self) -> &mut ChromiumDocuments {
        &mut self.chromium
    }
}

impl MultipartRequest for MarkdownRequest {
    fn endpoint(&self) -> &'static str {
        ENDPOINT_MARKDOWN
    }

    fn form_documents(&self) -> BTreeMap<String, Document> {
        let mut files = by_filename(std::iter::once(&self.index).chain(&self.markdowns));
        self.chromium().extend_into(&mut files);
        files
    }
}

impl ScreenshotRequest for MarkdownRequest {
    fn screenshot_endpoint(&self) -> &'static str {
        ENDPOINT_SCREENSHOT_MARKDOWN
    }
}
