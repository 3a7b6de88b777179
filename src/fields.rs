//! Form-field vocabulary and typed → textual field encoding.
//!
//! Gotenberg reads every option as a plain multipart text field, so the wire
//! stays stringly typed. Setters on the request types accept real Rust types
//! and run them through [`FieldValue`] exactly once; the option set only ever
//! holds finished strings.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

// ── Shared fields ────────────────────────────────────────────────────────

pub(crate) const FIELD_WAIT_DELAY: &str = "waitDelay";
pub(crate) const FIELD_EXTRA_HTTP_HEADERS: &str = "extraHttpHeaders";
pub(crate) const FIELD_METADATA: &str = "metadata";
pub(crate) const FIELD_PDFA: &str = "pdfa";
pub(crate) const FIELD_PDFUA: &str = "pdfua";
pub(crate) const FIELD_LANDSCAPE: &str = "landscape";
pub(crate) const FIELD_NATIVE_PAGE_RANGES: &str = "nativePageRanges";
pub(crate) const FIELD_MERGE: &str = "merge";

// ── LibreOffice ──────────────────────────────────────────────────────────

pub(crate) const FIELD_OFFICE_PASSWORD: &str = "password";
pub(crate) const FIELD_OFFICE_EXPORT_FORM_FIELDS: &str = "exportFormFields";
pub(crate) const FIELD_OFFICE_ALLOW_DUPLICATE_FIELD_NAMES: &str = "allowDuplicateFieldNames";
pub(crate) const FIELD_OFFICE_EXPORT_BOOKMARKS: &str = "exportBookmarks";
pub(crate) const FIELD_OFFICE_EXPORT_BOOKMARKS_TO_PDF_DESTINATION: &str =
    "exportBookmarksToPdfDestination";
pub(crate) const FIELD_OFFICE_EXPORT_PLACEHOLDERS: &str = "exportPlaceholders";
pub(crate) const FIELD_OFFICE_EXPORT_NOTES: &str = "exportNotes";
pub(crate) const FIELD_OFFICE_EXPORT_NOTES_PAGES: &str = "exportNotesPages";
pub(crate) const FIELD_OFFICE_EXPORT_ONLY_NOTES_PAGES: &str = "exportOnlyNotesPages";
pub(crate) const FIELD_OFFICE_EXPORT_NOTES_IN_MARGIN: &str = "exportNotesInMargin";
pub(crate) const FIELD_OFFICE_CONVERT_OOO_TARGET_TO_PDF_TARGET: &str =
    "convertOooTargetToPdfTarget";
pub(crate) const FIELD_OFFICE_EXPORT_LINKS_RELATIVE_FSYS: &str = "exportLinksRelativeFsys";
pub(crate) const FIELD_OFFICE_EXPORT_HIDDEN_SLIDES: &str = "exportHiddenSlides";
pub(crate) const FIELD_OFFICE_SKIP_EMPTY_PAGES: &str = "skipEmptyPages";
pub(crate) const FIELD_OFFICE_ADD_ORIGINAL_DOCUMENT_AS_STREAM: &str =
    "addOriginalDocumentAsStream";
pub(crate) const FIELD_OFFICE_SINGLE_PAGE_SHEETS: &str = "singlePageSheets";
pub(crate) const FIELD_OFFICE_LOSSLESS_IMAGE_COMPRESSION: &str = "losslessImageCompression";
pub(crate) const FIELD_OFFICE_QUALITY: &str = "quality";
pub(crate) const FIELD_OFFICE_REDUCE_IMAGE_RESOLUTION: &str = "reduceImageResolution";
pub(crate) const FIELD_OFFICE_MAX_IMAGE_RESOLUTION: &str = "maxImageResolution";

// ── Chromium ─────────────────────────────────────────────────────────────

pub(crate) const FIELD_CHROMIUM_URL: &str = "url";
pub(crate) const FIELD_CHROMIUM_SINGLE_PAGE: &str = "singlePage";
pub(crate) const FIELD_CHROMIUM_PAPER_WIDTH: &str = "paperWidth";
pub(crate) const FIELD_CHROMIUM_PAPER_HEIGHT: &str = "paperHeight";
pub(crate) const FIELD_CHROMIUM_MARGIN_TOP: &str = "marginTop";
pub(crate) const FIELD_CHROMIUM_MARGIN_RIGHT: &str = "marginRight";
pub(crate) const FIELD_CHROMIUM_MARGIN_BOTTOM: &str = "marginBottom";
pub(crate) const FIELD_CHROMIUM_MARGIN_LEFT: &str = "marginLeft";
pub(crate) const FIELD_CHROMIUM_PREFER_CSS_PAGE_SIZE: &str = "preferCssPageSize";
pub(crate) const FIELD_CHROMIUM_PRINT_BACKGROUND: &str = "printBackground";
pub(crate) const FIELD_CHROMIUM_OMIT_BACKGROUND: &str = "omitBackground";
pub(crate) const FIELD_CHROMIUM_SCALE: &str = "scale";
pub(crate) const FIELD_CHROMIUM_WAIT_FOR_EXPRESSION: &str = "waitForExpression";
pub(crate) const FIELD_CHROMIUM_EMULATED_MEDIA_TYPE: &str = "emulatedMediaType";
pub(crate) const FIELD_CHROMIUM_FAIL_ON_CONSOLE_EXCEPTIONS: &str = "failOnConsoleExceptions";
pub(crate) const FIELD_CHROMIUM_SKIP_NETWORK_IDLE_EVENT: &str = "skipNetworkIdleEvent";
pub(crate) const FIELD_CHROMIUM_GENERATE_DOCUMENT_OUTLINE: &str = "generateDocumentOutline";

// ── Screenshots ──────────────────────────────────────────────────────────

pub(crate) const FIELD_SCREENSHOT_FORMAT: &str = "format";
pub(crate) const FIELD_SCREENSHOT_QUALITY: &str = "quality";
pub(crate) const FIELD_SCREENSHOT_WIDTH: &str = "width";
pub(crate) const FIELD_SCREENSHOT_HEIGHT: &str = "height";
pub(crate) const FIELD_SCREENSHOT_CLIP: &str = "clip";
pub(crate) const FIELD_SCREENSHOT_OPTIMIZE_FOR_SPEED: &str = "optimizeForSpeed";

// ── Encoding ─────────────────────────────────────────────────────────────

/// A value that can be written into a form field.
///
/// Implementations are total: every well-typed value has exactly one
/// textual form. Range checks (quality 1–100, DPI from a fixed set) are the
/// caller's contract and are left to the service.
pub trait FieldValue {
    /// The canonical text sent on the wire.
    fn to_field(&self) -> String;
}

impl FieldValue for bool {
    fn to_field(&self) -> String {
        let text = if *self { "true" } else { "false" };
        text.to_string()
    }
}

macro_rules! integer_field {
    ($($t:ty),*) => {
        $(impl FieldValue for $t {
            fn to_field(&self) -> String {
                self.to_string()
            }
        })*
    };
}

integer_field!(u8, u16, u32, u64, usize, i32, i64);

impl FieldValue for f64 {
    fn to_field(&self) -> String {
        // Display gives the shortest round-trip form: 8.27, 1, 0.5
        format!("{}", self)
    }
}

impl FieldValue for str {
    fn to_field(&self) -> String {
        self.to_string()
    }
}

impl FieldValue for String {
    fn to_field(&self) -> String {
        self.clone()
    }
}

impl FieldValue for Duration {
    /// Go-style duration string, as parsed by Gotenberg: `2s`, `500ms`.
    ///
    /// Rounded up to whole milliseconds, so a non-zero delay never encodes
    /// as `0s`.
    fn to_field(&self) -> String {
        let ms = self.as_nanos().div_ceil(1_000_000);
        if ms % 1000 == 0 {
            format!("{}s", ms / 1000)
        } else {
            format!("{}ms", ms)
        }
    }
}

impl FieldValue for BTreeMap<String, String> {
    /// Compact JSON object with keys in sorted order.
    fn to_field(&self) -> String {
        // Serialising a map of strings cannot fail.
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

// ── Enumerations ─────────────────────────────────────────────────────────

/// PDF/A conformance level of the produced file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PdfA {
    #[serde(rename = "PDF/A-1b")]
    A1b,
    #[serde(rename = "PDF/A-2b")]
    A2b,
    #[serde(rename = "PDF/A-3b")]
    A3b,
}

impl PdfA {
    pub fn as_str(&self) -> &'static str {
        match self {
            PdfA::A1b => "PDF/A-1b",
            PdfA::A2b => "PDF/A-2b",
            PdfA::A3b => "PDF/A-3b",
        }
    }
}

impl FieldValue for PdfA {
    fn to_field(&self) -> String {
        self.as_str().to_string()
    }
}

/// Image format of a Chromium screenshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenshotFormat {
    #[default]
    Png,
    Jpeg,
    Webp,
}

impl ScreenshotFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenshotFormat::Png => "png",
            ScreenshotFormat::Jpeg => "jpeg",
            ScreenshotFormat::Webp => "webp",
        }
    }
}

impl FieldValue for ScreenshotFormat {
    fn to_field(&self) -> String {
        self.as_str().to_string()
    }
}

/// CSS media type Chromium emulates while rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Print,
    Screen,
}

impl MediaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Print => "print",
            MediaType::Screen => "screen",
        }
    }
}

impl FieldValue for MediaType {
    fn to_field(&self) -> String {
        self.as_str().to_string()
    }
}

/// Unit suffix for paper and margin dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Pt,
    Px,
    In,
    Mm,
    Cm,
    Pc,
}

impl Unit {
    fn suffix(self) -> &'static str {
        match self {
            Unit::Pt => "pt",
            Unit::Px => "px",
            Unit::In => "in",
            Unit::Mm => "mm",
            Unit::Cm => "cm",
            Unit::Pc => "pc",
        }
    }
}

fn dimension(value: f64, unit: Unit) -> String {
    format!("{}{}", value.to_field(), unit.suffix())
}

/// Paper dimensions for Chromium PDF output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperSize {
    pub width: f64,
    pub height: f64,
    pub unit: Unit,
}

impl PaperSize {
    pub const LETTER: PaperSize = PaperSize::inches(8.5, 11.0);
    pub const LEGAL: PaperSize = PaperSize::inches(8.5, 14.0);
    pub const TABLOID: PaperSize = PaperSize::inches(11.0, 17.0);
    pub const LEDGER: PaperSize = PaperSize::inches(17.0, 11.0);
    pub const A0: PaperSize = PaperSize::inches(33.1, 46.8);
    pub const A1: PaperSize = PaperSize::inches(23.4, 33.1);
    pub const A2: PaperSize = PaperSize::inches(16.54, 23.4);
    pub const A3: PaperSize = PaperSize::inches(11.7, 16.54);
    pub const A4: PaperSize = PaperSize::inches(8.27, 11.7);
    pub const A5: PaperSize = PaperSize::inches(5.83, 8.27);
    pub const A6: PaperSize = PaperSize::inches(4.13, 5.83);

    pub const fn inches(width: f64, height: f64) -> Self {
        Self {
            width,
            height,
            unit: Unit::In,
        }
    }

    /// `(field, value)` pairs written by [`crate::ChromiumOptions::paper_size`].
    pub(crate) fn fields(&self) -> [(&'static str, String); 2] {
        [
            (FIELD_CHROMIUM_PAPER_WIDTH, dimension(self.width, self.unit)),
            (FIELD_CHROMIUM_PAPER_HEIGHT, dimension(self.height, self.unit)),
        ]
    }
}

/// Page margins for Chromium PDF output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
    pub unit: Unit,
}

impl Margins {
    pub const NONE: Margins = Margins::uniform(0.0, Unit::In);
    pub const NORMAL: Margins = Margins::uniform(1.0, Unit::In);
    pub const LARGE: Margins = Margins::uniform(2.0, Unit::In);

    pub const fn uniform(value: f64, unit: Unit) -> Self {
        Self {
            top: value,
            right: value,
            bottom: value,
            left: value,
            unit,
        }
    }

    pub(crate) fn fields(&self) -> [(&'static str, String); 4] {
        [
            (FIELD_CHROMIUM_MARGIN_TOP, dimension(self.top, self.unit)),
            (FIELD_CHROMIUM_MARGIN_RIGHT, dimension(self.right, self.unit)),
            (FIELD_CHROMIUM_MARGIN_BOTTOM, dimension(self.bottom, self.unit)),
            (FIELD_CHROMIUM_MARGIN_LEFT, dimension(self.left, self.unit)),
        ]
    }
}
