//! LibreOffice route: Word, Excel, PowerPoint, OpenDocument… to PDF.

use super::sealed::Sealed;
use super::{by_filename, BaseRequest, MultipartRequest};
use crate::document::Document;
use crate::fields::*;
use std::collections::BTreeMap;

const ENDPOINT_OFFICE_CONVERT: &str = "/forms/libreoffice/convert";

/// Convert office documents with LibreOffice.
///
/// Several documents without [`OfficeRequest::merge`] come back as a zip
/// archive holding one `<filename>.pdf` per input.
#[derive(Debug, Clone)]
pub struct OfficeRequest {
    docs: Vec<Document>,
    base: BaseRequest,
}

impl OfficeRequest {
    pub fn new(docs: impl IntoIterator<Item = Document>) -> Self {
        Self {
            docs: docs.into_iter().collect(),
            base: BaseRequest::default(),
        }
    }

    /// Password for opening the source file.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.base.set_text(FIELD_OFFICE_PASSWORD, password);
        self
    }

    pub fn landscape(mut self) -> Self {
        self.base.flag(FIELD_LANDSCAPE);
        self
    }

    /// Page ranges to print, e.g. `"1-4"`. Empty means all pages.
    pub fn native_page_ranges(mut self, ranges: impl Into<String>) -> Self {
        self.base.set_text(FIELD_NATIVE_PAGE_RANGES, ranges);
        self
    }

    /// Export form fields as widgets (`true`) or only their printed value.
    pub fn export_form_fields(mut self, export: bool) -> Self {
        self.base.set(FIELD_OFFICE_EXPORT_FORM_FIELDS, &export);
        self
    }

    pub fn allow_duplicate_field_names(mut self) -> Self {
        self.base.flag(FIELD_OFFICE_ALLOW_DUPLICATE_FIELD_NAMES);
        self
    }

    pub fn export_bookmarks(mut self, export: bool) -> Self {
        self.base.set(FIELD_OFFICE_EXPORT_BOOKMARKS, &export);
        self
    }

    /// Export bookmarks as named destinations.
    pub fn export_bookmarks_to_pdf_destination(mut self) -> Self {
        self.base.flag(FIELD_OFFICE_EXPORT_BOOKMARKS_TO_PDF_DESTINATION);
        self
    }

    /// Export only the visual markings of placeholder fields.
    pub fn export_placeholders(mut self) -> Self {
        self.base.flag(FIELD_OFFICE_EXPORT_PLACEHOLDERS);
        self
    }

    pub fn export_notes(mut self) -> Self {
        self.base.flag(FIELD_OFFICE_EXPORT_NOTES);
        self
    }

    /// Impress only.
    pub fn export_notes_pages(mut self) -> Self {
        self.base.flag(FIELD_OFFICE_EXPORT_NOTES_PAGES);
        self
    }

    /// Only meaningful together with [`Self::export_notes_pages`]; not
    /// enforced here.
    pub fn export_only_notes_pages(mut self) -> Self {
        self.base.flag(FIELD_OFFICE_EXPORT_ONLY_NOTES_PAGES);
        self
    }

    pub fn export_notes_in_margin(mut self) -> Self {
        self.base.flag(FIELD_OFFICE_EXPORT_NOTES_IN_MARGIN);
        self
    }

    /// Rewrite `.od[tpgs]` link targets to `.pdf`.
    pub fn convert_ooo_target_to_pdf_target(mut self) -> Self {
        self.base.flag(FIELD_OFFICE_CONVERT_OOO_TARGET_TO_PDF_TARGET);
        self
    }

    /// Export `file://` links relative to the source document.
    pub fn export_links_relative_fsys(mut self) -> Self {
        self.base.flag(FIELD_OFFICE_EXPORT_LINKS_RELATIVE_FSYS);
        self
    }

    pub fn export_hidden_slides(mut self) -> Self {
        self.base.flag(FIELD_OFFICE_EXPORT_HIDDEN_SLIDES);
        self
    }

    /// Suppress automatically inserted empty pages (Writer only).
    pub fn skip_empty_pages(mut self) -> Self {
        self.base.flag(FIELD_OFFICE_SKIP_EMPTY_PAGES);
        self
    }

    /// Embed the source document in the PDF for archiving.
    pub fn add_original_document_as_stream(mut self) -> Self {
        self.base.flag(FIELD_OFFICE_ADD_ORIGINAL_DOCUMENT_AS_STREAM);
        self
    }

    /// Put every sheet on exactly one page.
    pub fn single_page_sheets(mut self) -> Self {
        self.base.flag(FIELD_OFFICE_SINGLE_PAGE_SHEETS);
        self
    }

    /// PNG-style lossless image compression instead of JPEG.
    pub fn lossless_image_compression(mut self) -> Self {
        self.base.flag(FIELD_OFFICE_LOSSLESS_IMAGE_COMPRESSION);
        self
    }

    /// JPEG export quality, 1–100.
    pub fn quality(mut self, quality: u8) -> Self {
        self.base.set(FIELD_OFFICE_QUALITY, &quality);
        self
    }

    /// Downsample images to [`Self::max_image_resolution`].
    pub fn reduce_image_resolution(mut self) -> Self {
        self.base.flag(FIELD_OFFICE_REDUCE_IMAGE_RESOLUTION);
        self
    }

    /// Target DPI: one of 75, 150, 300, 600, 1200.
    pub fn max_image_resolution(mut self, dpi: u32) -> Self {
        self.base.set(FIELD_OFFICE_MAX_IMAGE_RESOLUTION, &dpi);
        self
    }

    pub fn pdfa(mut self, pdfa: PdfA) -> Self {
        self.base.set(FIELD_PDFA, &pdfa);
        self
    }

    /// Enable PDF for Universal Access.
    pub fn pdfua(mut self) -> Self {
        self.base.flag(FIELD_PDFUA);
        self
    }

    /// Metadata to write, as a JSON object.
    pub fn metadata(mut self, metadata: impl AsRef<[u8]>) -> Self {
        self.base.set_raw(FIELD_METADATA, metadata.as_ref());
        self
    }

    /// Merge every converted document into a single PDF.
    pub fn merge(mut self) -> Self {
        self.base.flag(FIELD_MERGE);
        self
    }
}

impl Sealed for OfficeRequest {
    fn base(&self) -> &BaseRequest {
        &self.base
    }
    fn base_mut(&mut self) -> &mut BaseRequest {
        &mut self.base
    }
}

impl MultipartRequest for OfficeRequest {
    fn endpoint(&self) -> &'static str {
        ENDPOINT_OFFICE_CONVERT
    }

    fn form_documents(&self) -> BTreeMap<String, Document> {
        by_filename(&self.docs)
    }
}
