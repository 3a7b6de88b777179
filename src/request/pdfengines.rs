//! PDF-engine routes: operations on PDFs the caller already has.

use super::sealed::Sealed;
use super::{by_filename, BaseRequest, MainRequest, MultipartRequest};
use crate::document::Document;
use crate::fields::{PdfA, FIELD_METADATA, FIELD_PDFA, FIELD_PDFUA};
use std::collections::BTreeMap;

const ENDPOINT_MERGE: &str = "/forms/pdfengines/merge";
const ENDPOINT_CONVERT: &str = "/forms/pdfengines/convert";
const ENDPOINT_METADATA_WRITE: &str = "/forms/pdfengines/metadata/write";
const ENDPOINT_METADATA_READ: &str = "/forms/pdfengines/metadata/read";

/// Merge PDFs into one, in alphanumeric order of their filenames.
#[derive(Debug, Clone)]
pub struct MergeRequest {
    pdfs: Vec<Document>,
    base: BaseRequest,
}

impl MergeRequest {
    pub fn new(pdfs: impl IntoIterator<Item = Document>) -> Self {
        Self {
            pdfs: pdfs.into_iter().collect(),
            base: BaseRequest::default(),
        }
    }

    pub fn pdfa(mut self, pdfa: PdfA) -> Self {
        self.base.set(FIELD_PDFA, &pdfa);
        self
    }

    pub fn pdfua(mut self) -> Self {
        self.base.flag(FIELD_PDFUA);
        self
    }

    /// Metadata to write on the merged file, as a JSON object.
    pub fn metadata(mut self, metadata: impl AsRef<[u8]>) -> Self {
        self.base.set_raw(FIELD_METADATA, metadata.as_ref());
        self
    }
}

/// Convert PDFs to PDF/A and/or PDF/UA.
#[derive(Debug, Clone)]
pub struct ConvertRequest {
    pdfs: Vec<Document>,
    base: BaseRequest,
}

impl ConvertRequest {
    pub fn new(pdfs: impl IntoIterator<Item = Document>) -> Self {
        Self {
            pdfs: pdfs.into_iter().collect(),
            base: BaseRequest::default(),
        }
    }

    pub fn pdfa(mut self, pdfa: PdfA) -> Self {
        self.base.set(FIELD_PDFA, &pdfa);
        self
    }

    pub fn pdfua(mut self) -> Self {
        self.base.flag(FIELD_PDFUA);
        self
    }
}

/// Write metadata into existing PDFs.
#[derive(Debug, Clone)]
pub struct WriteMetadataRequest {
    pdfs: Vec<Document>,
    base: BaseRequest,
}

impl WriteMetadataRequest {
    pub fn new(pdfs: impl IntoIterator<Item = Document>) -> Self {
        Self {
            pdfs: pdfs.into_iter().collect(),
            base: BaseRequest::default(),
        }
    }

    /// Metadata as a JSON object, sent verbatim.
    pub fn metadata(mut self, metadata: impl AsRef<[u8]>) -> Self {
        self.base.set_raw(FIELD_METADATA, metadata.as_ref());
        self
    }

    /// Serialise `metadata` and send it as the metadata field.
    pub fn metadata_json(mut self, metadata: &serde_json::Value) -> Self {
        self.base.set(FIELD_METADATA, &metadata.to_string());
        self
    }
}

/// Read the metadata of existing PDFs; answered with JSON keyed by filename.
#[derive(Debug, Clone)]
pub struct ReadMetadataRequest {
    pdfs: Vec<Document>,
    base: BaseRequest,
}

impl ReadMetadataRequest {
    pub fn new(pdfs: impl IntoIterator<Item = Document>) -> Self {
        Self {
            pdfs: pdfs.into_iter().collect(),
            base: BaseRequest::default(),
        }
    }
}

macro_rules! pdf_engine_request {
    ($ty:ty, $endpoint:expr) => {
        impl Sealed for $ty {
            fn base(&self) -> &BaseRequest {
                &self.base
            }
            fn base_mut(&mut self) -> &mut BaseRequest {
                &mut self.base
            }
        }

        impl MultipartRequest for $ty {
            fn endpoint(&self) -> &'static str {
                $endpoint
            }

            fn form_documents(&self) -> BTreeMap<String, Document> {
                by_filename(&self.pdfs)
            }
        }

        impl MainRequest for $ty {}
    };
}

pdf_engine_request!(MergeRequest, ENDPOINT_MERGE);
pdf_engine_request!(ConvertRequest, ENDPOINT_CONVERT);
pdf_engine_request!(WriteMetadataRequest, ENDPOINT_METADATA_WRITE);
pdf_engine_request!(ReadMetadataRequest, ENDPOINT_METADATA_READ);
