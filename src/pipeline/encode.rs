//! Multipart encoding: option set + documents → `reqwest::multipart::Form`.
//!
//! Text fields go first in key order, then raw (non-UTF-8) fields in key
//! order, then one file part per document in filename order. The part name and the part filename are both the document's logical
//! filename; Gotenberg uses it to name the files inside a zip response.
//!
//! Documents are read fully before the form is returned. A missing file
//! therefore fails here, naming the document, before any byte reaches the
//! network.

use crate::document::Document;
use crate::error::GotenbergError;
use crate::request::BaseRequest;
use reqwest::multipart::{Form, Part};
use std::collections::BTreeMap;
use tracing::debug;

/// Build the multipart form for one dispatch.
pub(crate) async fn encode_form(
    base: &BaseRequest,
    documents: &BTreeMap<String, Document>,
) -> Result<Form, GotenbergError> {
    let mut form = Form::new();
    for (name, value) in base.fields() {
        form = form.text(name.clone(), value.clone());
    }
    for (name, value) in base.raw_fields() {
        form = form.part(name.clone(), Part::bytes(value.clone()));
    }

    let mut total_bytes = 0usize;
    for (filename, doc) in documents {
        let content = doc.read().await?;
        total_bytes += content.len();
        let part = Part::bytes(content)
            .file_name(filename.clone())
            .mime_str(doc.mime_type())?;
        form = form.part(filename.clone(), part);
    }

    debug!(
        "Encoded form: {} fields, {} documents, {} bytes",
        base.fields().len() + base.raw_fields().len(),
        documents.len(),
        total_bytes
    );
    Ok(form)
}
