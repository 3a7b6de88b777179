//! Named binary inputs attached to a conversion request.
//!
//! A [`Document`] pairs a *logical* filename with a byte source. The logical
//! filename is what Gotenberg sees: it becomes the multipart part name and,
//! when several documents are converted without merging, the stem of each
//! entry in the returned archive (`report.docx` → `report.docx.pdf`). It does
//! not have to match the file name on disk.
//!
//! Documents are cheap to clone and never mutated, so the same value can be
//! attached to any number of requests.

use crate::error::GotenbergError;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Where a document's bytes come from.
#[derive(Clone)]
enum Source {
    /// Read lazily, when the request is encoded.
    Path(PathBuf),
    /// Already in memory.
    Bytes(Arc<[u8]>),
}

/// A caller-supplied input file.
#[derive(Clone)]
pub struct Document {
    filename: String,
    source: Source,
}

impl Document {
    /// A document backed by a file on disk, read when the request is sent.
    ///
    /// The file is not touched here, so a missing file surfaces as
    /// [`GotenbergError::DocumentRead`] at dispatch time.
    pub fn from_path(filename: impl Into<String>, path: impl AsRef<Path>) -> Self {
        Self {
            filename: filename.into(),
            source: Source::Path(path.as_ref().to_path_buf()),
        }
    }

    /// A document backed by an in-memory buffer.
    pub fn from_bytes(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            source: Source::Bytes(Arc::from(bytes.into())),
        }
    }

    /// A document whose content is the UTF-8 bytes of `content`.
    pub fn from_string(filename: impl Into<String>, content: impl Into<String>) -> Self {
        Self::from_bytes(filename, content.into().into_bytes())
    }

    /// Drain `reader` into memory and wrap the result.
    pub fn from_reader<R: Read>(
        filename: impl Into<String>,
        mut reader: R,
    ) -> Result<Self, GotenbergError> {
        let filename = filename.into();
        let mut buf = Vec::new();
        reader
            .read_to_end(&mut buf)
            .map_err(|source| GotenbergError::DocumentRead {
                filename: filename.clone(),
                source,
            })?;
        Ok(Self::from_bytes(filename, buf))
    }

    /// The logical filename sent to Gotenberg.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// A copy of this document under a different logical filename.
    ///
    /// Used for slots whose name Gotenberg fixes (`header.html`, `index.html`).
    pub fn renamed(&self, filename: impl Into<String>) -> Self {
        Self {
            filename: filename.into(),
            source: self.source.clone(),
        }
    }

    /// Load the full content.
    pub async fn read(&self) -> Result<Vec<u8>, GotenbergError> {
        match &self.source {
            Source::Bytes(bytes) => Ok(bytes.to_vec()),
            Source::Path(path) => {
                tokio::fs::read(path)
                    .await
                    .map_err(|source| GotenbergError::DocumentRead {
                        filename: self.filename.clone(),
                        source,
                    })
            }
        }
    }

    /// MIME type guessed from the logical filename's extension.
    pub fn mime_type(&self) -> &'static str {
        let ext = Path::new(&self.filename)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());

        match ext.as_deref() {
            Some("pdf") => "application/pdf",
            Some("html") | Some("htm") => "text/html",
            Some("md") | Some("markdown") => "text/markdown",
            Some("css") => "text/css",
            Some("js") => "text/javascript",
            Some("txt") => "text/plain",
            Some("json") => "application/json",
            Some("png") => "image/png",
            Some("jpg") | Some("jpeg") => "image/jpeg",
            Some("gif") => "image/gif",
            Some("svg") => "image/svg+xml",
            Some("webp") => "image/webp",
            Some("woff") => "font/woff",
            Some("woff2") => "font/woff2",
            Some("ttf") => "font/ttf",
            Some("doc") => "application/msword",
            Some("docx") => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            Some("xlsx") => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
            Some("pptx") => {
                "application/vnd.openxmlformats-officedocument.presentationml.presentation"
            }
            Some("odt") => "application/vnd.oasis.opendocument.text",
            Some("ods") => "application/vnd.oasis.opendocument.spreadsheet",
            Some("odp") => "application/vnd.oasis.opendocument.presentation",
            _ => "application/octet-stream",
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let source = match &self.source {
            Source::Path(p) => format!("path({})", p.display()),
            Source::Bytes(b) => format!("bytes({})", b.len()),
        };
        f.debug_struct("Document")
            .field("filename", &self.filename)
            .field("source", &source)
            .finish()
    }
}
