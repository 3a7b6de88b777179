//! Response resolution: classify, then stream to disk atomically.
//!
//! ## Why a temp file beside the destination?
//!
//! The body is streamed chunk by chunk into a [`tempfile::NamedTempFile`]
//! created in the destination's directory (on the blocking pool), then
//! renamed over the destination with `tokio::fs::rename` only once the stream
//! has finished. A rename within one directory is
//! atomic, so readers see either the old file or the complete new one. If the
//! stream fails, or the surrounding future is dropped because the
//! [`crate::Context`] ended, the temp path is deleted on drop and the
//! destination is never touched.

use crate::error::GotenbergError;
use crate::output::{header_str, OutputKind};
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// Classify a response by its declared content type.
pub(crate) fn classify(response: &reqwest::Response) -> OutputKind {
    let kind = OutputKind::from_content_type(header_str(response, CONTENT_TYPE));
    debug!("Response classified as {}", kind);
    kind
}

/// Fail unless the response's declared content type is of `kind`.
pub(crate) fn ensure_kind(
    response: &reqwest::Response,
    kind: OutputKind,
    expected: &'static str,
) -> Result<(), GotenbergError> {
    if classify(response) == kind {
        return Ok(());
    }
    Err(GotenbergError::UnexpectedContentType {
        expected,
        actual: header_str(response, CONTENT_TYPE).to_string(),
    })
}

/// Stream `response` into `dest`, replacing it atomically.
pub(crate) async fn store(
    response: reqwest::Response,
    dest: &Path,
) -> Result<OutputKind, GotenbergError> {
    let kind = classify(&response);
    let write_err = |source: std::io::Error| GotenbergError::OutputWrite {
        path: dest.to_path_buf(),
        source,
    };

    let dir = parent_dir(dest);
    tokio::fs::create_dir_all(&dir).await.map_err(write_err)?;

    let tmp = tokio::task::spawn_blocking(move || {
        tempfile::Builder::new()
            .prefix(".gotenberg-")
            .suffix(".part")
            .tempfile_in(&dir)
    })
    .await
    .map_err(|e| write_err(std::io::Error::other(e)))?
    .map_err(write_err)?;
    let (file, tmp_path) = tmp.into_parts();
    let mut file = tokio::fs::File::from_std(file);

    let mut written = 0u64;
    let mut body = response.bytes_stream();
    while let Some(chunk) = body.next().await {
        let chunk = chunk?;
        written += chunk.len() as u64;
        file.write_all(&chunk).await.map_err(write_err)?;
    }
    file.flush().await.map_err(write_err)?;
    file.sync_all().await.map_err(write_err)?;
    drop(file);

    debug!(
        "Persisting {} bytes from {} to {}",
        written,
        tmp_path.display(),
        dest.display()
    );
    tokio::fs::rename(&tmp_path, dest).await.map_err(write_err)?;
    // Renamed away: nothing left for the drop guard to delete.
    let _ = tmp_path.keep();
    Ok(kind)
}

/// Directory that will hold the temp file; `.` for bare filenames.
fn parent_dir(dest: &Path) -> PathBuf {
    match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
