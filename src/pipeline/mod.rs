//! Pipeline stages shared by every conversion flavor.
//!
//! Each submodule implements exactly one step, so a flavor only decides
//! *what* is sent (endpoint, documents, fields) and never *how*.
//!
//! ## Data Flow
//!
//! ```text
//! request ──▶ encode ──▶ dispatch ──▶ resolve
//! (fields +    (multipart  (POST +      (classify, stream to
//!  documents)   form)       headers)     disk atomically)
//! ```
//!
//! 1. [`encode`]  : read documents and build the multipart form; the only
//!    stage touching the local filesystem for input
//! 2. [`dispatch`]: validate outbound headers, POST the form, map non-2xx
//!    statuses to [`crate::GotenbergError::Status`]
//! 3. [`resolve`] : classify the response by content type and stream it to
//!    a temporary file that is renamed into place only on success
//!
//! The [`crate::Context`] wraps all three from the outside (see
//! [`crate::Client`]), so dropping the pipeline future at any stage releases
//! the connection and the temporary file.

pub(crate) mod dispatch;
pub(crate) mod encode;
pub(crate) mod resolve;
