//! Validation of caller-supplied HTTP headers.
//!
//! Two kinds of headers pass through here:
//!
//! * **Extra HTTP headers**: sent to Gotenberg inside the `extraHttpHeaders`
//!   form field; Chromium adds them when it loads the page and its resources.
//!   A value may carry a scope, `value;scope=<regex>`, restricting the header
//!   to URLs that match. Gotenberg enforces the scope; we only check that it
//!   compiles so a typo fails here instead of as an opaque 400.
//! * **Outbound headers**: attached verbatim to the POST itself. Names the
//!   client sets on its own are refused so the POST never carries two
//!   competing values.
//!
//! Both are checked the same way: the name must be a non-empty HTTP token and
//! neither name nor value may contain control characters.

use crate::error::GotenbergError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Separator between a header value and its URL scope.
const SCOPE_MARKER: &str = ";scope=";

/// RFC 9110 `token` characters.
static HEADER_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[!#$%&'*+\-.^_`|~0-9A-Za-z]+$").expect("valid header-name regex"));

/// Outbound names owned by the multipart encoder, the connection or
/// `basic_auth`.
const RESERVED_OUTBOUND: &[&str] = &[
    "authorization",
    "content-length",
    "content-type",
    "host",
    "transfer-encoding",
];

/// Check a header name and value.
pub(crate) fn validate_header(name: &str, value: &str) -> Result<(), GotenbergError> {
    if name.is_empty() {
        return Err(GotenbergError::InvalidHeader {
            name: name.to_string(),
            reason: "header name is empty".into(),
        });
    }
    if !HEADER_NAME.is_match(name) {
        return Err(GotenbergError::InvalidHeader {
            name: name.to_string(),
            reason: "header name contains characters outside the HTTP token set".into(),
        });
    }
    if let Some(c) = value.chars().find(|c| c.is_control() && *c != '\t') {
        return Err(GotenbergError::InvalidHeader {
            name: name.to_string(),
            reason: format!("header value contains control character {:?}", c),
        });
    }
    Ok(())
}

/// Check a header for the POST itself; reserved names are refused.
pub(crate) fn validate_outbound_header(name: &str, value: &str) -> Result<(), GotenbergError> {
    validate_header(name, value)?;
    if RESERVED_OUTBOUND
        .iter()
        .any(|reserved| name.eq_ignore_ascii_case(reserved))
    {
        return Err(GotenbergError::InvalidHeader {
            name: name.to_string(),
            reason: "header is set by the client itself".into(),
        });
    }
    Ok(())
}

/// Check an extra HTTP header, including its scope expression when present.
pub(crate) fn validate_extra_header(name: &str, value: &str) -> Result<(), GotenbergError> {
    validate_header(name, value)?;

    if let Some((_, scope)) = split_scope(value) {
        Regex::new(scope).map_err(|source| GotenbergError::InvalidHeaderScope {
            name: name.to_string(),
            source,
        })?;
    }
    Ok(())
}

/// Split `value;scope=<regex>` into its value and scope parts.
pub(crate) fn split_scope(value: &str) -> Option<(&str, &str)> {
    value
        .find(SCOPE_MARKER)
        .map(|idx| (&value[..idx], &value[idx + SCOPE_MARKER.len()..]))
}
