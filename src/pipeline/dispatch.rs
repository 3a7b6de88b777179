//! Dispatch: one POST per request, no retry.
//!
//! Outbound headers are turned into a `HeaderMap` before the documents are
//! read, so a header the wire cannot carry fails without any I/O. Non-2xx
//! answers are drained (up to the error-body cap) into
//! [`GotenbergError::Status`]; Gotenberg explains rejections in that body.

use crate::error::GotenbergError;
use crate::pipeline::encode::encode_form;
use crate::request::MultipartRequest;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::time::Instant;
use tracing::{info, warn};

/// Encode `request` and POST it to `base_url` + `endpoint`.
///
/// `endpoint` is passed separately so screenshot calls can reuse a Chromium
/// request against its screenshot route.
pub(crate) async fn dispatch<R: MultipartRequest + ?Sized>(
    http: &reqwest::Client,
    base_url: &str,
    endpoint: &str,
    request: &R,
) -> Result<reqwest::Response, GotenbergError> {
    let base = request.request_base();
    let headers = header_map(base.headers())?;
    let form = encode_form(base, &request.form_documents()).await?;

    let url = format!("{base_url}{endpoint}");
    let mut builder = http.post(&url).headers(headers).multipart(form);
    if let Some((username, password)) = base.basic_auth() {
        builder = builder.basic_auth(username, Some(password));
    }

    let trace = base.trace_id().unwrap_or("-");
    info!("POST {} (trace {})", url, trace);
    let started = Instant::now();

    let response = builder.send().await?;
    let status = response.status();
    let elapsed_ms = started.elapsed().as_millis();

    if !status.is_success() {
        let body = error_body(response).await;
        warn!(
            "Gotenberg answered {} for {} after {}ms (trace {})",
            status, endpoint, elapsed_ms, trace
        );
        return Err(GotenbergError::status_with_body(status.as_u16(), &body));
    }

    info!("{} → {} in {}ms", endpoint, status, elapsed_ms);
    Ok(response)
}

/// Read a rejection body; a read failure is reported in place of the body.
async fn error_body(response: reqwest::Response) -> String {
    match response.text().await {
        Ok(body) => body,
        Err(e) => {
            warn!("Could not read Gotenberg's error body: {}", e);
            format!("<error body unreadable: {e}>")
        }
    }
}

/// Convert the request's outbound headers into typed header values.
pub(crate) fn header_map(headers: &BTreeMap<String, String>) -> Result<HeaderMap, GotenbergError> {
    let mut map = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        let header_name =
            HeaderName::from_bytes(name.as_bytes()).map_err(|e| GotenbergError::InvalidHeader {
                name: name.clone(),
                reason: e.to_string(),
            })?;
        let header_value = HeaderValue::from_str(value).map_err(|e| GotenbergError::InvalidHeader {
            name: name.clone(),
            reason: e.to_string(),
        })?;
        map.insert(header_name, header_value);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gotenberg_headers_pass_through() {
        let mut headers = BTreeMap::new();
        headers.insert("Gotenberg-Trace".to_string(), "abc".to_string());
        headers.insert("Gotenberg-Output-Filename".to_string(), "out".to_string());
        let map = header_map(&headers).unwrap();
        assert_eq!(map["gotenberg-trace"], "abc");
        assert_eq!(map["gotenberg-output-filename"], "out");
    }

    #[test]
    fn newline_in_value_rejected() {
        let mut headers = BTreeMap::new();
        headers.insert("X-Bad".to_string(), "a\r\nInjected: yes".to_string());
        let err = header_map(&headers).unwrap_err();
        assert!(matches!(err, GotenbergError::InvalidHeader { ref name, .. } if name == "X-Bad"));
    }
}
