//! The client: one entry point per way of consuming a response.
//!
//! | Call | Endpoint | Result |
//! |------|----------|--------|
//! | [`Client::send`] | `endpoint()` | open [`Output`] handle |
//! | [`Client::store`] | `endpoint()` | file written atomically, [`OutputKind`] |
//! | [`Client::screenshot`] | `screenshot_endpoint()` | open [`Output`] handle |
//! | [`Client::store_screenshot`] | `screenshot_endpoint()` | image written atomically |
//! | [`Client::read_metadata`] | `/forms/pdfengines/metadata/read` | decoded JSON |
//!
//! Every call runs under a [`Context`]. An already-expired or cancelled
//! context fails before documents are read, the network is contacted, or the
//! destination directory is touched.

use crate::config::{normalize_base_url, ClientConfig};
use crate::context::Context;
use crate::error::GotenbergError;
use crate::output::{Output, OutputKind};
use crate::pipeline::{dispatch::dispatch, resolve};
use crate::request::{MultipartRequest, ReadMetadataRequest, ScreenshotRequest};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::warn;

/// Gotenberg HTTP client.
///
/// Cheap to clone; clones share the connection pool.
///
/// ```rust,no_run
/// use gotenberg_client::{Client, Context, Document, OfficeRequest};
///
/// # async fn run() -> Result<(), gotenberg_client::GotenbergError> {
/// let client = Client::new("http://localhost:3000")?;
/// let req = OfficeRequest::new([Document::from_path("report.docx", "report.docx")]);
/// client.store(&Context::background(), &req, "report.pdf").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Client {
    http: reqwest::Client,
    base_url: String,
}

impl Client {
    /// A client for `base_url` with otherwise default configuration.
    pub fn new(base_url: impl Into<String>) -> Result<Self, GotenbergError> {
        let config = ClientConfig::builder().base_url(base_url).build()?;
        Self::from_config(&config)
    }

    /// Build the underlying HTTP client from `config`.
    pub fn from_config(config: &ClientConfig) -> Result<Self, GotenbergError> {
        let mut builder = reqwest::Client::builder().user_agent(config.user_agent.clone());
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        if let Some(connect) = config.connect_timeout() {
            builder = builder.connect_timeout(connect);
        }
        let http = builder
            .build()
            .map_err(|e| GotenbergError::InvalidConfig(format!("HTTP client: {e}")))?;
        Self::with_http_client(&config.base_url, http)
    }

    /// Use a caller-provided `reqwest::Client` (proxies, custom TLS, …).
    pub fn with_http_client(
        base_url: impl AsRef<str>,
        http: reqwest::Client,
    ) -> Result<Self, GotenbergError> {
        Ok(Self {
            http,
            base_url: normalize_base_url(base_url.as_ref())?,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Post `request` and hand back the open response.
    pub async fn send<R>(&self, ctx: &Context, request: &R) -> Result<Output, GotenbergError>
    where
        R: MultipartRequest + ?Sized,
    {
        let endpoint = request.endpoint();
        let response = self.guarded(ctx, self.post(endpoint, request)).await?;
        Ok(Output::new(response, ctx.clone()))
    }

    /// Post `request` and stream the result to `dest`.
    ///
    /// Single files and archives are written as-is; the returned kind tells
    /// which one arrived.
    pub async fn store<R>(
        &self,
        ctx: &Context,
        request: &R,
        dest: impl AsRef<Path>,
    ) -> Result<OutputKind, GotenbergError>
    where
        R: MultipartRequest + ?Sized,
    {
        let dest = dest.as_ref();
        let endpoint = request.endpoint();
        self.guarded(ctx, async {
            let response = self.post(endpoint, request).await?;
            resolve::store(response, dest).await
        })
        .await
    }

    /// Post `request` to its screenshot route and hand back the response.
    pub async fn screenshot<R>(&self, ctx: &Context, request: &R) -> Result<Output, GotenbergError>
    where
        R: ScreenshotRequest + ?Sized,
    {
        let endpoint = request.screenshot_endpoint();
        let response = self.guarded(ctx, self.post(endpoint, request)).await?;
        Ok(Output::new(response, ctx.clone()))
    }

    /// Post `request` to its screenshot route and store the image at `dest`.
    ///
    /// A response that is not `image/*` fails with
    /// [`GotenbergError::UnexpectedContentType`] and nothing is written.
    pub async fn store_screenshot<R>(
        &self,
        ctx: &Context,
        request: &R,
        dest: impl AsRef<Path>,
    ) -> Result<OutputKind, GotenbergError>
    where
        R: ScreenshotRequest + ?Sized,
    {
        let dest = dest.as_ref();
        let endpoint = request.screenshot_endpoint();
        self.guarded(ctx, async {
            let response = self.post(endpoint, request).await?;
            resolve::ensure_kind(&response, OutputKind::Image, "image/*")?;
            resolve::store(response, dest).await
        })
        .await
    }

    /// Read the metadata of every PDF in `request`, keyed by filename.
    pub async fn read_metadata(
        &self,
        ctx: &Context,
        request: &ReadMetadataRequest,
    ) -> Result<BTreeMap<String, serde_json::Value>, GotenbergError> {
        let endpoint = request.endpoint();
        self.guarded(ctx, async {
            let response = self.post(endpoint, request).await?;
            resolve::ensure_kind(&response, OutputKind::Json, "application/json")?;
            let body = response.bytes().await?;
            serde_json::from_slice(&body)
                .map_err(|e| GotenbergError::InvalidResponse(format!("metadata JSON: {e}")))
        })
        .await
    }

    async fn post<R>(&self, endpoint: &str, request: &R) -> Result<reqwest::Response, GotenbergError>
    where
        R: MultipartRequest + ?Sized,
    {
        dispatch(&self.http, &self.base_url, endpoint, request).await
    }

    /// Run `op` under `ctx`, logging when the context ends it.
    async fn guarded<T>(
        &self,
        ctx: &Context,
        op: impl std::future::Future<Output = Result<T, GotenbergError>>,
    ) -> Result<T, GotenbergError> {
        match ctx.run(op).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Request to {} abandoned: {}", self.base_url, e);
                Err(e)
            }
        }
    }
}
