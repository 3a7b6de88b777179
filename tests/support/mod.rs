//! Shared helpers for the integration suites.
//!
//! `CaptureServer` is a loopback HTTP/1.1 server that records every request
//! it receives and answers each one with the same canned [`Reply`]. It is
//! just enough HTTP to stand in for Gotenberg: it understands
//! `Content-Length` and chunked request bodies and always closes the
//! connection after replying.

#![allow(dead_code)]

use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;

// ── Tracing ──────────────────────────────────────────────────────────────

/// Route library logs to the test writer; `RUST_LOG=debug` to see them.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// ── Canned replies ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct Reply {
    pub status: u16,
    pub content_type: String,
    pub body: Vec<u8>,
    pub headers: Vec<(String, String)>,
    /// Wait this long before answering.
    pub delay: Duration,
    /// Announce the full length but send only half the body, then hang up.
    pub truncate: bool,
    /// Send the head and this many body bytes, then hold the connection open.
    pub stall_after: Option<usize>,
}

impl Reply {
    pub fn ok(content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status: 200,
            content_type: content_type.to_string(),
            body: body.into(),
            headers: Vec::new(),
            delay: Duration::ZERO,
            truncate: false,
            stall_after: None,
        }
    }

    pub fn status(status: u16, body: &str) -> Self {
        Self {
            status,
            ..Self::ok("text/plain; charset=utf-8", body)
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn truncated(mut self) -> Self {
        self.truncate = true;
        self
    }

    pub fn stalled_after(mut self, bytes: usize) -> Self {
        self.stall_after = Some(bytes);
        self
    }
}

// ── Captured requests ────────────────────────────────────────────────────

#[derive(Debug)]
pub struct Captured {
    pub method: String,
    pub path: String,
    /// Header names lower-cased; a repeated header keeps its last value.
    pub headers: HashMap<String, String>,
    /// Every header line in arrival order, names lower-cased.
    pub header_lines: Vec<(String, String)>,
    pub body: Vec<u8>,
}

impl Captured {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Every value sent for `name`.
    pub fn header_all(&self, name: &str) -> Vec<&str> {
        let name = name.to_ascii_lowercase();
        self.header_lines
            .iter()
            .filter(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Parse the body as `multipart/form-data`.
    pub fn multipart(&self) -> Vec<FormPart> {
        let content_type = self.header("content-type").unwrap_or_default();
        let boundary = content_type
            .split(';')
            .filter_map(|p| p.trim().strip_prefix("boundary="))
            .next()
            .map(|b| b.trim_matches('"').to_string())
            .unwrap_or_else(|| panic!("no boundary in content type {content_type:?}"));
        parse_multipart(&self.body, &boundary)
    }
}

#[derive(Debug, Clone)]
pub struct FormPart {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl FormPart {
    pub fn text(&self) -> &str {
        std::str::from_utf8(&self.body).expect("text part is UTF-8")
    }
}

// ── Server ───────────────────────────────────────────────────────────────

pub struct CaptureServer {
    base_url: String,
    hits: Arc<AtomicUsize>,
    requests: mpsc::UnboundedReceiver<Captured>,
}

impl CaptureServer {
    pub async fn start(reply: Reply) -> Self {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await.expect("bind loopback");
        let addr = listener.local_addr().expect("local addr");
        let hits = Arc::new(AtomicUsize::new(0));
        let (tx, rx) = mpsc::unbounded_channel();

        let counter = Arc::clone(&hits);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                counter.fetch_add(1, Ordering::SeqCst);
                let reply = reply.clone();
                let tx = tx.clone();
                tokio::spawn(async move {
                    if let Some(captured) = handle(stream, &reply).await {
                        let _ = tx.send(captured);
                    }
                });
            }
        });

        Self {
            base_url: format!("http://{addr}"),
            hits,
            requests: rx,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Connections accepted so far.
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    /// Next fully-read request.
    pub async fn next_request(&mut self) -> Captured {
        tokio::time::timeout(Duration::from_secs(5), self.requests.recv())
            .await
            .expect("request within 5s")
            .expect("server still running")
    }
}

async fn handle(mut stream: TcpStream, reply: &Reply) -> Option<Captured> {
    let mut buf = Vec::new();
    let head_end = loop {
        if let Some(pos) = find(&buf, b"\r\n\r\n") {
            break pos;
        }
        let mut chunk = [0u8; 8192];
        let n = stream.read(&mut chunk).await.ok()?;
        if n == 0 {
            return None;
        }
        buf.extend_from_slice(&chunk[..n]);
    };

    let head = String::from_utf8_lossy(&buf[..head_end]).to_string();
    let mut lines = head.split("\r\n");
    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();
    let header_lines: Vec<(String, String)> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_ascii_lowercase(), v.trim().to_string()))
        .collect();
    let headers: HashMap<String, String> = header_lines.iter().cloned().collect();

    let mut rest = buf[head_end + 4..].to_vec();
    let body = if let Some(len) = headers.get("content-length") {
        let len: usize = len.parse().ok()?;
        while rest.len() < len {
            let mut chunk = [0u8; 8192];
            let n = stream.read(&mut chunk).await.ok()?;
            if n == 0 {
                return None;
            }
            rest.extend_from_slice(&chunk[..n]);
        }
        rest.truncate(len);
        rest
    } else if headers
        .get("transfer-encoding")
        .is_some_and(|te| te.eq_ignore_ascii_case("chunked"))
    {
        while find(&rest, b"\r\n0\r\n\r\n").is_none() && !rest.starts_with(b"0\r\n\r\n") {
            let mut chunk = [0u8; 8192];
            let n = stream.read(&mut chunk).await.ok()?;
            if n == 0 {
                return None;
            }
            rest.extend_from_slice(&chunk[..n]);
        }
        decode_chunked(&rest)
    } else {
        Vec::new()
    };

    let captured = Captured {
        method,
        path,
        headers,
        header_lines,
        body,
    };

    if !reply.delay.is_zero() {
        tokio::time::sleep(reply.delay).await;
    }

    let mut out = format!(
        "HTTP/1.1 {} X\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n",
        reply.status,
        reply.content_type,
        reply.body.len()
    );
    for (name, value) in &reply.headers {
        out.push_str(&format!("{name}: {value}\r\n"));
    }
    out.push_str("\r\n");

    if let Some(n) = reply.stall_after {
        let _ = stream.write_all(out.as_bytes()).await;
        let _ = stream.write_all(&reply.body[..n.min(reply.body.len())]).await;
        let _ = stream.flush().await;
        tokio::time::sleep(Duration::from_secs(30)).await;
        return Some(captured);
    }

    let sent = if reply.truncate {
        &reply.body[..reply.body.len() / 2]
    } else {
        &reply.body[..]
    };
    let _ = stream.write_all(out.as_bytes()).await;
    let _ = stream.write_all(sent).await;
    let _ = stream.flush().await;
    let _ = stream.shutdown().await;

    Some(captured)
}

// ── Wire parsing ─────────────────────────────────────────────────────────

pub fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn decode_chunked(mut data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    while let Some(line_end) = find(data, b"\r\n") {
        let size_str = String::from_utf8_lossy(&data[..line_end]);
        let size = usize::from_str_radix(size_str.split(';').next().unwrap_or("0").trim(), 16)
            .expect("chunk size");
        if size == 0 {
            break;
        }
        let start = line_end + 2;
        out.extend_from_slice(&data[start..start + size]);
        data = &data[start + size + 2..];
    }
    out
}

fn parse_multipart(body: &[u8], boundary: &str) -> Vec<FormPart> {
    let delimiter = format!("--{boundary}");
    let mut parts = Vec::new();
    let mut cursor = match find(body, delimiter.as_bytes()) {
        Some(pos) => &body[pos + delimiter.len()..],
        None => return parts,
    };

    loop {
        if cursor.starts_with(b"--") {
            break;
        }
        let section_start = if cursor.starts_with(b"\r\n") { 2 } else { 0 };
        cursor = &cursor[section_start..];
        let next = find(cursor, delimiter.as_bytes()).expect("closing boundary");
        let section = &cursor[..next];
        let section = section.strip_suffix(b"\r\n").unwrap_or(section);

        let head_end = find(section, b"\r\n\r\n").expect("part headers");
        let head = String::from_utf8_lossy(&section[..head_end]).to_string();
        let content = section[head_end + 4..].to_vec();

        let mut name = String::new();
        let mut filename = None;
        let mut content_type = None;
        for line in head.split("\r\n") {
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            if key.eq_ignore_ascii_case("content-disposition") {
                for param in value.split(';').map(str::trim) {
                    if let Some(v) = param.strip_prefix("name=") {
                        name = v.trim_matches('"').to_string();
                    } else if let Some(v) = param.strip_prefix("filename=") {
                        filename = Some(v.trim_matches('"').to_string());
                    }
                }
            } else if key.eq_ignore_ascii_case("content-type") {
                content_type = Some(value.trim().to_string());
            }
        }

        parts.push(FormPart {
            name,
            filename,
            content_type,
            body: content,
        });
        cursor = &cursor[next + delimiter.len()..];
    }
    parts
}

// ── Filesystem ───────────────────────────────────────────────────────────

/// Names of the entries in `dir`, sorted.
pub fn dir_entries(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|rd| {
            rd.filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

// ── PDF sniffing ─────────────────────────────────────────────────────────

/// `true` when the file starts with the `%PDF-` header.
pub fn is_pdf(path: &Path) -> bool {
    std::fs::read(path)
        .map(|bytes| bytes.starts_with(b"%PDF-"))
        .unwrap_or(false)
}

/// `true` when the XMP metadata declares a PDF/A part.
pub fn is_pdfa(path: &Path) -> bool {
    contains(path, b"pdfaid:part")
}

/// `true` when the XMP metadata declares a PDF/UA part.
pub fn is_pdfua(path: &Path) -> bool {
    contains(path, b"pdfuaid:part")
}

fn contains(path: &Path, needle: &[u8]) -> bool {
    std::fs::read(path)
        .map(|bytes| find(&bytes, needle).is_some())
        .unwrap_or(false)
}

// ── Fixtures ─────────────────────────────────────────────────────────────

pub fn testdata(kind: &str, filename: &str) -> std::path::PathBuf {
    std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/testdata")
        .join(kind)
        .join(filename)
}

/// A two-page Word document built in memory.
pub fn minimal_docx(text: &str) -> Vec<u8> {
    use std::io::Write;
    use zip::write::SimpleFileOptions;

    const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/></Types>"#;
    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/></Relationships>"#;

    let document = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body><w:p><w:r><w:t>{text}</w:t></w:r></w:p><w:p><w:r><w:br w:type="page"/></w:r></w:p><w:p><w:r><w:t>Page two</w:t></w:r></w:p></w:body></w:document>"#
    );

    let mut writer = zip::ZipWriter::new(std::io::Cursor::new(Vec::new()));
    for (name, content) in [
        ("[Content_Types].xml", CONTENT_TYPES),
        ("_rels/.rels", RELS),
        ("word/document.xml", document.as_str()),
    ] {
        writer
            .start_file(name, SimpleFileOptions::default())
            .expect("zip entry");
        writer.write_all(content.as_bytes()).expect("zip write");
    }
    writer.finish().expect("zip finish").into_inner()
}
