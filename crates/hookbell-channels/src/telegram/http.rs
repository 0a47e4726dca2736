//! HTTP/1.1 over a raw or TLS stream.
//!
//! The proxy `CONNECT` exchange is framed by hand; the API request that
//! follows goes through hyper's connection-level client.

use hookbell_core::error::HookbellError;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Bytes;
use hyper::header::{ACCEPT, CONNECTION, CONTENT_TYPE, HOST, USER_AGENT};
use hyper::{Method, Request};
use hyper_util::rt::TokioIo;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncRead, AsyncWrite};
use tracing::debug;

/// Upper bound for a proxy response head (status line plus headers).
const MAX_HEAD_BYTES: usize = 64 * 1024;
/// Upper bound for an API response body.
const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

const AGENT: &str = concat!("hookbell/", env!("CARGO_PKG_VERSION"));

/// An API response, body fully collected.
#[derive(Debug)]
pub(crate) struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Bytes,
}

/// Build a `CONNECT host:port` request, optionally with proxy credentials.
pub(crate) fn build_connect(host: &str, port: u16, proxy_auth: Option<&str>) -> Vec<u8> {
    let mut req = format!(
        "CONNECT {host}:{port} HTTP/1.1\r\nHost: {host}:{port}\r\nUser-Agent: {AGENT}\r\n"
    );
    if let Some(auth) = proxy_auth {
        req.push_str(&format!("Proxy-Authorization: {auth}\r\n"));
    }
    req.push_str("\r\n");
    req.into_bytes()
}

/// Send one JSON `POST` over `stream` and collect the response.
///
/// The stream is consumed; the server is asked to close it afterwards.
pub(crate) async fn post_json<S>(
    stream: S,
    host: &str,
    path: &str,
    body: Vec<u8>,
) -> Result<HttpResponse, HookbellError>
where
    S: AsyncRead + AsyncWrite + Unpin + Send + 'static,
{
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(HOST, host)
        .header(USER_AGENT, AGENT)
        .header(ACCEPT, "application/json")
        .header(CONTENT_TYPE, "application/json")
        .header(CONNECTION, "close")
        .body(Full::new(Bytes::from(body)))
        .map_err(|e| HookbellError::Protocol(format!("invalid request: {e}")))?;

    let (mut sender, conn) = hyper::client::conn::http1::handshake(TokioIo::new(stream))
        .await
        .map_err(|e| HookbellError::Transport(format!("HTTP handshake failed: {e}")))?;
    let peer = host.to_string();
    tokio::spawn(async move {
        if let Err(e) = conn.await {
            debug!("connection to {peer} ended: {e}");
        }
    });

    let response = sender
        .send_request(request)
        .await
        .map_err(|e| HookbellError::Transport(format!("request failed: {e}")))?;

    let status = response.status().as_u16();
    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = Limited::new(response.into_body(), MAX_BODY_BYTES)
        .collect()
        .await
        .map_err(|e| HookbellError::Transport(format!("failed to read response body: {e}")))?
        .to_bytes();

    Ok(HttpResponse {
        status,
        content_type,
        body,
    })
}

/// Read a status line and headers, leaving the reader at the first body byte.
pub(crate) async fn read_head<R>(reader: &mut R) -> Result<(u16, Vec<(String, String)>), HookbellError>
where
    R: AsyncBufRead + Unpin,
{
    let mut consumed = 0usize;
    let status_line = read_line(reader, &mut consumed).await?;
    if status_line.is_empty() {
        return Err(HookbellError::Transport(
            "connection closed before response".to_string(),
        ));
    }
    let status = parse_status_line(&status_line)?;

    let mut headers = Vec::new();
    loop {
        let line = read_line(reader, &mut consumed).await?;
        if line.is_empty() {
            break;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.push((name.trim().to_string(), value.trim().to_string()));
        }
    }
    Ok((status, headers))
}

fn parse_status_line(line: &str) -> Result<u16, HookbellError> {
    let mut parts = line.split_whitespace();
    let version = parts.next().unwrap_or_default();
    if !version.starts_with("HTTP/") {
        return Err(HookbellError::Transport(format!("malformed status line: {line}")));
    }
    parts
        .next()
        .and_then(|code| code.parse::<u16>().ok())
        .ok_or_else(|| HookbellError::Transport(format!("malformed status line: {line}")))
}

/// One CRLF- or LF-terminated line without its terminator. Empty at EOF.
async fn read_line<R>(reader: &mut R, consumed: &mut usize) -> Result<String, HookbellError>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    let n = reader
        .read_until(b'\n', &mut buf)
        .await
        .map_err(|e| HookbellError::Transport(format!("failed to read response: {e}")))?;
    *consumed += n;
    if *consumed > MAX_HEAD_BYTES {
        return Err(HookbellError::Protocol("response head too large".to_string()));
    }
    while matches!(buf.last(), Some(b'\n' | b'\r')) {
        buf.pop();
    }
    Ok(String::from_utf8_lossy(&buf).into_owned())
}
