//! HTTP `CONNECT` tunnelling through a forward proxy.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hookbell_core::{config::ProxyDescriptor, error::HookbellError};
use tokio::io::{AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tracing::debug;

use super::http::{build_connect, read_head};

/// `Proxy-Authorization` value for the proxy, if it has credentials.
pub(crate) fn proxy_authorization(proxy: &ProxyDescriptor) -> Option<String> {
    let (user, pass) = proxy.decoded_credentials()?;
    Some(format!("Basic {}", STANDARD.encode(format!("{user}:{pass}"))))
}

/// Ask `proxy` for a raw byte tunnel to `host:port`.
///
/// On success the returned socket speaks directly to the target; any TLS
/// must be layered on top by the caller. A non-200 answer fails at once.
pub(crate) async fn open_tunnel(
    proxy: &ProxyDescriptor,
    host: &str,
    port: u16,
) -> Result<TcpStream, HookbellError> {
    let mut stream = TcpStream::connect(proxy.address())
        .await
        .map_err(|e| HookbellError::Transport(format!("proxy {} unreachable: {e}", proxy.address())))?;

    let auth = proxy_authorization(proxy);
    let request = build_connect(host, port, auth.as_deref());
    stream
        .write_all(&request)
        .await
        .map_err(|e| HookbellError::Transport(format!("failed to send CONNECT: {e}")))?;

    let mut reader = BufReader::new(&mut stream);
    let (status, _headers) = read_head(&mut reader).await?;
    if status != 200 {
        return Err(HookbellError::Transport(format!(
            "proxy refused CONNECT to {host}:{port} with status {status}"
        )));
    }
    // The target has not been spoken to yet, so nothing may follow the head.
    if !reader.buffer().is_empty() {
        return Err(HookbellError::Transport(
            "proxy sent unexpected bytes after CONNECT response".to_string(),
        ));
    }
    drop(reader);

    debug!("tunnel to {host}:{port} established via {}", proxy.host);
    Ok(stream)
}
