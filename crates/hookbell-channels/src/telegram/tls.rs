//! TLS client setup shared by the direct and tunnelled paths.

use hookbell_core::{config::shellexpand, error::HookbellError};
use rustls::pki_types::{CertificateDer, ServerName};
use std::io::BufReader;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_rustls::{client::TlsStream, TlsConnector};
use tracing::debug;

/// Build a connector trusting the platform's root certificates plus
/// `extra_roots`.
pub(crate) fn connector(
    extra_roots: Vec<CertificateDer<'static>>,
) -> Result<TlsConnector, HookbellError> {
    let mut roots = rustls::RootCertStore::empty();
    let native = rustls_native_certs::load_native_certs();
    for cert in native.certs {
        let _ = roots.add(cert);
    }
    if !native.errors.is_empty() {
        debug!("some native certificates could not be loaded: {:?}", native.errors);
    }
    for cert in extra_roots {
        roots
            .add(cert)
            .map_err(|e| HookbellError::Config(format!("unusable root certificate: {e}")))?;
    }

    let provider = Arc::new(rustls::crypto::ring::default_provider());
    let config = rustls::ClientConfig::builder_with_provider(provider)
        .with_safe_default_protocol_versions()
        .map_err(|e| HookbellError::Transport(format!("TLS setup failed: {e}")))?
        .with_root_certificates(roots)
        .with_no_client_auth();

    Ok(TlsConnector::from(Arc::new(config)))
}

/// Read every certificate from a PEM file.
pub(crate) fn load_pem_roots(path: &str) -> Result<Vec<CertificateDer<'static>>, HookbellError> {
    let path = shellexpand(path);
    let pem = std::fs::read(&path)
        .map_err(|e| HookbellError::Config(format!("failed to read {path}: {e}")))?;
    let certs = rustls_pemfile::certs(&mut BufReader::new(pem.as_slice()))
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| HookbellError::Config(format!("bad certificate in {path}: {e}")))?;
    if certs.is_empty() {
        return Err(HookbellError::Config(format!("no certificates found in {path}")));
    }
    debug!("loaded {} extra root certificate(s) from {path}", certs.len());
    Ok(certs)
}

/// Run a TLS handshake over `stream`, validating the certificate for
/// `server_name`.
///
/// When `stream` is a proxy tunnel, `server_name` must be the target host:
/// the certificate belongs to the endpoint, not to the proxy.
pub(crate) async fn handshake<S>(
    stream: S,
    server_name: &str,
    extra_roots: Vec<CertificateDer<'static>>,
) -> Result<TlsStream<S>, HookbellError>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let name = ServerName::try_from(server_name)
        .map(|name| name.to_owned())
        .map_err(|e| HookbellError::Transport(format!("invalid TLS server name {server_name}: {e}")))?;

    connector(extra_roots)?
        .connect(name, stream)
        .await
        .map_err(|e| HookbellError::Transport(format!("TLS handshake with {server_name} failed: {e}")))
}
