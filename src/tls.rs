use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder;
use hyper_util::service::TowerToHyperService;
use rustls_pki_types::pem::PemObject;
use rustls_pki_types::{CertificateDer, PrivateKeyDer};
use tokio_rustls::TlsAcceptor;
use tracing::{error, info, warn};

use crate::config::AppConfig;

/// TLS listener: rustls handshake per connection, then the router served
/// over hyper-util's auto (HTTP/1 + HTTP/2) connection builder.
pub async fn serve_tls(app: Router, config: &AppConfig) -> anyhow::Result<()> {
    let pem = config
        .tls_pem_file
        .as_ref()
        .context("tlsPemFile is required when useTls is enabled")?;
    let key = config
        .tls_key_file
        .as_ref()
        .context("tlsKeyFile is required when useTls is enabled")?;
    let server_config = load_server_config(pem, key)?;
    let acceptor = TlsAcceptor::from(Arc::new(server_config));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.tls_tcp_port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("listening on {} (tls)", addr);

    loop {
        let (stream, peer) = listener.accept().await?;
        let acceptor = acceptor.clone();
        let service = TowerToHyperService::new(app.clone());
        tokio::spawn(async move {
            let tls_stream = match acceptor.accept(stream).await {
                Ok(stream) => stream,
                Err(error) => {
                    warn!(%peer, %error, "tls handshake failed");
                    return;
                }
            };
            if let Err(error) = Builder::new(TokioExecutor::new())
                .serve_connection_with_upgrades(TokioIo::new(tls_stream), service)
                .await
            {
                error!(%peer, %error, "connection error");
            }
        });
    }
}

fn load_server_config(pem: &Path, key: &Path) -> anyhow::Result<rustls::ServerConfig> {
    let certs = CertificateDer::pem_file_iter(pem)
        .with_context(|| format!("read certificate chain {}", pem.display()))?
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("parse certificate chain {}", pem.display()))?;
    let key = PrivateKeyDer::from_pem_file(key)
        .with_context(|| format!("read private key {}", key.display()))?;

    let mut config = rustls::ServerConfig::builder_with_provider(Arc::new(
        rustls::crypto::ring::default_provider(),
    ))
    .with_safe_default_protocol_versions()?
    .with_no_client_auth()
    .with_single_cert(certs, key)
    .context("build tls server config")?;
    config.alpn_protocols = vec![b"h2".to_vec(), b"http/1.1".to_vec()];
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_cert_files_are_a_startup_error() {
        let err = load_server_config(
            Path::new("/no/such/server.pem"),
            Path::new("/no/such/server.key"),
        )
        .unwrap_err();
        assert!(err.to_string().contains("certificate chain"));
    }
}
