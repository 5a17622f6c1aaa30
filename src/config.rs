use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Service configuration, read once at startup from a JSON document.
///
/// Keys keep the camelCase spelling of the shipped config files:
/// `tcpPort`, `tlsTcpPort`, `tlsPemFile`, `tlsKeyFile`, `dbPath`, `useTls`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    pub tcp_port: u16,
    #[serde(default)]
    pub tls_tcp_port: u16,
    #[serde(default)]
    pub tls_pem_file: Option<PathBuf>,
    #[serde(default)]
    pub tls_key_file: Option<PathBuf>,
    pub db_path: PathBuf,
    #[serde(default)]
    pub use_tls: bool,
}

impl AppConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let config = Self::from_json(&raw)
            .with_context(|| format!("parse config file {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    fn validate(&self) -> anyhow::Result<()> {
        if self.use_tls {
            anyhow::ensure!(
                self.tls_pem_file.is_some(),
                "tlsPemFile is required when useTls is enabled"
            );
            anyhow::ensure!(
                self.tls_key_file.is_some(),
                "tlsKeyFile is required when useTls is enabled"
            );
            anyhow::ensure!(
                self.tls_tcp_port != 0,
                "tlsTcpPort is required when useTls is enabled"
            );
        }
        Ok(())
    }
}
