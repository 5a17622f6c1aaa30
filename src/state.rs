use std::sync::Arc;

use anyhow::Context;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

use crate::auth::session::SessionCache;
use crate::config::AppConfig;

/// Shared handles for request handling: the store pool, the loaded
/// configuration, and the in-process session cache. Everything is injected
/// here at startup; there are no process-wide singletons.
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub sessions: Arc<SessionCache>,
}

impl AppState {
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        if let Some(dir) = config.db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("create store directory {}", dir.display()))?;
        }

        let options = SqliteConnectOptions::new()
            .filename(&config.db_path)
            .create_if_missing(true)
            .foreign_keys(true);

        let db = SqlitePoolOptions::new()
            .max_connections(10)
            .connect_with(options)
            .await
            .with_context(|| format!("open store at {}", config.db_path.display()))?;

        Ok(Self {
            db,
            config: Arc::new(config),
            sessions: Arc::new(SessionCache::default()),
        })
    }

    pub fn from_parts(db: SqlitePool, config: Arc<AppConfig>, sessions: Arc<SessionCache>) -> Self {
        Self {
            db,
            config,
            sessions,
        }
    }
}
