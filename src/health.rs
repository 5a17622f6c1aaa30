use std::path::Path;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Serialize;
use tracing::{instrument, warn};

use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthCheck {
    pub db: String,
    pub disk_writable: String,
    pub health: String,
    pub status: u16,
}

/// GET /health — public liveness probe: store ping plus a writable check of
/// the store directory.
#[instrument(skip(state))]
pub async fn get_health(State(state): State<AppState>) -> (StatusCode, Json<HealthCheck>) {
    let db_ok = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.db)
        .await
    {
        Ok(_) => true,
        Err(error) => {
            warn!(%error, "store ping failed");
            false
        }
    };
    let disk_ok = store_dir_writable(&state.config.db_path);

    let healthy = db_ok && disk_ok;
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (
        status,
        Json(HealthCheck {
            db: check_word(db_ok),
            disk_writable: check_word(disk_ok),
            health: if healthy { "ok" } else { "degraded" }.to_string(),
            status: status.as_u16(),
        }),
    )
}

fn check_word(ok: bool) -> String {
    if ok { "ok" } else { "fail" }.to_string()
}

fn store_dir_writable(db_path: &Path) -> bool {
    let dir = db_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let probe = dir.join(".todod-health-probe");
    match std::fs::write(&probe, b"probe") {
        Ok(()) => {
            let _ = std::fs::remove_file(&probe);
            true
        }
        Err(error) => {
            warn!(%error, dir = %dir.display(), "store directory is not writable");
            false
        }
    }
}
