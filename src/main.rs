use std::path::Path;

use todod::{app, config::AppConfig, state::AppState, tls};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "todod=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    // Config path: first argument, then TODOD_CONFIG, then the shipped default.
    let config_path = std::env::args()
        .nth(1)
        .or_else(|| std::env::var("TODOD_CONFIG").ok())
        .unwrap_or_else(|| "config/config.json".to_string());
    let config = AppConfig::load(Path::new(&config_path))?;

    let state = AppState::init(config).await?;
    sqlx::migrate!("./migrations").run(&state.db).await?;

    let config = state.config.clone();
    let app = app::build_app(state);
    if config.use_tls {
        tls::serve_tls(app, &config).await
    } else {
        app::serve(app, config.tcp_port).await
    }
}
