use std::net::SocketAddr;

use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::middleware::require_auth;
use crate::state::AppState;
use crate::{auth, health, todos, users};

/// Everything hangs off `/api/v1`. `/health` and `/logout` are public; the
/// todo and user routes sit behind the auth middleware.
pub fn build_app(state: AppState) -> Router {
    let private = Router::new()
        .merge(todos::router())
        .merge(users::router())
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .route("/health", get(health::get_health))
                .route("/logout", post(auth::handlers::logout))
                .merge(private),
        )
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
}

pub async fn serve(app: Router, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
