use axum::extract::State;
use axum::Json;
use axum_extra::extract::cookie::{Cookie, CookieJar};
use tracing::{info, instrument};

use crate::auth::session::SESSION_COOKIE;
use crate::error::SuccessMsg;
use crate::state::AppState;

/// POST /logout — destroy the presented session token and clear the cookie.
///
/// Public on purpose: possession of the token is the only credential needed
/// to destroy it. A request with no cookie is still a successful logout.
#[instrument(skip(state, jar))]
pub async fn logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Json<SuccessMsg>) {
    let jar = match jar.get(SESSION_COOKIE) {
        Some(cookie) => {
            if state.sessions.remove(cookie.value()) {
                info!("session destroyed");
            }
            jar.remove(Cookie::build(SESSION_COOKIE).path("/"))
        }
        None => jar,
    };
    (jar, Json(SuccessMsg::new("logged out")))
}
