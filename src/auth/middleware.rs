use axum::extract::{Request, State};
use axum::http::header::{AUTHORIZATION, SET_COOKIE};
use axum::http::HeaderValue;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::{debug, info, warn};

use crate::auth::extractors::Identity;
use crate::auth::password::verify_password;
use crate::auth::session::SESSION_COOKIE;
use crate::error::ApiError;
use crate::state::AppState;
use crate::users::repo::User;

/// Gate for the private route group.
///
/// A request is allowed through if it carries a live session cookie whose
/// account is still enabled, or an `Authorization: Basic` header with valid
/// credentials. The lock status is re-checked on every request, so locking
/// an account invalidates its open sessions immediately. A session token
/// that no longer resolves falls through to the Basic path rather than
/// rejecting outright.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Some(username) = state.sessions.resolve(cookie.value()) {
            return continue_with_session(&state, username, request, next).await;
        }
        debug!("session token did not resolve; checking authentication headers");
    }

    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| {
            debug!("no session and no authentication header");
            ApiError::Unauthorized
        })?;
    let (username, password) = decode_basic(header).ok_or_else(|| {
        warn!("malformed Basic authentication header");
        ApiError::Unauthorized
    })?;

    let user = User::find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| {
            warn!(username, "authentication failed: unknown user");
            ApiError::Unauthorized
        })?;
    if user.is_locked() {
        warn!(username, "authentication failed: account is locked");
        return Err(ApiError::Unauthorized);
    }
    let verified = match verify_password(&password, &user.password_hash) {
        Ok(ok) => ok,
        Err(error) => {
            warn!(username, %error, "stored hash could not be checked");
            false
        }
    };
    if !verified {
        warn!(username, "authentication failed: bad password");
        return Err(ApiError::Unauthorized);
    }

    info!(username, "authenticated; issuing session");
    let token = state.sessions.issue(&user.username);

    let mut request = request;
    request.extensions_mut().insert(Identity {
        username: user.username,
    });
    let mut response = next.run(request).await;

    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build();
    match HeaderValue::from_str(&cookie.to_string()) {
        Ok(value) => {
            response.headers_mut().append(SET_COOKIE, value);
        }
        // The caller already authenticated for this request; a cookie that
        // cannot be attached only costs them a re-auth next time.
        Err(error) => warn!(%error, "failed to attach session cookie"),
    }
    Ok(response)
}

async fn continue_with_session(
    state: &AppState,
    username: String,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user = User::find_by_username(&state.db, &username)
        .await?
        .ok_or_else(|| {
            warn!(username, "session owner no longer exists");
            ApiError::Unauthorized
        })?;
    if user.is_locked() {
        warn!(username, "session rejected: account is locked");
        return Err(ApiError::Unauthorized);
    }
    debug!(username, "session authenticated");
    request.extensions_mut().insert(Identity {
        username: user.username,
    });
    Ok(next.run(request).await)
}

fn decode_basic(header: &str) -> Option<(String, String)> {
    let encoded = header
        .strip_prefix("Basic ")
        .or_else(|| header.strip_prefix("basic "))?;
    let decoded = STANDARD.decode(encoded.trim()).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;
    let (username, password) = decoded.split_once(':')?;
    Some((username.to_string(), password.to_string()))
}
