use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use tracing::{info, instrument, warn};

use crate::auth::extractors::Identity;
use crate::auth::password::{hash_password, verify_password};
use crate::error::{ApiError, SuccessMsg};
use crate::state::AppState;
use crate::statuses::UserStatus;

use super::dto::{PasswordChange, ProposedUser, SafeUser, UserStatusBody, UserStatusMsg, UsersList};
use super::repo::User;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(get_users))
        .route("/user", post(create_user))
        .route("/user/id/:id", get(get_user_by_id))
        .route("/user/name/:name", get(get_user_by_name))
        .route("/user/:name/status", get(get_user_status).patch(set_user_status))
        .route(
            "/user/:name",
            axum::routing::patch(change_account_password).delete(delete_user),
        )
}

#[instrument(skip(state))]
pub async fn get_users(
    State(state): State<AppState>,
    _identity: Identity,
) -> Result<Json<UsersList>, ApiError> {
    let users = User::list(&state.db).await?;
    Ok(Json(UsersList {
        data: users.into_iter().map(SafeUser::from).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn get_user_by_id(
    State(state): State<AppState>,
    _identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<SafeUser>, ApiError> {
    let user = User::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("no records found with user id {id}")))?;
    Ok(Json(SafeUser::from(user)))
}

#[instrument(skip(state))]
pub async fn get_user_by_name(
    State(state): State<AppState>,
    _identity: Identity,
    Path(name): Path<String>,
) -> Result<Json<SafeUser>, ApiError> {
    let user = User::find_by_username(&state.db, &name)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("no records found with user name {name}")))?;
    Ok(Json(SafeUser::from(user)))
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    identity: Identity,
    WithRejection(Json(payload), _): WithRejection<Json<ProposedUser>, ApiError>,
) -> Result<Json<SafeUser>, ApiError> {
    let username = payload.user_name.trim();
    if username.is_empty() || payload.password.trim().is_empty() {
        return Err(ApiError::validation("userName and password must not be empty"));
    }
    let status = match payload.status.as_deref() {
        Some(raw) => raw.parse::<UserStatus>()?,
        None => UserStatus::Enabled,
    };

    if User::find_by_username(&state.db, username).await?.is_some() {
        warn!(username, "registration rejected: username already taken");
        return Err(ApiError::validation(format!("user '{username}' already exists")));
    }

    let hash = hash_password(&payload.password).map_err(|e| ApiError::internal(e.to_string()))?;
    let user = User::create(&state.db, username, &hash, status).await?;
    info!(username, by = %identity.username, "user added to system");
    Ok(Json(SafeUser::from(user)))
}

#[instrument(skip(state, payload))]
pub async fn change_account_password(
    State(state): State<AppState>,
    _identity: Identity,
    Path(name): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<PasswordChange>, ApiError>,
) -> Result<Json<SuccessMsg>, ApiError> {
    let user = User::find_by_username(&state.db, &name)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("no records found with user name {name}")))?;

    let old_ok = match verify_password(&payload.old_password, &user.password_hash) {
        Ok(ok) => ok,
        Err(error) => {
            warn!(username = %name, %error, "stored hash could not be checked");
            false
        }
    };
    if !old_ok {
        warn!(username = %name, "password change rejected: old password did not verify");
        return Err(ApiError::validation("User password could not be updated!"));
    }

    let hash =
        hash_password(&payload.new_password).map_err(|e| ApiError::internal(e.to_string()))?;
    User::set_password_hash(&state.db, &name, &hash).await?;
    info!(username = %name, "password changed");
    Ok(Json(SuccessMsg::new(format!(
        "User '{name}' has changed their password"
    ))))
}

#[instrument(skip(state))]
pub async fn get_user_status(
    State(state): State<AppState>,
    _identity: Identity,
    Path(name): Path<String>,
) -> Result<Json<UserStatusMsg>, ApiError> {
    let user = User::find_by_username(&state.db, &name)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("no records found with user name {name}")))?;
    Ok(Json(UserStatusMsg {
        message: format!("User status: {}", user.status),
        user_status: user.status,
    }))
}

#[instrument(skip(state, payload))]
pub async fn set_user_status(
    State(state): State<AppState>,
    identity: Identity,
    Path(name): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<UserStatusBody>, ApiError>,
) -> Result<Json<SuccessMsg>, ApiError> {
    let status = payload.status.parse::<UserStatus>()?;
    let touched = User::set_status(&state.db, &name, status).await?;
    if touched == 0 {
        return Err(ApiError::not_found(format!(
            "no records found with user name {name}"
        )));
    }
    info!(username = %name, status = status.as_str(), by = %identity.username, "user status changed");
    Ok(Json(SuccessMsg::new(format!(
        "User '{name}' has been {}",
        status.as_str()
    ))))
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    identity: Identity,
    Path(name): Path<String>,
) -> Result<Json<SuccessMsg>, ApiError> {
    let removed = User::delete(&state.db, &name).await?;
    if removed == 0 {
        return Err(ApiError::not_found(format!(
            "no records found with user name {name}"
        )));
    }
    info!(username = %name, by = %identity.username, "user removed");
    Ok(Json(SuccessMsg::new(format!(
        "User {name} has been removed from system"
    ))))
}
