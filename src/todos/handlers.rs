use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};
use axum_extra::extract::WithRejection;
use tracing::{info, instrument};

use crate::auth::extractors::Identity;
use crate::error::{ApiError, SuccessMsg};
use crate::state::AppState;
use crate::statuses;

use super::dto::{ProposedTodo, TodoList};
use super::repo::{self, Todo};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/todo", get(get_todos).post(create_todo))
        .route("/todo/:id", get(get_todo_by_id).delete(delete_todo))
        .route("/todo/:id/:status", axum::routing::put(update_todo))
}

#[instrument(skip(state))]
pub async fn get_todos(
    State(state): State<AppState>,
    _identity: Identity,
) -> Result<Json<TodoList>, ApiError> {
    let data = repo::list(&state.db).await?;
    Ok(Json(TodoList { data }))
}

#[instrument(skip(state))]
pub async fn get_todo_by_id(
    State(state): State<AppState>,
    _identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<Todo>, ApiError> {
    let todo = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("no records found with todo id {id}")))?;
    Ok(Json(todo))
}

#[instrument(skip(state, payload))]
pub async fn create_todo(
    State(state): State<AppState>,
    identity: Identity,
    WithRejection(Json(payload), _): WithRejection<Json<ProposedTodo>, ApiError>,
) -> Result<Json<Todo>, ApiError> {
    // Every todo starts in `new`, whatever the payload might ask for.
    let status = statuses::find_by_name(&state.db, statuses::NEW)
        .await?
        .ok_or_else(|| ApiError::internal("status vocabulary is missing 'new'"))?;
    let todo = repo::create(&state.db, &payload.description, status.id).await?;
    info!(id = todo.id, by = %identity.username, "todo created");
    Ok(Json(todo))
}

/// Read, validate the target status against the registry, then write. An
/// unknown status name leaves the stored status untouched.
#[instrument(skip(state))]
pub async fn update_todo(
    State(state): State<AppState>,
    identity: Identity,
    Path((id, status)): Path<(i64, String)>,
) -> Result<Json<Todo>, ApiError> {
    let todo = repo::find_by_id(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("no records found with todo id {id}")))?;
    let target = statuses::find_by_name(&state.db, &status)
        .await?
        .ok_or_else(|| ApiError::validation(format!("unknown status '{status}'")))?;
    repo::update_status(&state.db, todo.id, target.id).await?;
    info!(id, status = %target.name, by = %identity.username, "todo status updated");
    Ok(Json(Todo {
        status: target.name,
        ..todo
    }))
}

#[instrument(skip(state))]
pub async fn delete_todo(
    State(state): State<AppState>,
    identity: Identity,
    Path(id): Path<i64>,
) -> Result<Json<SuccessMsg>, ApiError> {
    let removed = repo::delete(&state.db, id).await?;
    if removed == 0 {
        return Err(ApiError::not_found(format!(
            "no records found with todo id {id}"
        )));
    }
    info!(id, by = %identity.username, "todo removed");
    Ok(Json(SuccessMsg::new(format!("Todo {id} has been removed"))))
}
