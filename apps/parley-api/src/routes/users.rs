//! User directory endpoints.

use axum::extract::{Path, State};
use axum::routing::get;
use axum::{Json, Router};

use crate::directory::DirectoryUser;
use crate::error::ApiError;
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/{user_id}", get(get_user))
}

/// GET /api/users — the full roster with freshly sampled presence.
async fn list_users(State(state): State<AppState>) -> Json<Vec<DirectoryUser>> {
    Json(state.directory.list_users())
}

/// GET /api/users/{user_id} — one roster entry.
async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<i64>,
) -> Result<Json<DirectoryUser>, ApiError> {
    state
        .directory
        .get_user(user_id)
        .map(Json)
        .ok_or_else(|| ApiError::not_found("User not found"))
}
