use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use uuid::Uuid;

use crate::models::AppState;
use crate::schemas::{UserResponse, UserUpdate, ValidatedJson};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/users/me", get(get_me).patch(update_me))
        .route("/api/users/{user_id}", get(get_user))
        .with_state(state)
}

async fn get_me(State(_state): State<AppState>) -> AppResult<Json<UserResponse>> {
    Err(AppError::NotImplemented("current user"))
}

async fn update_me(
    State(_state): State<AppState>,
    ValidatedJson(_update): ValidatedJson<UserUpdate>,
) -> AppResult<Json<UserResponse>> {
    Err(AppError::NotImplemented("user update"))
}

async fn get_user(
    State(_state): State<AppState>,
    Path(_user_id): Path<Uuid>,
) -> AppResult<Json<UserResponse>> {
    Err(AppError::NotImplemented("user lookup"))
}
