use axum::{
    extract::{Path, State},
    routing::{get, put},
    Json, Router,
};
use uuid::Uuid;

use crate::models::AppState;
use crate::schemas::{ProfileResponse, ProfileUpdate, ValidatedJson};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/profiles/me", put(update_my_profile))
        .route("/api/profiles/{user_id}", get(get_profile))
        .with_state(state)
}

async fn get_profile(
    State(_state): State<AppState>,
    Path(_user_id): Path<Uuid>,
) -> AppResult<Json<ProfileResponse>> {
    Err(AppError::NotImplemented("profile lookup"))
}

async fn update_my_profile(
    State(_state): State<AppState>,
    ValidatedJson(_update): ValidatedJson<ProfileUpdate>,
) -> AppResult<Json<ProfileResponse>> {
    Err(AppError::NotImplemented("profile update"))
}
