use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};
use uuid::Uuid;

use crate::models::AppState;
use crate::schemas::{ListingImageCreate, ListingImageResponse, ValidatedJson};
use crate::types::{AppError, AppResult};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route(
            "/api/listings/{listing_id}/images",
            get(list_images).post(add_image),
        )
        .route(
            "/api/listings/{listing_id}/images/{image_id}",
            delete(remove_image),
        )
        .with_state(state)
}

async fn list_images(
    State(_state): State<AppState>,
    Path(_listing_id): Path<Uuid>,
) -> AppResult<Json<Vec<ListingImageResponse>>> {
    Err(AppError::NotImplemented("listing images"))
}

async fn add_image(
    State(_state): State<AppState>,
    Path(_listing_id): Path<Uuid>,
    ValidatedJson(_image): ValidatedJson<ListingImageCreate>,
) -> AppResult<(StatusCode, Json<ListingImageResponse>)> {
    Err(AppError::NotImplemented("listing image upload"))
}

async fn remove_image(
    State(_state): State<AppState>,
    Path((_listing_id, _image_id)): Path<(Uuid, Uuid)>,
) -> AppResult<StatusCode> {
    Err(AppError::NotImplemented("listing image removal"))
}
